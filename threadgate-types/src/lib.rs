//! Shared types for the threadgate demo client.
//!
//! These types describe the fixed scope catalog, the permission set a user grants, the credential
//! record created by a login and the static feed shown on the main screen. They carry no I/O and
//! are used by both the service and server crates.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod credential;
pub mod feature;
pub mod feed;
pub mod permission;
pub mod scope;

pub use credential::{CredentialRecord, UserProfile};
pub use feature::Feature;
pub use feed::FeedItem;
pub use permission::{InvalidPermissionSetError, PermissionSet};
pub use scope::{InvalidScopeError, Scope, ScopeInfo};
