//! The service layer of the threadgate demo client.
//!
//! It implements the three screens of the permission-grant flow on top of two storage areas:
//!
//!  - the [`PermissionSelector`](selector::PermissionSelector) collects the scopes a user wants to
//!    grant and hands them over through session storage,
//!  - the [`MockAuthenticator`](authenticator::MockAuthenticator) fabricates a credential for the
//!    selected scopes and writes it to local storage,
//!  - the [`SessionGate`](gate::SessionGate) guards the main screen and switches features on or
//!    off based on the granted scopes.
//!
//! [`ClientService`] bundles these for the `server` crate.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod authenticator;
pub mod backend;
pub mod error;
pub mod gate;
pub mod oauth;
pub mod route;
pub mod selector;
pub mod service;
pub mod storage;

pub use error::{Result, ServiceError};
pub use route::Route;
pub use service::{CallbackParams, ClientService};
pub use storage::{ClientStorage, StorageConfig};
