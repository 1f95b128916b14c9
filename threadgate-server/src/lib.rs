//! The web server of the threadgate demo client.
//!
//! This builds on top of the [`threadgate_service`] and exposes the permission selection, login
//! and main screens as an `HTTP` layer. Screens render as JSON views; navigation between them is
//! expressed with redirects.

pub mod cli;
pub mod config;
pub mod endpoints;
pub mod healthcheck;
pub mod observability;
pub mod state;
pub mod web;
