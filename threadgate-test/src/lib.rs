//! Test utilities for the threadgate server.
//!
//! This crate provides utilities to facilitate blackbox testing of the server. See the modules for
//! all available utilities.

pub mod server;
pub mod tracing;
