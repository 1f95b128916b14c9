//! Contains all HTTP endpoint handlers.
//!
//! Use [`routes`] to create a router with all endpoints.

use axum::Router;

use crate::state::ServiceState;

mod callback;
pub mod common;
mod feed;
pub mod health;
mod login;
mod permissions;

pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(health::router())
        .merge(permissions::router())
        .merge(login::router())
        .merge(feed::router())
        .merge(callback::router())
}
