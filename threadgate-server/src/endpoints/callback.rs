use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::{Router, routing};
use threadgate_service::CallbackParams;

use crate::endpoints::common::navigate;
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new().route("/auth/callback", routing::get(callback))
}

/// Completes the provider redirect. Failures are logged and lead back to login.
async fn callback(
    State(state): State<ServiceState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    navigate(state.client.complete_callback(params).await)
}
