//! The main screen and logout.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Json, Router, routing};
use serde::Deserialize;
use threadgate_service::gate::GateOutcome;

use crate::endpoints::common::{ApiResult, navigate};
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/", routing::get(main_screen))
        .route("/logout", routing::post(logout))
}

#[derive(Debug, Default, Deserialize)]
struct FeedQuery {
    /// Search keyword, ignored without the keyword search scope.
    q: Option<String>,
}

async fn main_screen(
    State(state): State<ServiceState>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Response> {
    let response = match state.client.enter(query.q.as_deref()).await? {
        GateOutcome::Redirect(route) => navigate(route).into_response(),
        GateOutcome::Render(view) => Json(view).into_response(),
    };

    Ok(response)
}

async fn logout(State(state): State<ServiceState>) -> ApiResult<Redirect> {
    let route = state.client.logout().await?;
    Ok(navigate(route))
}
