//! The permission selection screen.
//!
//! Every mutation answers with the updated [`SelectorView`]. Confirming hands the selection to the
//! login screen through session storage.

use axum::extract::State;
use axum::response::Redirect;
use axum::{Json, Router, routing};
use serde::Deserialize;
use threadgate_service::selector::SelectorView;
use threadgate_types::Scope;

use crate::endpoints::common::{ApiResult, navigate};
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/permissions", routing::get(enter))
        .route("/permissions/toggle", routing::post(toggle))
        .route("/permissions/select-all", routing::post(select_all))
        .route("/permissions/deselect-all", routing::post(deselect_all))
        .route("/permissions/confirm", routing::post(confirm))
}

#[derive(Debug, Deserialize)]
struct ToggleRequest {
    scope: Scope,
}

/// Opens the screen with the whole catalog selected.
async fn enter(State(state): State<ServiceState>) -> Json<SelectorView> {
    let mut selector = state.selector();
    selector.select_all();
    Json(selector.view())
}

async fn toggle(
    State(state): State<ServiceState>,
    Json(request): Json<ToggleRequest>,
) -> Json<SelectorView> {
    let mut selector = state.selector();
    selector.toggle(request.scope);
    Json(selector.view())
}

async fn select_all(State(state): State<ServiceState>) -> Json<SelectorView> {
    let mut selector = state.selector();
    selector.select_all();
    Json(selector.view())
}

async fn deselect_all(State(state): State<ServiceState>) -> Json<SelectorView> {
    let mut selector = state.selector();
    selector.deselect_all();
    Json(selector.view())
}

async fn confirm(State(state): State<ServiceState>) -> ApiResult<Redirect> {
    let selector = state.selector().clone();
    let route = state.client.confirm_selection(&selector).await?;
    Ok(navigate(route))
}
