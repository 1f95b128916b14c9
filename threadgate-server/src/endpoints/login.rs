use axum::extract::State;
use axum::response::Redirect;
use axum::{Json, Router, routing};
use serde::Serialize;
use threadgate_service::Route;
use threadgate_service::gate::GrantedScope;

use crate::endpoints::common::{ApiResult, navigate};
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new().route("/login", routing::get(view).post(login))
}

/// The login screen.
#[derive(Debug, Serialize)]
struct LoginView {
    /// Scopes that will be requested.
    permissions: Vec<GrantedScope>,
    /// Where a real client would start the provider flow.
    authorize_url: String,
}

async fn view(State(state): State<ServiceState>) -> ApiResult<Json<LoginView>> {
    let pending = state.client.pending_selection().await?;
    let authorize_url = state.client.oauth().authorize_url(&pending)?;

    let permissions = pending
        .iter()
        .map(|scope| GrantedScope {
            scope,
            name: scope.info().name,
            icon: scope.info().icon,
        })
        .collect();

    Ok(Json(LoginView {
        permissions,
        authorize_url: authorize_url.into(),
    }))
}

async fn login(State(state): State<ServiceState>) -> ApiResult<Redirect> {
    let record = state.client.login().await?;
    tracing::info!(
        user = %record.user.username,
        scopes = record.granted_permissions.len(),
        "mock login complete"
    );
    Ok(navigate(Route::Main))
}
