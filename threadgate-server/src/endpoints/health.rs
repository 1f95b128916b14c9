use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Router, routing};
use threadgate_service::ServiceError;

use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/health", routing::get(health))
        .route("/ready", routing::get(ready))
}

async fn health() -> impl IntoResponse {
    "OK"
}

/// Ready once both storage areas can be read.
///
/// Stored records that fail to parse do not count against readiness; only backend failures do.
async fn ready(State(state): State<ServiceState>) -> impl IntoResponse {
    let storage = state.client.storage();
    let probe = async {
        storage.load_credential().await?;
        storage.load_selection().await
    };

    match probe.await {
        Err(ServiceError::Backend(error)) => {
            tracing::warn!(
                error = &error as &dyn std::error::Error,
                "storage unavailable, failing readiness"
            );
            (StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable")
        }
        _ => (StatusCode::OK, "OK"),
    }
}
