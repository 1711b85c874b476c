use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{error::iso_timestamp, state::AppState};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

#[utoipa::path(get, path = "/health", responses((status = 200, body = HealthResponse)))]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "vnquant-api".to_string(),
        timestamp: iso_timestamp(),
    })
}

/// Readiness probe: verifies one upstream dependency answers before the
/// service reports ready.
#[utoipa::path(get, path = "/ready", responses(
    (status = 200, description = "Ready"),
    (status = 503, description = "Dependency check failed"),
))]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> Response {
    let probe = match state.listings.get("vci") {
        Ok(listing) => listing.all_symbols().await.map(|_| ()),
        Err(e) => Err(e),
    };
    match probe {
        Ok(()) => Json(json!({ "ready": true, "timestamp": iso_timestamp() })).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "ready": false, "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
}
