//! Health check endpoints
//!
//! - /api/health/ping - liveness
//! - /api/health/version - build and environment info
//! - /api/health/ready - readiness probe (checks the store)

use crate::config::AppConfig;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use beer_review_shared::{PingResponse, ReadinessResponse, VersionResponse};
use tracing::warn;

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/version", get(version))
        .route("/ready", get(readiness_check))
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { pong: true })
}

pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        env: AppConfig::environment(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
    })
}

/// Returns 503 if the store does not answer
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    match state.repositories().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                message: None,
            }),
        ),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready".to_string(),
                    message: Some("Storage is unavailable".to_string()),
                }),
            )
        }
    }
}
