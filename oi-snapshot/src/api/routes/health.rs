//! Health check routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};

use crate::api::models::{HealthResponse, HealthStatus};
use crate::api::server::AppState;

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness_check))
}

/// Poller and cache health. Always 200; the body carries the verdict.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let poller = state.status.snapshot();
    let snapshot = state.snapshots.get_latest();

    Json(HealthResponse {
        status: HealthStatus::evaluate(snapshot.is_some(), &poller),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        poller,
        snapshot_age_secs: snapshot.map(|s| s.age_secs()),
    })
}

/// Liveness check - is the service alive?
async fn liveness_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive",
            "uptime_secs": uptime
        })),
    )
}
