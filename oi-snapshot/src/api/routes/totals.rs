//! Open-interest totals route.

use axum::{Json, Router, extract::State, routing::get};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::TotalsResponse;
use crate::api::server::AppState;

pub const DATA_NOT_READY: &str = "Data not yet available; try again in a few seconds.";

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(latest_totals))
}

/// Latest CE/PE totals, or 503 until the first cycle has succeeded.
async fn latest_totals(State(state): State<AppState>) -> ApiResult<Json<TotalsResponse>> {
    let snapshot = state
        .snapshots
        .get_latest()
        .ok_or_else(|| ApiError::service_unavailable(DATA_NOT_READY))?;
    Ok(Json(TotalsResponse::from(snapshot.as_ref())))
}
