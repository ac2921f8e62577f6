use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{error::ApiResult, main_lib::AppState};
use foliotrack_storage_sqlite::db;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
}

/// Liveness plus a database round-trip.
async fn health(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    db::ping(&state.pool)?;
    Ok(Json(HealthResponse { status: "ok" }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
