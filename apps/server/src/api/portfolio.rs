use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};
use foliotrack_core::portfolio::{PortfolioSummary, Position};

async fn get_positions(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Position>>> {
    let positions = state.portfolio_service.get_positions(&current.0).await?;
    Ok(Json(positions))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<PortfolioSummary>> {
    let summary = state.portfolio_service.get_summary(&current.0).await?;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio/positions", get(get_positions))
        .route("/portfolio/summary", get(get_summary))
}
