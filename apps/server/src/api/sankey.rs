use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};
use foliotrack_core::sankey::SankeyConfig;

async fn get_config(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Option<SankeyConfig>>> {
    let config = state.sankey_service.get_config(&current.0)?;
    Ok(Json(config))
}

async fn save_config(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(config): Json<SankeyConfig>,
) -> ApiResult<Json<SankeyConfig>> {
    let saved = state.sankey_service.save_config(&current.0, config).await?;
    Ok(Json(saved))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/sankey", get(get_config).put(save_config))
}
