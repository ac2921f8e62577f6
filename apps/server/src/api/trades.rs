use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};
use foliotrack_core::trades::{NewTrade, SellRequest, Trade, TradeUpdate};

async fn get_trades(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Trade>>> {
    let trades = state.trade_service.get_trades(&current.0)?;
    Ok(Json(trades))
}

async fn create_trade(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(new_trade): Json<NewTrade>,
) -> ApiResult<(StatusCode, Json<Trade>)> {
    let trade = state.trade_service.create_trade(&current.0, new_trade).await?;
    Ok((StatusCode::CREATED, Json(trade)))
}

async fn update_trade(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(mut update): Json<TradeUpdate>,
) -> ApiResult<Json<Trade>> {
    update.id = id;
    let trade = state.trade_service.update_trade(&current.0, update).await?;
    Ok(Json(trade))
}

async fn delete_trade(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    state.trade_service.delete_trade(&current.0, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn sell_trade(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(sale): Json<SellRequest>,
) -> ApiResult<Json<Trade>> {
    let trade = state.trade_service.sell_units(&current.0, &id, sale).await?;
    Ok(Json(trade))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trades", get(get_trades).post(create_trade))
        .route("/trades/{id}", put(update_trade).delete(delete_trade))
        .route("/trades/{id}/sell", post(sell_trade))
}
