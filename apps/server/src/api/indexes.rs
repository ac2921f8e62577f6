use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::{error::ApiResult, main_lib::AppState};
use foliotrack_core::constants::INDEX_TICKERS;
use foliotrack_market_data::MarketIndex;

/// Ticker strip for the dashboard. A vendor failure drops that index
/// from the response instead of failing the request.
async fn get_indexes(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<MarketIndex>>> {
    let mut indexes = Vec::with_capacity(INDEX_TICKERS.len());
    for (symbol, name) in INDEX_TICKERS {
        match state.quote_service.get_index(symbol, name).await {
            Ok(index) => indexes.push(index),
            Err(e) => tracing::warn!("Skipping index {}: {}", symbol, e),
        }
    }
    Ok(Json(indexes))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/indexes", get(get_indexes))
}
