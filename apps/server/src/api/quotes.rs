use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};
use foliotrack_market_data::{Instrument, Quote};

#[derive(Deserialize)]
struct QuoteParams {
    /// "security" (default) or "crypto".
    kind: Option<String>,
    isin: Option<String>,
}

async fn get_quote(
    Path(symbol): Path<String>,
    Query(params): Query<QuoteParams>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Quote>> {
    let instrument = match params.kind.as_deref() {
        Some("crypto") => Instrument::Crypto { id: symbol },
        _ => Instrument::Security {
            symbol,
            isin: params.isin,
        },
    };
    let quote = state.quote_service.get_quote(&instrument).await?;
    Ok(Json(quote))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/quotes/{symbol}", get(get_quote))
}
