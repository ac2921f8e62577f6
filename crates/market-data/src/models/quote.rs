use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A latest market quote.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Symbol or cache key the quote was fetched for
    pub symbol: String,

    /// Current/closing price (always positive; enforced by the registry)
    pub price: Decimal,

    /// Quote currency
    pub currency: String,

    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Provider that produced the quote (FINNHUB, COINGECKO, ...)
    pub source: String,
}

impl Quote {
    pub fn new(symbol: &str, price: Decimal, currency: &str, source: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            price,
            currency: currency.to_string(),
            timestamp: Utc::now(),
            source: source.to_string(),
        }
    }
}
