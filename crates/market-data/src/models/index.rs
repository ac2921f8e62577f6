use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A market index level for the dashboard ticker strip.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndex {
    /// Provider symbol, e.g. "^GSPC"
    pub symbol: String,

    /// Display name, e.g. "S&P 500"
    pub name: String,

    /// Current index level
    pub price: Decimal,

    /// Absolute change vs. previous close
    pub change_abs: Decimal,

    /// Percent change vs. previous close
    pub change_pct: Decimal,

    /// Timestamp of the reading
    pub timestamp: DateTime<Utc>,

    /// Provider that produced the reading
    pub source: String,
}
