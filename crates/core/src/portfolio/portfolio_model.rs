//! Portfolio view models. All monetary figures are reported in the
//! base currency unless a field says otherwise.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::trades::AssetKind;

/// An open position: one trade enriched with its latest quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub trade_id: String,
    pub kind: AssetKind,
    pub symbol: String,
    pub isin: Option<String>,
    pub name: String,
    /// Units still held (bought minus sold).
    pub units: Decimal,
    /// Per-unit purchase price in `trade_currency`.
    pub buy_price: Decimal,
    pub trade_currency: String,
    pub buy_date: DateTime<Utc>,
    /// Remaining capital at purchase prices, in base currency. Absent
    /// when no FX rate to the base currency was available.
    pub invested: Option<Decimal>,
    /// Latest per-unit price in `trade_currency` terms is not kept;
    /// `current_value` already folds in quote currency and FX.
    pub current_value: Option<Decimal>,
    /// Unrealized P/L on the remaining units, in base currency.
    pub pl_abs: Option<Decimal>,
    /// Unrealized P/L as a percentage of `invested`.
    pub pl_pct: Option<Decimal>,
    /// P/L already locked in by sales, in base currency. Absent when
    /// no FX rate to the base currency was available.
    pub realized_pl: Option<Decimal>,
    /// Set when no provider could quote the instrument. Such positions
    /// are listed but excluded from portfolio totals.
    pub quote_missing: bool,
    /// Set when the trade currency could not be converted to the base
    /// currency. Degrades the position like `quote_missing` does.
    pub fx_missing: bool,
    /// Provider that produced the quote, when one did.
    pub quote_source: Option<String>,
}

/// Aggregate portfolio figures over all positions with quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub base_currency: String,
    pub total_invested: Decimal,
    pub total_value: Decimal,
    pub total_pl_abs: Decimal,
    pub total_pl_pct: Decimal,
    /// Realized P/L across all trades, open and closed.
    pub total_realized_pl: Decimal,
    pub positions: usize,
    /// Positions excluded from the totals for lack of a quote.
    pub quotes_missing: usize,
    /// Trades whose figures were left out of the totals because no FX
    /// rate to the base currency was available.
    pub fx_missing: usize,
}
