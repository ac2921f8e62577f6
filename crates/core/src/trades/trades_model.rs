//! Trade domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use foliotrack_market_data::Instrument;

/// What kind of asset a trade is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    /// Listed security, identified by exchange symbol and ISIN.
    Security,
    /// Crypto asset; `symbol` holds the CoinGecko id ("bitcoin").
    Crypto,
}

impl AssetKind {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            AssetKind::Security => "SECURITY",
            AssetKind::Crypto => "CRYPTO",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "SECURITY" => Some(AssetKind::Security),
            "CRYPTO" => Some(AssetKind::Crypto),
            _ => None,
        }
    }
}

/// A recorded buy, possibly partially sold since.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub user_id: String,
    pub kind: AssetKind,
    pub symbol: String,
    /// Required for securities, absent for crypto.
    pub isin: Option<String>,
    pub name: String,
    /// Units originally bought.
    pub units: Decimal,
    /// Price per unit at purchase, in `currency`.
    pub buy_price: Decimal,
    pub currency: String,
    pub buy_date: DateTime<Utc>,
    /// Units sold so far; never exceeds `units`.
    pub sold_units: Decimal,
    /// Profit realized by sales, accumulated in `currency`.
    pub realized_pl: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trade {
    /// Units still held.
    pub fn remaining_units(&self) -> Decimal {
        self.units - self.sold_units
    }

    /// Capital still invested (remaining units at buy price).
    pub fn invested_remaining(&self) -> Decimal {
        self.remaining_units() * self.buy_price
    }

    /// A trade whose full position was sold stays on record for its
    /// realized P/L.
    pub fn is_closed(&self) -> bool {
        self.remaining_units() == Decimal::ZERO
    }

    /// The market-data instrument to quote this trade with.
    pub fn instrument(&self) -> Instrument {
        match self.kind {
            AssetKind::Security => Instrument::Security {
                symbol: self.symbol.clone(),
                isin: self.isin.clone(),
            },
            AssetKind::Crypto => Instrument::Crypto {
                id: self.symbol.clone(),
            },
        }
    }
}

/// Input model for recording a buy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub kind: AssetKind,
    pub symbol: String,
    pub isin: Option<String>,
    pub name: String,
    pub units: Decimal,
    pub buy_price: Decimal,
    pub currency: String,
    pub buy_date: DateTime<Utc>,
}

/// Editable fields of an existing trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeUpdate {
    pub id: String,
    pub symbol: String,
    pub isin: Option<String>,
    pub name: String,
    pub units: Decimal,
    pub buy_price: Decimal,
    pub currency: String,
    pub buy_date: DateTime<Utc>,
}

/// A (partial) sale of a trade's units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellRequest {
    pub units: Decimal,
    pub sell_price: Decimal,
}

/// Validate an ISIN (ISO 6166): two-letter country code, nine
/// alphanumeric characters, and a Luhn check digit over the expanded
/// base-36 digits.
pub fn validate_isin(isin: &str) -> Result<()> {
    let bad = |msg: &str| ValidationError::InvalidIsin(format!("{}: {}", isin, msg)).into();

    if isin.len() != 12 {
        return Err(bad("must be 12 characters"));
    }
    if !isin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(bad("must be alphanumeric"));
    }
    if !isin[..2].chars().all(|c| c.is_ascii_uppercase()) {
        return Err(bad("must start with a two-letter country code"));
    }
    if !isin[11..].chars().all(|c| c.is_ascii_digit()) {
        return Err(bad("check character must be a digit"));
    }

    // Expand letters to two digits (A=10..Z=35), then run Luhn from the right.
    let digits: Vec<u32> = isin
        .chars()
        .flat_map(|c| {
            let v = c.to_digit(36).unwrap_or(0);
            if v >= 10 {
                vec![v / 10, v % 10]
            } else {
                vec![v]
            }
        })
        .collect();

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    if sum % 10 != 0 {
        return Err(bad("check digit mismatch"));
    }

    Ok(())
}
