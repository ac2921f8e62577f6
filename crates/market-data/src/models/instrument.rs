use serde::{Deserialize, Serialize};

use super::types::Currency;

/// Classification of instruments, used for provider capability matching.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum InstrumentKind {
    /// A listed security (stock, ETF), addressed by exchange symbol.
    Security,
    /// A crypto asset, addressed by the vendor's coin id.
    Crypto,
    /// A currency pair.
    Fx,
    /// A market index (ticker strip).
    Index,
}

/// What to quote.
///
/// Providers receive the full instrument and pick the fields they need;
/// the ISIN on securities is informational (vendors are addressed by
/// symbol, the ISIN travels with the trade record).
#[derive(Clone, Debug, PartialEq)]
pub enum Instrument {
    Security {
        symbol: String,
        isin: Option<String>,
    },
    Crypto {
        id: String,
    },
    Fx {
        from: Currency,
        to: Currency,
    },
    Index {
        symbol: String,
    },
}

impl Instrument {
    pub fn kind(&self) -> InstrumentKind {
        match self {
            Instrument::Security { .. } => InstrumentKind::Security,
            Instrument::Crypto { .. } => InstrumentKind::Crypto,
            Instrument::Fx { .. } => InstrumentKind::Fx,
            Instrument::Index { .. } => InstrumentKind::Index,
        }
    }

    /// Stable key for the quote cache.
    pub fn cache_key(&self) -> String {
        match self {
            Instrument::Security { symbol, .. } => format!("sec:{}", symbol),
            Instrument::Crypto { id } => format!("crypto:{}", id),
            Instrument::Fx { from, to } => format!("fx:{}:{}", from, to),
            Instrument::Index { symbol } => format!("idx:{}", symbol),
        }
    }

    /// Human-readable identifier used in logs and error messages.
    pub fn display_symbol(&self) -> &str {
        match self {
            Instrument::Security { symbol, .. } => symbol,
            Instrument::Crypto { id } => id,
            Instrument::Fx { from, .. } => from,
            Instrument::Index { symbol } => symbol,
        }
    }
}
