//! Quote provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Instrument, MarketIndex, Quote};

use super::capabilities::{ProviderCapabilities, RateLimit};

/// Trait for quote providers.
///
/// Implement this trait to add support for a new vendor. The registry uses
/// the provider's capabilities and priority to decide which providers to try
/// for an instrument, and in which order.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "FINNHUB".
    /// Used for logging and rate limiter bookkeeping.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering. Lower values = higher priority.
    fn priority(&self) -> u8 {
        10
    }

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Rate limiting configuration applied by the registry.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Fetch the latest quote for an instrument.
    async fn fetch_latest(&self, instrument: &Instrument) -> Result<Quote, MarketDataError>;

    /// Fetch an index reading with day change.
    ///
    /// Default implementation returns `NotSupported`.
    async fn fetch_index(&self, symbol: &str, name: &str) -> Result<MarketIndex, MarketDataError> {
        let _ = (symbol, name);
        Err(MarketDataError::NotSupported {
            operation: "index".to_string(),
            provider: self.id().to_string(),
        })
    }
}
