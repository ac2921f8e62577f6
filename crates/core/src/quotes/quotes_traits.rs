use async_trait::async_trait;

use crate::errors::Result;
use foliotrack_market_data::{Instrument, MarketIndex, Quote};

/// Trait for fetching market quotes. Wraps the provider registry so
/// domain services can be tested against a fake.
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Latest quote for an instrument, served from cache when fresh.
    async fn get_quote(&self, instrument: &Instrument) -> Result<Quote>;

    /// Latest level and day change for a market index.
    async fn get_index(&self, symbol: &str, name: &str) -> Result<MarketIndex>;
}
