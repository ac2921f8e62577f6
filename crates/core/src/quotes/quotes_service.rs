use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;
use crate::quotes::quotes_traits::QuoteServiceTrait;
use foliotrack_market_data::{Instrument, MarketIndex, ProviderRegistry, Quote};

/// Quote service backed by the provider registry.
pub struct QuoteService {
    registry: Arc<ProviderRegistry>,
}

impl QuoteService {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn get_quote(&self, instrument: &Instrument) -> Result<Quote> {
        Ok(self.registry.get_latest(instrument).await?)
    }

    async fn get_index(&self, symbol: &str, name: &str) -> Result<MarketIndex> {
        Ok(self.registry.get_index(symbol, name).await?)
    }
}
