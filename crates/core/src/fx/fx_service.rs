use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::fx::fx_traits::FxServiceTrait;
use crate::quotes::QuoteServiceTrait;
use foliotrack_market_data::Instrument;

/// Currency conversion backed by the FX quote providers.
pub struct FxService {
    quote_service: Arc<dyn QuoteServiceTrait>,
}

impl FxService {
    pub fn new(quote_service: Arc<dyn QuoteServiceTrait>) -> Self {
        Self { quote_service }
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        let instrument = Instrument::Fx {
            from: from.to_string(),
            to: to.to_string(),
        };
        let quote = self
            .quote_service
            .get_quote(&instrument)
            .await
            .map_err(|e| {
                Error::CurrencyConversionFailed(format!("{}->{}: {}", from, to, e))
            })?;
        Ok(quote.price)
    }

    async fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal> {
        let rate = self.get_rate(from, to).await?;
        Ok(amount * rate)
    }
}
