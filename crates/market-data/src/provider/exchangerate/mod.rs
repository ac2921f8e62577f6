//! Fallback FX provider backed by open.er-api.com.
//!
//! Used when the ECB feed is unreachable. The endpoint returns a full rate
//! table for a base currency, so arbitrary pairs are served with one call.
//! No API key required.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{Instrument, InstrumentKind, Quote};
use crate::provider::capabilities::REQUEST_TIMEOUT;
use crate::provider::{ProviderCapabilities, QuoteProvider, RateLimit};

const BASE_URL: &str = "https://open.er-api.com/v6";
const PROVIDER_ID: &str = "EXCHANGERATE_API";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Fallback FX rate provider.
pub struct ExchangeRateApiProvider {
    client: Client,
}

impl ExchangeRateApiProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, MarketDataError> {
        let url = format!("{}/latest/{}", BASE_URL, from);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Request failed: {}", e),
                }
            }
        })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let body: LatestResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse rates response: {}", e),
                })?;

        if body.result != "success" {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Unexpected result: {}", body.result),
            });
        }

        body.rates.get(to).copied().ok_or_else(|| {
            MarketDataError::SymbolNotFound(format!("No rate for currency: {}", to))
        })
    }
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for ExchangeRateApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        // Tried after the ECB feed
        5
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            instrument_kinds: &[InstrumentKind::Fx],
            supports_index: false,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 30,
            burst: 5,
        }
    }

    async fn fetch_latest(&self, instrument: &Instrument) -> Result<Quote, MarketDataError> {
        let (from, to) = match instrument {
            Instrument::Fx { from, to } => (from.as_str(), to.as_str()),
            other => {
                return Err(MarketDataError::UnsupportedInstrument(format!(
                    "ExchangeRate API does not serve {:?}",
                    other.kind()
                )))
            }
        };

        if from == to {
            return Ok(Quote::new(
                &format!("{}{}", from, to),
                Decimal::ONE,
                to,
                PROVIDER_ID,
            ));
        }

        debug!("Fetching FX rate {}->{} from ExchangeRate API", from, to);

        let rate = self.fetch_rate(from, to).await?;

        let price = Decimal::try_from(rate).map_err(|_| MarketDataError::ValidationFailed {
            message: format!("Invalid FX rate {}->{}: {}", from, to, rate),
        })?;

        Ok(Quote {
            symbol: format!("{}{}", from, to),
            price,
            currency: to.to_string(),
            timestamp: Utc::now(),
            source: PROVIDER_ID.to_string(),
        })
    }
}
