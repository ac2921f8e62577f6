//! Frankfurter FX provider (ECB reference rates).
//!
//! Frankfurter republishes the ECB daily reference rates as JSON. No API key,
//! EUR is the natural base; cross rates for non-EUR pairs are derived through
//! EUR, which is exactly what the ECB feed supports.

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

const BASE_URL: &str = "https://api.frankfurter.dev/v1";
const PROVIDER_ID: &str = "FRANKFURTER";

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// ECB reference rate provider, served through the Frankfurter mirror.
pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Fetch EUR-based rates for the given symbols.
    async fn fetch_eur_rates(
        &self,
        symbols: &[&str],
    ) -> Result<HashMap<String, f64>, MarketDataError> {
        let url = format!("{}/latest", BASE_URL);
        let symbols_param = symbols.join(",");

        let response = self
            .client
            .get(&url)
            .query(&[("base", "EUR"), ("symbols", symbols_param.as_str())])
            .send()
            .await
            .map_err(|e| {
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

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let body: RatesResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse rates response: {}", e),
                })?;

        Ok(body.rates)
    }

    /// Derive rate(from -> to) from EUR-based rates.
    ///
    /// rate(a -> b) = rate(EUR -> b) / rate(EUR -> a)
    fn cross_rate(
        from: &str,
        to: &str,
        rates: &HashMap<String, f64>,
    ) -> Result<f64, MarketDataError> {
        let eur_to = |ccy: &str| -> Result<f64, MarketDataError> {
            if ccy == "EUR" {
                return Ok(1.0);
            }
            rates.get(ccy).copied().ok_or_else(|| {
                MarketDataError::SymbolNotFound(format!("ECB does not quote currency: {}", ccy))
            })
        };

        let eur_from = eur_to(from)?;
        let eur_target = eur_to(to)?;

        if eur_from <= 0.0 {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Non-positive EUR rate for {}", from),
            });
        }

        Ok(eur_target / eur_from)
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for FrankfurterProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        // Primary FX source (official ECB reference data)
        1
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            instrument_kinds: &[InstrumentKind::Fx],
            supports_index: false,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            // Rates change once a day; be polite anyway
            requests_per_minute: 30,
            burst: 5,
        }
    }

    async fn fetch_latest(&self, instrument: &Instrument) -> Result<Quote, MarketDataError> {
        let (from, to) = match instrument {
            Instrument::Fx { from, to } => (from.as_str(), to.as_str()),
            other => {
                return Err(MarketDataError::UnsupportedInstrument(format!(
                    "Frankfurter does not serve {:?}",
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

        debug!("Fetching FX rate {}->{} from Frankfurter", from, to);

        let symbols: Vec<&str> = [from, to].iter().copied().filter(|c| *c != "EUR").collect();
        let rates = self.fetch_eur_rates(&symbols).await?;
        let rate = Self::cross_rate(from, to, &rates)?;

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
