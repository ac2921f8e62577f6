//! CoinGecko quote provider.
//!
//! Serves crypto spot prices from the `/simple/price` endpoint. Coins are
//! addressed by CoinGecko id ("bitcoin", "ethereum"), not ticker.
//! No API key required for the public endpoint.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{Instrument, InstrumentKind, Quote};
use crate::provider::capabilities::REQUEST_TIMEOUT;
use crate::provider::{ProviderCapabilities, QuoteProvider, RateLimit};

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER_ID: &str = "COINGECKO";

/// CoinGecko crypto price provider.
pub struct CoinGeckoProvider {
    client: Client,
    /// Currency the prices are requested in (lowercase ISO code).
    vs_currency: String,
}

impl CoinGeckoProvider {
    pub fn new(vs_currency: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            vs_currency: vs_currency.to_lowercase(),
        }
    }

    async fn fetch_price(&self, coin_id: &str) -> Result<Decimal, MarketDataError> {
        let url = format!("{}/simple/price", BASE_URL);

        let response = self
            .client
            .get(&url)
            .query(&[("ids", coin_id), ("vs_currencies", &self.vs_currency)])
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

        // Response shape: { "<coin_id>": { "<vs_currency>": 12345.67 } }
        let body: HashMap<String, HashMap<String, f64>> =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse price response: {}", e),
                })?;

        let price = body
            .get(coin_id)
            .and_then(|prices| prices.get(&self.vs_currency))
            .copied()
            .ok_or_else(|| {
                // An unknown id comes back as an empty object, not an error
                MarketDataError::SymbolNotFound(format!("Unknown CoinGecko id: {}", coin_id))
            })?;

        Decimal::try_from(price).map_err(|_| MarketDataError::ValidationFailed {
            message: format!("Invalid price for {}: {}", coin_id, price),
        })
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            instrument_kinds: &[InstrumentKind::Crypto],
            supports_index: false,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            // Public endpoint allows roughly 10-30 calls/min; stay low
            requests_per_minute: 10,
            burst: 3,
        }
    }

    async fn fetch_latest(&self, instrument: &Instrument) -> Result<Quote, MarketDataError> {
        let coin_id = match instrument {
            Instrument::Crypto { id } => id,
            other => {
                return Err(MarketDataError::UnsupportedInstrument(format!(
                    "CoinGecko does not serve {:?}",
                    other.kind()
                )))
            }
        };

        debug!("Fetching spot price for {} from CoinGecko", coin_id);

        let price = self.fetch_price(coin_id).await?;

        Ok(Quote {
            symbol: coin_id.clone(),
            price,
            currency: self.vs_currency.to_uppercase(),
            timestamp: Utc::now(),
            source: PROVIDER_ID.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_metadata() {
        let provider = CoinGeckoProvider::new("EUR");
        assert_eq!(provider.id(), "COINGECKO");
        assert!(provider.capabilities().supports(InstrumentKind::Crypto));
        assert!(!provider.capabilities().supports(InstrumentKind::Security));
        assert_eq!(provider.vs_currency, "eur");
    }

    #[test]
    fn price_map_parsing() {
        let json = r#"{ "bitcoin": { "eur": 38123.45 } }"#;
        let body: HashMap<String, HashMap<String, f64>> = serde_json::from_str(json).unwrap();
        assert_eq!(body["bitcoin"]["eur"], 38123.45);
    }

    #[test]
    fn unknown_id_yields_empty_object() {
        let json = r#"{}"#;
        let body: HashMap<String, HashMap<String, f64>> = serde_json::from_str(json).unwrap();
        assert!(body.get("not-a-coin").is_none());
    }

    #[tokio::test]
    async fn rejects_non_crypto_instruments() {
        let provider = CoinGeckoProvider::new("eur");
        let err = provider
            .fetch_latest(&Instrument::Index {
                symbol: "^GSPC".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::UnsupportedInstrument(_)));
    }
}
