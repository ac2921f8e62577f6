//! Finnhub quote provider.
//!
//! Serves security and index quotes from the Finnhub `/quote` endpoint.
//! Free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{Instrument, InstrumentKind, MarketIndex, Quote};
use crate::provider::capabilities::REQUEST_TIMEOUT;
use crate::provider::{ProviderCapabilities, QuoteProvider, RateLimit};

const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change vs. previous close
    d: Option<f64>,
    /// Percent change vs. previous close
    dp: Option<f64>,
    /// Open price of the day
    o: Option<f64>,
    /// Timestamp (Unix)
    t: Option<i64>,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Finnhub quote provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
}

impl FinnhubProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// GET /quote for a symbol, with the API key in a header.
    async fn fetch_quote_raw(&self, symbol: &str) -> Result<QuoteResponse, MarketDataError> {
        let url = format!("{}/quote", BASE_URL);

        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(&[("symbol", symbol)])
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

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(error_msg) = error_resp.error {
                    return Err(MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: error_msg,
                    });
                }
            }

            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e),
            })?;

        serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse quote response: {}", e),
        })
    }

    /// Validate the raw payload and turn it into a close price.
    ///
    /// Finnhub returns 0 for unknown symbols instead of an error.
    fn extract_price(symbol: &str, response: &QuoteResponse) -> Result<Decimal, MarketDataError> {
        let close = response.c.ok_or_else(|| {
            MarketDataError::SymbolNotFound(format!("No quote data for symbol: {}", symbol))
        })?;

        if close == 0.0 && response.o.unwrap_or(0.0) == 0.0 {
            return Err(MarketDataError::SymbolNotFound(format!(
                "Symbol not found or no trading data: {}",
                symbol
            )));
        }

        Decimal::try_from(close).map_err(|_| MarketDataError::ValidationFailed {
            message: format!("Invalid close price: {}", close),
        })
    }

    fn extract_symbol(instrument: &Instrument) -> Result<&str, MarketDataError> {
        match instrument {
            Instrument::Security { symbol, .. } | Instrument::Index { symbol } => Ok(symbol),
            other => Err(MarketDataError::UnsupportedInstrument(format!(
                "Finnhub does not serve {:?}",
                other.kind()
            ))),
        }
    }
}

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        // Primary source for securities and indices
        1
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            instrument_kinds: &[InstrumentKind::Security, InstrumentKind::Index],
            supports_index: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 60, // Free tier limit
            burst: 5,
        }
    }

    async fn fetch_latest(&self, instrument: &Instrument) -> Result<Quote, MarketDataError> {
        let symbol = Self::extract_symbol(instrument)?;

        debug!("Fetching latest quote for {} from Finnhub", symbol);

        let response = self.fetch_quote_raw(symbol).await?;
        let price = Self::extract_price(symbol, &response)?;

        let timestamp = response
            .t
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            // Finnhub quotes US-listed symbols in USD; non-USD listings are
            // converted downstream by the FX service.
            currency: "USD".to_string(),
            timestamp,
            source: PROVIDER_ID.to_string(),
        })
    }

    async fn fetch_index(&self, symbol: &str, name: &str) -> Result<MarketIndex, MarketDataError> {
        debug!("Fetching index reading for {} from Finnhub", symbol);

        let response = self.fetch_quote_raw(symbol).await?;
        let price = Self::extract_price(symbol, &response)?;

        let change_abs = response
            .d
            .and_then(|v| Decimal::try_from(v).ok())
            .unwrap_or_default();
        let change_pct = response
            .dp
            .and_then(|v| Decimal::try_from(v).ok())
            .unwrap_or_default();

        let timestamp = response
            .t
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        Ok(MarketIndex {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change_abs,
            change_pct,
            timestamp,
            source: PROVIDER_ID.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn provider_id_and_priority() {
        let provider = FinnhubProvider::new("test_key".to_string());
        assert_eq!(provider.id(), "FINNHUB");
        assert_eq!(provider.priority(), 1);
    }

    #[test]
    fn capabilities_cover_securities_and_indices() {
        let provider = FinnhubProvider::new("test_key".to_string());
        let caps = provider.capabilities();
        assert!(caps.supports(InstrumentKind::Security));
        assert!(caps.supports(InstrumentKind::Index));
        assert!(!caps.supports(InstrumentKind::Crypto));
        assert!(caps.supports_index);
    }

    #[test]
    fn extract_symbol_rejects_fx() {
        let instrument = Instrument::Fx {
            from: "EUR".to_string(),
            to: "USD".to_string(),
        };
        assert!(FinnhubProvider::extract_symbol(&instrument).is_err());
    }

    #[test]
    fn quote_response_parsing() {
        let json = r#"{
            "c": 150.25,
            "d": 1.50,
            "dp": 1.01,
            "h": 152.00,
            "l": 148.50,
            "o": 149.00,
            "pc": 148.75,
            "t": 1704067200
        }"#;

        let response: QuoteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.c, Some(150.25));
        assert_eq!(response.d, Some(1.50));
        assert_eq!(response.dp, Some(1.01));
    }

    #[test]
    fn zero_price_means_symbol_not_found() {
        let response = QuoteResponse {
            c: Some(0.0),
            d: None,
            dp: None,
            o: Some(0.0),
            t: None,
        };
        let err = FinnhubProvider::extract_price("NOPE", &response).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
    }

    #[test]
    fn valid_price_is_extracted() {
        let response = QuoteResponse {
            c: Some(150.25),
            d: Some(1.5),
            dp: Some(1.01),
            o: Some(149.0),
            t: Some(1704067200),
        };
        let price = FinnhubProvider::extract_price("AAPL", &response).unwrap();
        assert_eq!(price, dec!(150.25));
    }
}
