//! Provider registry: cache-through fetching with sequential fallback.
//!
//! The registry tries providers in priority order until one returns a
//! positive, parseable price. Errors classified as terminal stop the loop;
//! anything else falls through to the next provider. Successful fetches are
//! cached with a wall-clock TTL.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use rust_decimal::Decimal;

use super::{RateLimitConfig, RateLimiter};
use crate::cache::{IndexCache, QuoteCache, DEFAULT_TTL};
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{Instrument, InstrumentKind, MarketIndex, ProviderId, Quote};
use crate::provider::QuoteProvider;

/// Orchestrates quote fetching across providers.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn QuoteProvider>>,
    rate_limiter: RateLimiter,
    quote_cache: QuoteCache,
    index_cache: IndexCache,
}

impl ProviderRegistry {
    /// Create a registry with the default cache TTL.
    ///
    /// Rate limits are taken from each provider's declared `rate_limit()`.
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        Self::with_ttl(providers, DEFAULT_TTL)
    }

    pub fn with_ttl(providers: Vec<Arc<dyn QuoteProvider>>, cache_ttl: Duration) -> Self {
        let rate_limiter = RateLimiter::new();

        for provider in &providers {
            let limit = provider.rate_limit();
            let provider_id: ProviderId = Cow::Borrowed(provider.id());
            rate_limiter.configure(
                &provider_id,
                RateLimitConfig {
                    requests_per_minute: limit.requests_per_minute,
                    burst: limit.burst as f64,
                },
            );
        }

        Self {
            providers,
            rate_limiter,
            quote_cache: QuoteCache::new(cache_ttl),
            index_cache: IndexCache::new(cache_ttl),
        }
    }

    /// Providers that can serve the given instrument kind, best first.
    fn eligible(&self, kind: InstrumentKind) -> Vec<Arc<dyn QuoteProvider>> {
        let mut eligible: Vec<_> = self
            .providers
            .iter()
            .filter(|p| p.capabilities().supports(kind))
            .cloned()
            .collect();
        eligible.sort_by_key(|p| p.priority());
        eligible
    }

    /// Latest quote for an instrument, served from cache when fresh.
    pub async fn get_latest(&self, instrument: &Instrument) -> Result<Quote, MarketDataError> {
        let key = instrument.cache_key();

        if let Some(quote) = self.quote_cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(quote);
        }

        let quote = self.fetch_latest(instrument).await?;
        self.quote_cache.insert(&key, quote.clone());
        Ok(quote)
    }

    /// Index reading with day change, served from cache when fresh.
    pub async fn get_index(
        &self,
        symbol: &str,
        name: &str,
    ) -> Result<MarketIndex, MarketDataError> {
        if let Some(reading) = self.index_cache.get(symbol) {
            debug!("Cache hit for index {}", symbol);
            return Ok(reading);
        }

        let providers: Vec<_> = self
            .eligible(InstrumentKind::Index)
            .into_iter()
            .filter(|p| p.capabilities().supports_index)
            .collect();

        if providers.is_empty() {
            return Err(MarketDataError::NoProvidersAvailable);
        }

        let mut last_error: Option<MarketDataError> = None;

        for provider in providers {
            let provider_id: ProviderId = Cow::Borrowed(provider.id());
            self.rate_limiter.acquire(&provider_id).await;

            match provider.fetch_index(symbol, name).await {
                Ok(reading) if reading.price > Decimal::ZERO => {
                    self.index_cache.insert(symbol, reading.clone());
                    return Ok(reading);
                }
                Ok(reading) => {
                    warn!(
                        "Provider '{}' returned non-positive level {} for index {}",
                        provider_id, reading.price, symbol
                    );
                    last_error = Some(MarketDataError::ValidationFailed {
                        message: format!("non-positive index level from {}", provider_id),
                    });
                }
                Err(e) => {
                    if e.retry_class() == RetryClass::Never {
                        return Err(e);
                    }
                    warn!("Provider '{}' failed for index {}: {}", provider_id, symbol, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(MarketDataError::AllProvidersFailed))
    }

    /// Fetch a latest quote, bypassing the cache.
    async fn fetch_latest(&self, instrument: &Instrument) -> Result<Quote, MarketDataError> {
        let providers = self.eligible(instrument.kind());

        if providers.is_empty() {
            warn!(
                "No providers available for instrument kind: {:?}",
                instrument.kind()
            );
            return Err(MarketDataError::NoProvidersAvailable);
        }

        let mut last_error: Option<MarketDataError> = None;

        for provider in providers {
            let provider_id: ProviderId = Cow::Borrowed(provider.id());
            self.rate_limiter.acquire(&provider_id).await;

            match provider.fetch_latest(instrument).await {
                Ok(quote) if quote.price > Decimal::ZERO => {
                    debug!(
                        "Provider '{}' served {} at {}",
                        provider_id,
                        instrument.display_symbol(),
                        quote.price
                    );
                    return Ok(quote);
                }
                Ok(quote) => {
                    // Reject and fall through; a zero price is a vendor quirk,
                    // not a usable quote.
                    warn!(
                        "Provider '{}' returned non-positive price {} for {}",
                        provider_id,
                        quote.price,
                        instrument.display_symbol()
                    );
                    last_error = Some(MarketDataError::ValidationFailed {
                        message: format!("non-positive price from {}", provider_id),
                    });
                }
                Err(e) => {
                    if e.retry_class() == RetryClass::Never {
                        return Err(e);
                    }
                    warn!(
                        "Provider '{}' failed for {}: {}",
                        provider_id,
                        instrument.display_symbol(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(MarketDataError::AllProvidersFailed))
    }
}
