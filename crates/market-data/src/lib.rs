//! Foliotrack Market Data Crate
//!
//! Provider-agnostic quote fetching for the portfolio tracker.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Security quotes (Finnhub)
//! - Crypto spot prices (CoinGecko)
//! - FX reference rates (ECB via Frankfurter, open.er-api.com fallback)
//! - Market index tickers with day change
//!
//! Fetching goes through a [`ProviderRegistry`] that tries providers in
//! priority order until one returns a usable (positive, parseable) price.
//! Latest quotes and FX rates are cached with a wall-clock TTL.
//!
//! # Core Types
//!
//! - [`Instrument`] - What to quote (security, crypto, FX pair, index)
//! - [`Quote`] - A latest price with currency, timestamp and source
//! - [`MarketIndex`] - An index level with day change
//! - [`QuoteProvider`] - Trait implemented by each vendor integration

pub mod cache;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use models::{Currency, Instrument, InstrumentKind, MarketIndex, ProviderId, Quote};

pub use provider::coingecko::CoinGeckoProvider;
pub use provider::exchangerate::ExchangeRateApiProvider;
pub use provider::finnhub::FinnhubProvider;
pub use provider::frankfurter::FrankfurterProvider;
pub use provider::{ProviderCapabilities, QuoteProvider, RateLimit};

pub use cache::QuoteCache;
pub use errors::{MarketDataError, RetryClass};
pub use registry::{ProviderRegistry, RateLimitConfig, RateLimiter};
