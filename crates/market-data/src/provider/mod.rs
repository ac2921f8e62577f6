//! Quote provider implementations.

pub mod capabilities;
pub mod coingecko;
pub mod exchangerate;
pub mod finnhub;
pub mod frankfurter;
pub mod traits;

pub use capabilities::{ProviderCapabilities, RateLimit};
pub use traits::QuoteProvider;
