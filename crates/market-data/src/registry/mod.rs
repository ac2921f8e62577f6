//! Provider orchestration: fallback chain and per-provider rate limiting.

mod provider_registry;
mod rate_limiter;

pub use provider_registry::ProviderRegistry;
pub use rate_limiter::{RateLimitConfig, RateLimiter};
