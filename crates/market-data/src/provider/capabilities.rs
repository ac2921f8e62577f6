//! Provider capabilities and rate limiting configuration.

use std::time::Duration;

use crate::models::InstrumentKind;

/// Describes the capabilities of a quote provider.
///
/// Used by the registry to determine which providers can handle
/// a given instrument kind.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Instrument kinds this provider supports.
    pub instrument_kinds: &'static [InstrumentKind],

    /// Whether the provider can serve index readings with day change.
    pub supports_index: bool,
}

impl ProviderCapabilities {
    pub fn supports(&self, kind: InstrumentKind) -> bool {
        self.instrument_kinds.contains(&kind)
    }
}

/// Rate limiting configuration for a provider.
///
/// Controls how aggressively we call a vendor so we do not trip
/// their limits and get blocked.
#[derive(Clone, Debug)]
pub struct RateLimit {
    /// Maximum requests allowed per minute.
    pub requests_per_minute: u32,

    /// Maximum burst of requests allowed at once.
    pub burst: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            burst: 10,
        }
    }
}

/// Per-request timeout applied by every provider.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
