//! Token bucket rate limiter for outbound provider calls.
//!
//! Each provider gets its own bucket with configurable capacity and refill
//! rate; buckets are created on demand.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::models::ProviderId;

const DEFAULT_REQUESTS_PER_MINUTE: f64 = 60.0;
const DEFAULT_BURST: f64 = 10.0;

/// Token bucket for a single provider.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
    /// Refill rate in tokens per second.
    rate: f64,
    capacity: f64,
}

impl TokenBucket {
    fn with_config(requests_per_minute: u32, capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: requests_per_minute as f64 / 60.0,
            capacity,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    fn try_acquire(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn time_until_available(&mut self) -> Duration {
        self.refill();
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.rate)
        }
    }
}

impl Default for TokenBucket {
    fn default() -> Self {
        Self::with_config(DEFAULT_REQUESTS_PER_MINUTE as u32, DEFAULT_BURST)
    }
}

/// Rate limiter configuration for a provider.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE as u32,
            burst: DEFAULT_BURST,
        }
    }
}

/// Thread-safe per-provider token bucket rate limiter.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    configs: Mutex<HashMap<String, RateLimitConfig>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            configs: Mutex::new(HashMap::new()),
        }
    }

    /// Recover from a poisoned mutex; the worst case is slightly incorrect
    /// rate limiting, which beats panicking.
    fn lock_buckets(&self) -> MutexGuard<'_, HashMap<String, TokenBucket>> {
        self.buckets.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter buckets mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_configs(&self) -> MutexGuard<'_, HashMap<String, RateLimitConfig>> {
        self.configs.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter configs mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Configure limits for a provider; resets its bucket if one exists.
    pub fn configure(&self, provider: &ProviderId, config: RateLimitConfig) {
        let mut configs = self.lock_configs();
        configs.insert(provider.to_string(), config);
        drop(configs);

        let mut buckets = self.lock_buckets();
        buckets.remove(provider.as_ref());
    }

    /// Wait (asynchronously) until a token is available for the provider.
    pub async fn acquire(&self, provider: &ProviderId) {
        loop {
            let wait_time = {
                let mut buckets = self.lock_buckets();
                let bucket = buckets
                    .entry(provider.to_string())
                    .or_insert_with(|| self.create_bucket(provider));

                if bucket.try_acquire() {
                    debug!("Rate limiter: acquired token for '{}'", provider);
                    return;
                }

                bucket.time_until_available()
            };

            if wait_time > Duration::ZERO {
                debug!(
                    "Rate limiter: waiting {:?} for provider '{}'",
                    wait_time, provider
                );
                tokio::time::sleep(wait_time).await;
            }
        }
    }

    /// Try to acquire a token without waiting.
    pub fn try_acquire(&self, provider: &ProviderId) -> bool {
        let mut buckets = self.lock_buckets();
        let bucket = buckets
            .entry(provider.to_string())
            .or_insert_with(|| self.create_bucket(provider));
        bucket.try_acquire()
    }

    fn create_bucket(&self, provider: &ProviderId) -> TokenBucket {
        let configs = self.lock_configs();
        match configs.get(provider.as_ref()) {
            Some(config) => TokenBucket::with_config(config.requests_per_minute, config.burst),
            None => TokenBucket::default(),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
