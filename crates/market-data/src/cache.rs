//! Wall-clock TTL cache for latest quotes and FX rates.
//!
//! One logical slot per instrument key. `get` only returns entries younger
//! than the TTL; stale entries are evicted lazily on access.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::warn;

use crate::models::{MarketIndex, Quote};

/// Default freshness window for cached prices.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Generic keyed TTL cache.
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, (T, Instant)>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Lock the map, recovering from poison. Worst case of recovery is a
    /// stale or missing cache entry, which is always safe to serve or refetch.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, (T, Instant)>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Quote cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Return the cached value if it is still fresh.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some((value, inserted_at)) if inserted_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: &str, value: T) {
        let mut entries = self.lock();
        entries.insert(key.to_string(), (value, Instant::now()));
    }

    pub fn invalidate(&self, key: &str) {
        let mut entries = self.lock();
        entries.remove(key);
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.clear();
    }
}

/// Cache for latest quotes, keyed by `Instrument::cache_key()`.
pub type QuoteCache = TtlCache<Quote>;

/// Cache for index readings, keyed by index symbol.
pub type IndexCache = TtlCache<MarketIndex>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(price: rust_decimal::Decimal) -> Quote {
        Quote::new("AAPL", price, "USD", "FINNHUB")
    }

    #[test]
    fn fresh_entry_is_returned() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        cache.insert("sec:AAPL", quote(dec!(150)));
        assert_eq!(cache.get("sec:AAPL").unwrap().price, dec!(150));
    }

    #[test]
    fn missing_key_is_none() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        assert!(cache.get("sec:MSFT").is_none());
    }

    #[test]
    fn expired_entry_is_evicted() {
        let cache = QuoteCache::new(Duration::ZERO);
        cache.insert("sec:AAPL", quote(dec!(150)));
        assert!(cache.get("sec:AAPL").is_none());
    }

    #[test]
    fn insert_replaces_previous_slot() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        cache.insert("sec:AAPL", quote(dec!(150)));
        cache.insert("sec:AAPL", quote(dec!(151)));
        assert_eq!(cache.get("sec:AAPL").unwrap().price, dec!(151));
    }

    #[test]
    fn invalidate_removes_entry() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        cache.insert("sec:AAPL", quote(dec!(150)));
        cache.invalidate("sec:AAPL");
        assert!(cache.get("sec:AAPL").is_none());
    }
}
