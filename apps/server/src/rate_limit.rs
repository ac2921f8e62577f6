//! Fixed-window in-memory rate limiting, keyed per client IP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::main_lib::AppState;

/// Per-key counters for the current window. Windows reset lazily on the
/// next request after they elapse.
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, (Instant, u32)>>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Count a request for the key; false when the window is full.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let entry = windows.entry(key.to_string()).or_insert((now, 0));
        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }
        if entry.1 >= self.max_requests {
            return false;
        }
        entry.1 += 1;
        true
    }
}

fn client_key(request: &Request<Body>) -> String {
    // Behind a proxy the peer address is the proxy's; prefer the
    // forwarded client.
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
    {
        return forwarded.trim().to_string();
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "local".to_string())
}

pub async fn enforce(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.rate_limiter.check(&client_key(&request)) {
        return Err(ApiError::TooManyRequests);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn request_from(peer: &str) -> Request<Body> {
        let mut request = Request::new(Body::empty());
        let addr: SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    #[test]
    fn distinct_peers_get_distinct_keys() {
        let first = client_key(&request_from("10.0.0.1:40000"));
        let second = client_key(&request_from("10.0.0.2:40000"));
        assert_eq!(first, "10.0.0.1");
        assert_eq!(second, "10.0.0.2");
        assert_ne!(first, second);
    }

    #[test]
    fn same_peer_on_different_ports_shares_a_key() {
        assert_eq!(
            client_key(&request_from("10.0.0.1:40000")),
            client_key(&request_from("10.0.0.1:40001")),
        );
    }

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let mut request = request_from("10.0.0.1:40000");
        request.headers_mut().insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_key(&request), "203.0.113.7");
    }

    #[test]
    fn requests_over_the_limit_are_rejected() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
    }

    #[test]
    fn keys_are_counted_independently() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(limiter.check("b"));
        assert!(!limiter.check("a"));
    }

    #[test]
    fn window_resets_after_it_elapses() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_millis(0));
        assert!(limiter.check("a"));
        // Zero-length window: the next request starts a fresh one.
        assert!(limiter.check("a"));
    }
}
