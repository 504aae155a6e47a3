//! Fixed-window rate limiting keyed by client IP.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::config::schema::RateLimitConfig;
use crate::http::request::client_key;
use crate::observability::metrics;

/// Counter record for one key.
#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    window: u64,
    count: u64,
}

/// Fixed-window counter store.
///
/// Windows derive from wall-clock seconds (`unix_secs / window_secs`), so
/// every instance sharing a clock agrees on window boundaries. The map entry
/// guard makes increment-and-check atomic per key.
pub struct FixedWindowLimiter {
    counters: DashMap<String, WindowCounter>,
    window_secs: u64,
    max_requests: u64,
}

impl FixedWindowLimiter {
    pub fn new(window_secs: u64, max_requests: u64) -> Self {
        Self {
            counters: DashMap::new(),
            // Validation rejects zero, but a zero window must never divide.
            window_secs: window_secs.max(1),
            max_requests,
        }
    }

    fn current_window(&self) -> u64 {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        now / self.window_secs
    }

    /// Record a request for `key`; returns true when the key is over its
    /// limit for the current window.
    pub fn record(&self, key: &str) -> bool {
        let window = self.current_window();
        let mut entry =
            self.counters.entry(key.to_string()).or_insert(WindowCounter { window, count: 0 });
        if entry.window != window {
            entry.window = window;
            entry.count = 0;
        }
        entry.count += 1;
        entry.count > self.max_requests
    }

    /// Drop counters from windows that can no longer influence a decision.
    pub fn sweep(&self) -> usize {
        let window = self.current_window();
        let before = self.counters.len();
        self.counters.retain(|_, counter| counter.window == window);
        before - self.counters.len()
    }
}

/// Shared limiter plus its configuration.
pub struct RateLimiterState {
    limiter: FixedWindowLimiter,
    config: RateLimitConfig,
}

impl RateLimiterState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            limiter: FixedWindowLimiter::new(config.window_secs, config.max_requests),
            config,
        }
    }

    /// Evaluate the limiter for a request, deriving the key from the trusted
    /// client-IP header. Disabled limiters always report "not limited".
    pub fn evaluate(&self, headers: &HeaderMap) -> RateLimitDecision {
        if !self.config.enabled {
            return RateLimitDecision { limited: false };
        }
        let key = client_key(headers, &self.config.ip_header);
        RateLimitDecision { limited: self.limiter.record(&key) }
    }

    /// Whether proxied mounts should reject over-limit requests.
    pub fn enforces_proxy_routes(&self) -> bool {
        self.config.enabled && self.config.enforce_proxy_routes
    }

    /// Drop stale window counters; returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.limiter.sweep()
    }
}

/// Request-scoped rate-limit decision, stored in request extensions.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub limited: bool,
}

/// Record the rate-limit decision for the status route without enforcing it.
///
/// The handler decides what to do with the flag; here it is only reported.
pub async fn observe_rate_limit(
    State(state): State<Arc<RateLimiterState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = state.evaluate(request.headers());
    if decision.limited {
        metrics::record_rate_limited("status");
    }
    request.extensions_mut().insert(decision);
    next.run(request).await
}

/// Enforce the limiter on proxied mounts when configured to do so.
pub async fn enforce_rate_limit(
    State(state): State<Arc<RateLimiterState>>,
    request: Request,
    next: Next,
) -> Response {
    if state.enforces_proxy_routes() {
        let decision = state.evaluate(request.headers());
        if decision.limited {
            tracing::warn!(path = %request.uri().path(), "Rate limit exceeded on proxied route");
            metrics::record_rate_limited("proxy");
            let mut response = Response::new(Body::from("Rate limit exceeded"));
            *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
            return response;
        }
    }
    next.run(request).await
}
