//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, mount
//! - `router_request_duration_seconds` (histogram): latency distribution
//! - `router_rate_limited_total` (counter): over-limit requests by scope
//!
//! # Design Decisions
//! - Prometheus exposition on its own listener, separate from proxy traffic
//! - Recording without an installed exporter is a no-op, so tests stay quiet

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its scrape address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(error = %error, "Failed to install metrics exporter"),
    }
}

/// Record one routed (or rejected) request.
pub fn record_request(method: &str, status: u16, mount: &str, start: Instant) {
    counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "mount" => mount.to_string()
    )
    .increment(1);
    histogram!(
        "router_request_duration_seconds",
        "method" => method.to_string(),
        "mount" => mount.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request that exceeded its rate limit.
pub fn record_rate_limited(scope: &str) {
    counter!("router_rate_limited_total", "scope" => scope.to_string()).increment(1);
}
