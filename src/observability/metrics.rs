//! Metrics collection and exposition.
//!
//! # Metrics
//! - `explorer_requests_total` (counter): requests by endpoint, status
//! - `explorer_request_duration_seconds` (histogram): handler latency
//! - `explorer_upstream_calls_total` (counter): Etherscan calls by action, outcome
//! - `explorer_upstream_duration_seconds` (histogram): Etherscan latency by action
//! - `explorer_rate_limited_total` (counter): rejected client requests
//!
//! Without an installed recorder the macros are no-ops, so handlers record
//! unconditionally.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed client request.
pub fn record_request(endpoint: &str, status: u16, start: Instant) {
    counter!(
        "explorer_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("explorer_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound Etherscan call.
pub fn record_upstream_call(action: &str, outcome: &str, start: Instant) {
    counter!(
        "explorer_upstream_calls_total",
        "action" => action.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!("explorer_upstream_duration_seconds", "action" => action.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a request rejected by the rate limiter.
pub fn record_rate_limited() {
    counter!("explorer_rate_limited_total").increment(1);
}
