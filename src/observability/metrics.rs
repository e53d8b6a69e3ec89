//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): forwarded calls by method, status
//! - `gateway_request_duration_seconds` (histogram): upstream round-trip latency
//! - `gateway_transport_failures_total` (counter): unreachable backend by error code
//! - `renders_total` (counter): article renders by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed (tests, CLI)
//! - Prometheus exporter serves its own listener, separate from the site

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

pub const RENDER_SKIN: &str = "skin";
pub const RENDER_MISSING_SKIN: &str = "missing_skin";
pub const RENDER_UNREADABLE_TEMPLATE: &str = "unreadable_template";

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_gateway_request(method: &'static str, status: u16, elapsed: Duration) {
    counter!("gateway_requests_total", "method" => method, "status" => status.to_string())
        .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method)
        .record(elapsed.as_secs_f64());
}

pub fn record_transport_failure(code: &'static str) {
    counter!("gateway_transport_failures_total", "code" => code).increment(1);
}

pub fn record_render(outcome: &'static str) {
    counter!("renders_total", "outcome" => outcome).increment(1);
}
