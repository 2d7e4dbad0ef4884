//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): gate outcomes by `outcome` (allow, redirect)
//! - `gate_requests_total` (counter): responses by `method`, `status`,
//!   recorded by the gate middleware for redirects, health checks and
//!   forwarded requests alike
//! - `gate_request_duration_seconds` (histogram): latency by `method`
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder the
//!   calls are no-ops, so tests and `check` need no setup
//! - Prometheus exporter is opt-in via config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Count one gate outcome.
pub fn record_decision(outcome: &'static str) {
    metrics::counter!("gate_decisions_total", "outcome" => outcome).increment(1);
}

/// Count one finished request and its latency.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gate_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gate_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}
