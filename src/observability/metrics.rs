//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_matches_total` (counter): outcomes by status and language
//! - `router_redirects_total` (counter): canonicalizing redirects
//! - `router_match_duration_seconds` (histogram): resolve latency
//! - `router_routes_loaded` (gauge): routes in the active table
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter runs its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a match outcome.
pub fn record_match(status: u16, language: &str, start: Instant) {
    metrics::counter!(
        "router_matches_total",
        "status" => status.to_string(),
        "language" => language.to_string()
    )
    .increment(1);
    metrics::histogram!("router_match_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a canonicalizing redirect.
pub fn record_redirect() {
    metrics::counter!("router_redirects_total").increment(1);
}

/// Record the size of the active route table.
pub fn record_routes_loaded(count: usize) {
    metrics::gauge!("router_routes_loaded").set(count as f64);
}
