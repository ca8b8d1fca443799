//! Metrics collection and exposition.
//!
//! # Metrics
//! - `resource_requests_total` (counter): requests by action, status
//! - `resource_request_duration_seconds` (histogram): dispatch latency by action
//! - `resource_store_records` (gauge): records held by the data store

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }
}

/// Record one dispatched request.
pub fn record_request(action: &str, status: u16, start: Instant) {
    metrics::counter!(
        "resource_requests_total",
        "action" => action.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "resource_request_duration_seconds",
        "action" => action.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the current number of stored records.
pub fn record_store_size(len: usize) {
    metrics::gauge!("resource_store_records").set(len as f64);
}
