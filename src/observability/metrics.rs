//! Metrics collection and exposition.
//!
//! # Metrics
//! - `todo_proxy_requests_total` (counter): requests by method, status, route
//! - `todo_proxy_request_duration_seconds` (histogram): latency by method, route
//! - `todo_proxy_upstream_errors_total` (counter): handler failures by kind
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    metrics::counter!(
        "todo_proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "todo_proxy_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a handler failure.
pub fn record_upstream_error(kind: &'static str) {
    metrics::counter!("todo_proxy_upstream_errors_total", "kind" => kind).increment(1);
}
