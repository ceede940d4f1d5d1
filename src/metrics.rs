//! Prometheus metrics for request counting and latency tracking.
//!
//! Handlers are recorded through the [`track_metrics`] middleware. Nothing is
//! exported unless [`install_exporter`] is called, which serves the Prometheus
//! scrape endpoint on its own listener so the application port keeps exactly
//! its three routes.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::debug;

use crate::error::{Result, ServiceError};

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";

/// Path label used for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(
        METRIC_HTTP_REQUESTS,
        "Total number of HTTP requests handled"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder with a scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn install_exporter(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ServiceError::Metrics(e.to_string()))?;

    debug!(%addr, "Prometheus exporter installed");
    Ok(())
}

/// Route label for a request: the matched route template, never the raw URI.
pub fn path_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_PATH.to_owned())
}

/// Middleware recording request count and latency per method/route/status.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = path_label(&req);
    let timer = LatencyTimer::new(METRIC_HTTP_REQUEST_LATENCY, method.clone(), path.clone());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(METRIC_HTTP_REQUESTS, "method" => method, "path" => path, "status" => status)
        .increment(1);
    drop(timer);

    response
}

/// RAII guard for timing a request.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
    method: String,
    path: String,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric and labels.
    pub fn new(metric_name: &'static str, method: String, path: String) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
            method,
            path,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.elapsed_ms();
        histogram!(
            self.metric_name,
            "method" => std::mem::take(&mut self.method),
            "path" => std::mem::take(&mut self.path)
        )
        .record(latency_ms);
    }
}
