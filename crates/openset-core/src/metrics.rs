//! Prometheus metrics helpers for the OpenSet tools.
//!
//! This module provides centralized metrics initialization and the metric
//! descriptions used by the ingestion pipeline and the HTTP client.
//!
//! # Usage
//!
//! ```rust,ignore
//! use openset_core::metrics::{init_metrics, start_metrics_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = init_metrics();
//!     start_metrics_server(9091, handle).await.unwrap();
//!
//!     metrics::counter!("ingest_lines_total").increment(1);
//! }
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: component name (`ingest_`, `client_`)
//! - Suffix: unit or type (`_total`, `_bytes`, `_seconds`)
//! - Labels: used sparingly to avoid cardinality explosion

use axum::{Router, routing::get};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

/// Initialize the Prometheus metrics recorder.
///
/// This must be called once at startup before any metrics are recorded.
///
/// # Panics
///
/// Panics if called more than once (the recorder can only be installed once).
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    register_common_metrics();

    handle
}

/// Like [`init_metrics`] but returns `None` if a recorder is already installed.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().ok()?;
    register_common_metrics();
    Some(handle)
}

/// Start the Prometheus metrics HTTP server.
///
/// Binds `0.0.0.0:{port}` and serves `/metrics` from a background task.
/// Bind failures are returned; serve failures are logged.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Metrics server stopped: {}", e);
        }
    });

    Ok(())
}

/// Register descriptions for the metrics recorded by the OpenSet tools.
fn register_common_metrics() {
    // =========================================================================
    // Line Source / Parser
    // =========================================================================

    describe_counter!("ingest_files_total", "Source files fully read");
    describe_counter!(
        "ingest_files_failed_total",
        "Source files abandoned after an open or read error"
    );
    describe_counter!("ingest_lines_total", "Raw lines read from source files");
    describe_counter!(
        "ingest_bytes_total",
        "Bytes read from source files (line length + 1 per line)"
    );
    describe_counter!(
        "ingest_lines_malformed_total",
        "Lines discarded because they were not a JSON object"
    );

    // =========================================================================
    // Bounded Queue
    // =========================================================================

    describe_gauge!("ingest_queue_depth", "Parsed events waiting to be batched");
    describe_gauge!(
        "ingest_source_paused",
        "Whether the line source is paused by backpressure (1=yes, 0=no)"
    );

    // =========================================================================
    // Batch Shuttler
    // =========================================================================

    describe_counter!("ingest_batches_sent_total", "Batches acknowledged by the cluster");
    describe_counter!("ingest_batches_failed_total", "Batches rejected or lost in transit");
    describe_counter!("ingest_events_sent_total", "Events in acknowledged batches");
    describe_counter!("ingest_events_failed_total", "Events in failed batches");
    describe_histogram!(
        "ingest_batch_duration_seconds",
        "Round-trip time of one insert request"
    );
    describe_gauge!("ingest_events_per_second", "Rolling event throughput");
    describe_gauge!("ingest_bytes_per_second", "Rolling byte throughput");
    describe_gauge!(
        "ingest_running",
        "Whether an ingestion run is in progress (1=yes, 0=no)"
    );

    // =========================================================================
    // HTTP client
    // =========================================================================

    describe_counter!("client_requests_total", "Requests sent to the cluster (label: route)");
    describe_counter!(
        "client_request_errors_total",
        "Requests that failed or were rejected (label: route)"
    );
}

// =============================================================================
// Metric Recording Helpers
// =============================================================================

/// Increment a counter.
///
/// Convenience wrapper around `metrics::counter!`.
#[inline]
pub fn increment(name: &'static str, count: u64) {
    metrics::counter!(name).increment(count);
}

/// Set a gauge value.
///
/// Convenience wrapper around `metrics::gauge!`.
#[inline]
pub fn set_gauge(name: &'static str, value: f64) {
    metrics::gauge!(name).set(value);
}

/// Increment a counter labelled with the request route.
#[inline]
pub fn increment_route(name: &'static str, route: &'static str) {
    metrics::counter!(name, "route" => route).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn ensure_metrics_init() {
        INIT.call_once(|| {
            let _ = try_init_metrics();
        });
    }

    #[test]
    fn test_try_init_metrics_idempotent() {
        let handle1 = try_init_metrics();
        let handle2 = try_init_metrics();

        // At most one should succeed
        assert!(handle1.is_none() || handle2.is_none());
    }

    #[test]
    fn test_helpers_do_not_panic() {
        ensure_metrics_init();
        increment("test_counter", 0);
        increment("test_counter", 100);
        set_gauge("test_gauge", 42.5);
        set_gauge("test_gauge", f64::MAX);
        increment_route("test_route_total", "insert");
    }

    #[test]
    fn test_register_common_metrics_does_not_panic() {
        ensure_metrics_init();
        register_common_metrics();
        register_common_metrics();
    }
}
