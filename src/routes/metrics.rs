//! Prometheus metrics endpoint
//!
//! Exposes operation counters, latencies and stream activity in Prometheus format.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use tracing::warn;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    if metrics::set_global_recorder(recorder).is_err() {
        warn!("A global metrics recorder was already installed; /metrics will be empty");
    }
    handle
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    let _ = &*PROMETHEUS_HANDLE;
    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "courier_requests_total",
        "Completion calls by operation and outcome"
    );
    metrics::describe_histogram!(
        "courier_request_duration_seconds",
        "Time until the reply (buffered) or the stream head (streaming) was available"
    );
    metrics::describe_counter!(
        "courier_stream_chunks_total",
        "Normalized chunks delivered to callers"
    );
    metrics::describe_gauge!(
        "courier_active_streams",
        "Streams currently being relayed"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record one completion call
pub fn record_request(operation: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "courier_requests_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("courier_request_duration_seconds", "operation" => operation.to_string())
        .record(duration_secs);
}

/// Record chunks delivered by one finished stream
pub fn record_stream_chunks(operation: &str, count: usize) {
    metrics::counter!("courier_stream_chunks_total", "operation" => operation.to_string())
        .increment(count as u64);
}

/// Holds the active-streams gauge up for as long as it lives
pub struct StreamGauge(());

impl StreamGauge {
    pub fn open() -> Self {
        metrics::gauge!("courier_active_streams").increment(1.0);
        Self(())
    }
}

impl Drop for StreamGauge {
    fn drop(&mut self) {
        metrics::gauge!("courier_active_streams").decrement(1.0);
    }
}
