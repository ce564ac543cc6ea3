//! Request metrics for the HTTP gateway, registered once at startup.

use axum::body::Bytes;
use axum::http::{header::CONTENT_TYPE, HeaderName};
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::Once;
use std::time::Instant;

static HTTP_REQ_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static HTTP_REQ_LATENCY: OnceCell<HistogramVec> = OnceCell::new();
static INSTALL: Once = Once::new();

/// Registers the gateway request metrics. Idempotent; must run before the
/// first call to [`observe_request`].
pub fn install_http_metrics() {
    INSTALL.call_once(|| {
        let _ = HTTP_REQ_TOTAL.set(
            register_int_counter_vec!(
                "sortlab_http_requests_total",
                "Total HTTP requests handled by the exercise gateway",
                &["route", "method", "result"]
            )
            .expect("register_int_counter_vec"),
        );
        let _ = HTTP_REQ_LATENCY.set(
            register_histogram_vec!(
                "sortlab_http_request_duration_seconds",
                "Latency of HTTP requests handled by the exercise gateway (seconds)",
                &["route", "method", "result"],
                exponential_buckets(0.001, 2.0, 15).expect("buckets")
            )
            .expect("register_histogram_vec"),
        );
    });
}

/// Records one handled request: counter increment plus latency observation.
pub fn observe_request(route: &str, method: &str, result: &str, started: Instant) {
    let total = HTTP_REQ_TOTAL
        .get()
        .expect("install_http_metrics() must be called before serving");
    let latency = HTTP_REQ_LATENCY
        .get()
        .expect("install_http_metrics() must be called before serving");
    total.with_label_values(&[route, method, result]).inc();
    latency
        .with_label_values(&[route, method, result])
        .observe(started.elapsed().as_secs_f64());
}

/// Serves the whole prometheus registry in text exposition format.
pub async fn metrics_handler() -> ([(HeaderName, String); 1], Bytes) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buf = Vec::with_capacity(1 << 16);
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::error!(error=%e, "Failed to encode prometheus metrics");
    }
    (
        [(CONTENT_TYPE, encoder.format_type().to_string())],
        buf.into(),
    )
}
