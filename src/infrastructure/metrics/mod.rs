//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Analyses by service and outcome, with duration histograms
//! - Retry activity by operation and outcome
//! - Listing policy decisions by policy and result

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "property_intelligence";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Analyses performed, by service and outcome ("ok", "invalid", "unavailable")
pub static ANALYSES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("analyses_total", "Total number of analyses performed").namespace(NAMESPACE),
        &["service", "outcome"],
    )
    .expect("Failed to create ANALYSES_TOTAL metric")
});

/// Analysis latency, including model loading
pub static ANALYSIS_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0];
    HistogramVec::new(
        HistogramOpts::new("analysis_duration_seconds", "Analysis latency in seconds")
            .namespace(NAMESPACE)
            .buckets(buckets),
        &["service"],
    )
    .expect("Failed to create ANALYSIS_DURATION_SECONDS metric")
});

/// Retry events, by operation and outcome ("retried", "recovered", "exhausted", "aborted")
pub static RETRY_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("retry_events_total", "Retry events by operation").namespace(NAMESPACE),
        &["operation", "outcome"],
    )
    .expect("Failed to create RETRY_EVENTS_TOTAL metric")
});

/// Listing policy decisions, by policy and whether it allowed the action
pub static POLICY_DECISIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("policy_decisions_total", "Listing policy decisions").namespace(NAMESPACE),
        &["policy", "allowed"],
    )
    .expect("Failed to create POLICY_DECISIONS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(ANALYSES_TOTAL.clone()))
        .expect("Failed to register ANALYSES_TOTAL");
    registry
        .register(Box::new(ANALYSIS_DURATION_SECONDS.clone()))
        .expect("Failed to register ANALYSIS_DURATION_SECONDS");
    registry
        .register(Box::new(RETRY_EVENTS_TOTAL.clone()))
        .expect("Failed to register RETRY_EVENTS_TOTAL");
    registry
        .register(Box::new(POLICY_DECISIONS_TOTAL.clone()))
        .expect("Failed to register POLICY_DECISIONS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record a finished analysis
pub fn record_analysis(service: &str, outcome: &str, duration_secs: f64) {
    ANALYSES_TOTAL.with_label_values(&[service, outcome]).inc();
    ANALYSIS_DURATION_SECONDS
        .with_label_values(&[service])
        .observe(duration_secs);
}

/// Helper to record a retry event
pub fn record_retry(operation: &str, outcome: &str) {
    RETRY_EVENTS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Helper to record a policy decision
pub fn record_policy_decision(policy: &str, allowed: bool) {
    POLICY_DECISIONS_TOTAL
        .with_label_values(&[policy, if allowed { "true" } else { "false" }])
        .inc();
}
