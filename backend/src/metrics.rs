// Prometheus metrics definitions for the Quest Master backend.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Counters ─────────────────────────────────────────────────────

    /// Total HTTP requests, by method/endpoint/status.
    pub static ref API_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("questmaster_api_requests_total", "Total API requests"),
        &["method", "endpoint", "status"],
    )
    .unwrap();

    /// Chat relay outcomes: ok, rejected, failed.
    pub static ref CHAT_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("questmaster_chat_requests_total", "Chat relay requests by outcome"),
        &["outcome"],
    )
    .unwrap();

    /// Signed-in visitors sent from the landing page to the dashboard.
    pub static ref LANDING_REDIRECTS_TOTAL: IntCounter = IntCounter::new(
        "questmaster_landing_redirects_total",
        "Landing page visits redirected to the dashboard",
    )
    .unwrap();

    /// Session lookups that failed and fell back to an anonymous render.
    pub static ref SESSION_CHECK_FAILURES_TOTAL: IntCounter = IntCounter::new(
        "questmaster_session_check_failures_total",
        "Session lookups that failed",
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Time spent waiting on the model provider.
    pub static ref CHAT_UPSTREAM_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "questmaster_chat_upstream_duration_seconds",
            "Model provider call duration in seconds",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(API_REQUESTS_TOTAL.clone()),
        Box::new(CHAT_REQUESTS_TOTAL.clone()),
        Box::new(LANDING_REDIRECTS_TOTAL.clone()),
        Box::new(SESSION_CHECK_FAILURES_TOTAL.clone()),
        Box::new(CHAT_UPSTREAM_DURATION_SECONDS.clone()),
    ];

    for c in collectors {
        if let Err(e) = REGISTRY.register(c) {
            tracing::warn!("Metric registration skipped: {e}");
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {e}");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice_does_not_panic() {
        register_metrics();
        register_metrics();
    }

    #[test]
    fn test_gather_metrics_contains_prefix() {
        register_metrics();
        CHAT_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
        let output = gather_metrics();
        assert!(output.contains("questmaster_chat_requests_total"));
    }

    #[test]
    fn test_metric_increments() {
        let before = LANDING_REDIRECTS_TOTAL.get();
        LANDING_REDIRECTS_TOTAL.inc();
        assert!(LANDING_REDIRECTS_TOTAL.get() > before);

        SESSION_CHECK_FAILURES_TOTAL.inc();
        CHAT_UPSTREAM_DURATION_SECONDS.observe(0.3);
        API_REQUESTS_TOTAL
            .with_label_values(&["POST", "/api/chat", "200"])
            .inc();
    }
}
