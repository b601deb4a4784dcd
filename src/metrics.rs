//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::IntCounter;

/// Global Prometheus handle reused in tests.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("arena")
        .endpoint("/metrics")
        .build()
        .expect("metrics builder")
});

/// Matches created by the inline pairing step.
pub static MATCHES_PAIRED: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new(
        "arena_matches_paired_total",
        "Matches created by the pairing step",
    )
    .expect("counter");
    METRICS
        .registry
        .register(Box::new(counter.clone()))
        .expect("register counter");
    counter
});
