//! Prometheus metrics for pricefeed.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration failure
//! means duplicate metric names, a programming error that should crash on
//! first use rather than silently drop samples.

use crate::error::TelemetryResult;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_gauge, CounterVec, HistogramVec,
    IntGauge, TextEncoder,
};

/// Source fetches by outcome.
/// Labels: source, outcome (ok/failure/timeout)
pub static SOURCE_FETCH_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricefeed_source_fetch_total",
        "Total source fetches by outcome",
        &["source", "outcome"]
    )
    .unwrap()
});

/// Time until a source answered, in milliseconds. Timeouts are not observed.
pub static SOURCE_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "pricefeed_source_latency_ms",
        "Source response latency in milliseconds",
        &["source"],
        vec![10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// Sources that contributed to the last consensus value.
pub static CONSENSUS_SOURCES: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "pricefeed_consensus_sources",
        "Number of sources in the last consensus"
    )
    .unwrap()
});

/// Resolutions by outcome.
/// Labels: outcome (ok/unsupported_symbol/no_quorum/invalid_result/source_error/...)
pub static RESOLVE_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricefeed_resolve_total",
        "Total price resolutions by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record one source outcome.
    pub fn source_fetch(source: &str, outcome: &str) {
        SOURCE_FETCH_TOTAL
            .with_label_values(&[source, outcome])
            .inc();
    }

    /// Record how long a source took to answer.
    pub fn source_latency(source: &str, latency_ms: f64) {
        SOURCE_LATENCY_MS
            .with_label_values(&[source])
            .observe(latency_ms);
    }

    pub fn consensus_sources(count: usize) {
        CONSENSUS_SOURCES.set(count as i64);
    }

    pub fn resolve(outcome: &str) {
        RESOLVE_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Render every registered metric in the text exposition format.
    pub fn gather_text() -> TelemetryResult<String> {
        let families = prometheus::gather();
        Ok(TextEncoder::new().encode_to_string(&families)?)
    }
}
