//! Prometheus metrics for core components.
//!
//! The server registers [`all_metrics`] in its registry next to its own HTTP
//! metrics.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Browse queries by executing backend and outcome.
pub static BROWSE_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("nyaa_browse_queries_total", "Total browse/search queries"),
        &["backend", "result"], // result: "ok", "error"
    )
    .unwrap()
});

/// Backend round-trip time.
pub static BROWSE_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "nyaa_browse_query_duration_seconds",
            "Duration of backend query execution",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["backend"],
    )
    .unwrap()
});

/// Torrents dropped by visibility rules after the backend returned them.
pub static HIDDEN_RECORDS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "nyaa_hidden_records_total",
            "Records filtered out by visibility rules during projection",
        ),
        &["backend"],
    )
    .unwrap()
});

/// Collect every core metric for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BROWSE_QUERIES.clone()),
        Box::new(BROWSE_QUERY_DURATION.clone()),
        Box::new(HIDDEN_RECORDS.clone()),
    ]
}
