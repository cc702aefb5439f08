//! Prometheus metrics for the snapshot publisher.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should crash at startup rather than fail silently. These panics only
//! occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram, CounterVec, GaugeVec, Histogram,
};

/// Snapshots published, per market.
pub static SNAPSHOTS_PUBLISHED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "bookcast_snapshots_published_total",
        "Total snapshots published downstream",
        &["market_key"]
    )
    .unwrap()
});

/// Snapshots suppressed by change detection, per market.
pub static SNAPSHOTS_SUPPRESSED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "bookcast_snapshots_suppressed_total",
        "Total snapshots suppressed as unchanged",
        &["market_key"]
    )
    .unwrap()
});

/// Recoverable per-market cycle failures.
pub static MARKET_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "bookcast_market_errors_total",
        "Total recoverable per-market cycle failures",
        &["market_key"]
    )
    .unwrap()
});

/// Failed writes to a sink destination.
pub static SINK_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "bookcast_sink_errors_total",
        "Total failed writes to a sink destination",
        &["market_key", "destination"]
    )
    .unwrap()
});

/// Full-pass cycle duration in milliseconds.
pub static CYCLE_DURATION_MS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "bookcast_cycle_duration_ms",
        "Duration of one full market pass in milliseconds",
        vec![0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0]
    )
    .unwrap()
});

/// Absolute book/oracle slot difference, per market.
pub static BOOK_ORACLE_SLOT_DIFF: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "bookcast_book_oracle_slot_diff",
        "Absolute difference between book slot and oracle slot",
        &["market_key"]
    )
    .unwrap()
});

/// Milliseconds since the market slot last changed, per market.
pub static MARKET_SLOT_AGE_MS: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "bookcast_market_slot_age_ms",
        "Milliseconds since the market logical clock last advanced",
        &["market_key"]
    )
    .unwrap()
});

/// Facade for metric recording.
pub struct Metrics;

impl Metrics {
    pub fn snapshot_published(market_key: &str) {
        SNAPSHOTS_PUBLISHED_TOTAL
            .with_label_values(&[market_key])
            .inc();
    }

    pub fn snapshot_suppressed(market_key: &str) {
        SNAPSHOTS_SUPPRESSED_TOTAL
            .with_label_values(&[market_key])
            .inc();
    }

    pub fn market_error(market_key: &str) {
        MARKET_ERRORS_TOTAL.with_label_values(&[market_key]).inc();
    }

    pub fn sink_error(market_key: &str, destination: &str) {
        SINK_ERRORS_TOTAL
            .with_label_values(&[market_key, destination])
            .inc();
    }

    pub fn cycle_duration_ms(ms: f64) {
        CYCLE_DURATION_MS.observe(ms);
    }

    pub fn slot_divergence(market_key: &str, diff: f64) {
        BOOK_ORACLE_SLOT_DIFF
            .with_label_values(&[market_key])
            .set(diff);
    }

    pub fn market_slot_age(market_key: &str, age_ms: f64) {
        MARKET_SLOT_AGE_MS
            .with_label_values(&[market_key])
            .set(age_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        Metrics::snapshot_published("perp:0");
        Metrics::snapshot_published("perp:0");
        Metrics::snapshot_suppressed("perp:0");

        assert!(
            SNAPSHOTS_PUBLISHED_TOTAL
                .with_label_values(&["perp:0"])
                .get()
                >= 2.0
        );
        assert!(
            SNAPSHOTS_SUPPRESSED_TOTAL
                .with_label_values(&["perp:0"])
                .get()
                >= 1.0
        );
    }

    #[test]
    fn test_sink_errors_labelled_by_destination() {
        Metrics::sink_error("perp:2", "channel");
        Metrics::sink_error("perp:2", "store");
        Metrics::sink_error("perp:2", "store");

        assert!(
            SINK_ERRORS_TOTAL
                .with_label_values(&["perp:2", "store"])
                .get()
                >= 2.0
        );
    }

    #[test]
    fn test_gauges_hold_last_value() {
        Metrics::slot_divergence("perp:1", 150.0);
        assert_eq!(
            BOOK_ORACLE_SLOT_DIFF.with_label_values(&["perp:1"]).get(),
            150.0
        );

        Metrics::market_slot_age("perp:1", 1234.0);
        assert_eq!(
            MARKET_SLOT_AGE_MS.with_label_values(&["perp:1"]).get(),
            1234.0
        );
    }
}
