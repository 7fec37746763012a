//! Prometheus metrics for the bundler.
//!
//! All metrics follow the naming convention: `bundler_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., bundles_submitted_total)
//! - **Gauge**: Value that can go up or down (e.g., items_pending)
//! - **Histogram**: Distribution of values (e.g., tick_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // ADMISSION METRICS
    // =========================================================================

    /// Items accepted into the store or the mempool
    pub static ref ITEMS_ADMITTED: CounterVec = CounterVec::new(
        Opts::new("bundler_items_admitted_total", "Items accepted by the admission policy"),
        &["strategy"]  // strategy: dependency/priority
    ).expect("metric creation failed");

    /// Items refused on arrival
    pub static ref ITEMS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("bundler_items_rejected_total", "Items refused on arrival"),
        &["reason"]  // reason: profit_below_minimum/cost_above_maximum/malformed
    ).expect("metric creation failed");

    /// Items in the store not yet part of a submitted bundle
    pub static ref PENDING_ITEMS: Gauge = Gauge::new(
        "bundler_items_pending",
        "Items waiting for a bundle"
    ).expect("metric creation failed");

    // =========================================================================
    // RESOLUTION METRICS
    // =========================================================================

    /// Cycle diagnostics reported by the resolver
    pub static ref CYCLES_DETECTED: Counter = Counter::new(
        "bundler_resolver_cycles_detected_total",
        "Dependency cycles found while resolving snapshots"
    ).expect("metric creation failed");

    /// Missing-dependency diagnostics reported by the resolver
    pub static ref MISSING_DEPENDENCIES: Counter = Counter::new(
        "bundler_resolver_missing_dependencies_total",
        "Declared dependencies absent from the resolved snapshot"
    ).expect("metric creation failed");

    // =========================================================================
    // BUNDLE METRICS
    // =========================================================================

    /// Bundles accepted by the sink
    pub static ref BUNDLES_SUBMITTED: Counter = Counter::new(
        "bundler_bundles_submitted_total",
        "Bundles accepted by the sink"
    ).expect("metric creation failed");

    /// Bundles the sink refused
    pub static ref SUBMISSION_FAILURES: Counter = Counter::new(
        "bundler_submission_failures_total",
        "Bundle submissions that failed"
    ).expect("metric creation failed");

    /// Items per submitted bundle
    pub static ref BUNDLE_SIZE: Histogram = Histogram::with_opts(
        HistogramOpts::new("bundler_bundle_size_items", "Items per submitted bundle")
            .buckets(vec![1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0, 89.0])
    ).expect("metric creation failed");

    /// Wall time of one tick (snapshot through submission)
    pub static ref TICK_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new("bundler_tick_duration_seconds", "Time spent in one scheduling tick")
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0])
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling it again is harmless: already registered collectors are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Admission
        Box::new(ITEMS_ADMITTED.clone()),
        Box::new(ITEMS_REJECTED.clone()),
        Box::new(PENDING_ITEMS.clone()),
        // Resolution
        Box::new(CYCLES_DETECTED.clone()),
        Box::new(MISSING_DEPENDENCIES.clone()),
        // Bundles
        Box::new(BUNDLES_SUBMITTED.clone()),
        Box::new(SUBMISSION_FAILURES.clone()),
        Box::new(BUNDLE_SIZE.clone()),
        Box::new(TICK_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
