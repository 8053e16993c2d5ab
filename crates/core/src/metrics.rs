//! Prometheus metrics for core components.
//!
//! This module provides metrics for the scan pipeline. The server registers
//! them alongside its HTTP metrics.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Scan Metrics
// =============================================================================

/// Regular files visited by scans.
pub static FILES_SCANNED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "mediacat_scan_files_total",
        "Total regular files visited by scans",
    )
    .unwrap()
});

/// Records upserted into the catalog.
pub static RECORDS_INDEXED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "mediacat_scan_records_indexed_total",
        "Total records upserted into the catalog",
    )
    .unwrap()
});

/// Files skipped, by reason.
pub static FILES_SKIPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mediacat_scan_files_skipped_total", "Total files skipped"),
        &["reason"], // "no_metadata", "error"
    )
    .unwrap()
});

/// Stale records removed by prune passes.
pub static RECORDS_PRUNED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "mediacat_scan_records_pruned_total",
        "Total stale records removed after scans",
    )
    .unwrap()
});

/// Scan duration in seconds.
pub static SCAN_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("mediacat_scan_duration_seconds", "Duration of full scans")
            .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0, 900.0, 3600.0]),
        &["result"], // "completed", "cancelled", "failed"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(FILES_SCANNED.clone()),
        Box::new(RECORDS_INDEXED.clone()),
        Box::new(FILES_SKIPPED.clone()),
        Box::new(RECORDS_PRUNED.clone()),
        Box::new(SCAN_DURATION.clone()),
    ]
}
