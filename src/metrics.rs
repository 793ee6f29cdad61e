//! Prometheus metrics for probe reporting.
//!
//! This module provides:
//! - Report counters per probe and status
//! - Report latency per probe
//! - Check failure counters

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::health::Probe;

// === Metric Name Constants ===

/// Reports produced counter metric name.
pub const METRIC_HEALTH_REPORTS: &str = "health_reports_total";
/// Report latency metric name.
pub const METRIC_HEALTH_REPORT_LATENCY: &str = "health_report_latency_ms";
/// Failed checks counter metric name.
pub const METRIC_HEALTH_CHECK_FAILURES: &str = "health_check_failures_total";

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup; the handle renders the `/metrics` body.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_HEALTH_REPORTS,
        "Total number of probe snapshots produced"
    );
    describe_histogram!(
        METRIC_HEALTH_REPORT_LATENCY,
        "Time to produce a probe snapshot in milliseconds"
    );
    describe_counter!(
        METRIC_HEALTH_CHECK_FAILURES,
        "Total number of failed health checks"
    );

    debug!("Metrics initialized");
}

/// Record one produced snapshot.
pub fn record_report(probe: Probe, status: &str, start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HEALTH_REPORT_LATENCY, "probe" => probe.to_string()).record(latency_ms);
    counter!(
        METRIC_HEALTH_REPORTS,
        "probe" => probe.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment the failed check counter.
pub fn inc_check_failures(probe: Probe, check: &str, kind: &'static str) {
    counter!(
        METRIC_HEALTH_CHECK_FAILURES,
        "probe" => probe.to_string(),
        "check" => check.to_string(),
        "kind" => kind
    )
    .increment(1);
}
