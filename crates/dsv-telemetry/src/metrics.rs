//! Prometheus metrics for signature validation.
//!
//! All metrics follow the naming convention: `dsv_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{exponential_buckets, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Signatures validated, by process indication
    pub static ref SIGNATURES_VALIDATED: CounterVec = CounterVec::new(
        Opts::new("dsv_signatures_validated_total", "Total signatures validated"),
        &["indication"]  // TOTAL_PASSED / TOTAL_FAILED / INDETERMINATE
    ).expect("metric creation failed");

    /// Orphan references found during reconciliation
    pub static ref ORPHAN_REFERENCES: CounterVec = CounterVec::new(
        Opts::new("dsv_orphan_references_total", "Declared references with no matching token"),
        &["category"]  // certificate / revocation
    ).expect("metric creation failed");

    /// Failed constraint checks, by level
    pub static ref CHECKS_FAILED: CounterVec = CounterVec::new(
        Opts::new("dsv_checks_failed_total", "Constraint checks that did not pass"),
        &["level"]  // FAIL / WARN / INFORM
    ).expect("metric creation failed");

    /// Per-signature validation duration
    pub static ref VALIDATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dsv_validation_duration_seconds",
            "Time spent validating one signature"
        ).buckets(exponential_buckets(0.0001, 2.0, 16).expect("bucket creation failed"))
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SIGNATURES_VALIDATED.clone()),
        Box::new(ORPHAN_REFERENCES.clone()),
        Box::new(CHECKS_FAILED.clone()),
        Box::new(VALIDATION_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Record one concluded signature.
pub fn record_signature(indication: &str, duration_secs: f64) {
    SIGNATURES_VALIDATED.with_label_values(&[indication]).inc();
    VALIDATION_DURATION.observe(duration_secs);
}

/// Record orphan references of one category.
pub fn record_orphans(category: &str, count: usize) {
    if count > 0 {
        ORPHAN_REFERENCES.with_label_values(&[category]).inc_by(count as f64);
    }
}

/// Record one failed check at the given level.
pub fn record_failed_check(level: &str) {
    CHECKS_FAILED.with_label_values(&[level]).inc();
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
