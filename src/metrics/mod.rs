//! Prometheus metrics for batch scoring runs
//!
//! This module tracks request outcomes, exchange latency, and artifact writes.
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Encoder,
    Histogram, TextEncoder,
};
use std::path::Path;
use std::sync::OnceLock;

use crate::error::Error;
use crate::models::{FailureKind, OutputFormat};

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for all batch metrics
struct BatchMetrics {
    requests: CounterVec,
    request_duration: Histogram,
    artifacts_written: CounterVec,
    artifact_write_failures: CounterVec,
    items_abandoned: Counter,
}

/// Global storage for batch metrics; `None` when registration failed
static BATCH_METRICS: OnceLock<Option<BatchMetrics>> = OnceLock::new();

fn metrics() -> Option<&'static BatchMetrics> {
    BATCH_METRICS.get().and_then(Option::as_ref)
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// This function should be called once at application startup; later calls
/// return the outcome of the first one. If metric registration fails,
/// subsequent metric operations become no-ops.
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    let metrics = BATCH_METRICS.get_or_init(|| match register_metrics() {
        Ok(m) => {
            tracing::debug!("Prometheus metrics initialized");
            Some(m)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Metrics registration failed");
            None
        }
    });

    if metrics.is_some() {
        Ok(())
    } else {
        Err("Metrics registration failed".into())
    }
}

fn register_metrics() -> prometheus::Result<BatchMetrics> {
    Ok(BatchMetrics {
        requests: register_counter_vec!(
            "guid_bench_requests_total",
            "Scoring exchanges by outcome (HTTP status class or failure kind)",
            &["outcome"]
        )?,
        request_duration: register_histogram!(
            "guid_bench_request_duration_seconds",
            "Duration of completed scoring exchanges in seconds",
            vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
        )?,
        artifacts_written: register_counter_vec!(
            "guid_bench_artifacts_written_total",
            "Success artifacts written by format",
            &["format"]
        )?,
        artifact_write_failures: register_counter_vec!(
            "guid_bench_artifact_write_failures_total",
            "Success artifacts that could not be written, by format",
            &["format"]
        )?,
        items_abandoned: register_counter!(
            "guid_bench_items_abandoned_total",
            "Items still outstanding when the batch deadline elapsed"
        )?,
    })
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    metrics().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Write the text exposition of all metrics to `path`
pub fn write_metrics(path: &Path) -> crate::error::Result<()> {
    let text =
        encode_metrics().map_err(|e| Error::other(format!("Failed to encode metrics: {e}")))?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Record a completed exchange
pub fn record_response(status_code: u16, duration_ms: u64) {
    let Some(m) = metrics() else {
        return;
    };

    let class = format!("{}xx", status_code / 100);
    m.requests.with_label_values(&[class.as_str()]).inc();
    m.request_duration.observe(duration_ms as f64 / 1000.0);
}

/// Record a failed exchange
pub fn record_failure(kind: FailureKind) {
    if let Some(m) = metrics() {
        m.requests.with_label_values(&[kind.as_str()]).inc();
    }
}

/// Record a written success artifact
pub fn record_artifact_written(format: OutputFormat) {
    if let Some(m) = metrics() {
        m.artifacts_written
            .with_label_values(&[format.as_str()])
            .inc();
    }
}

/// Record a success artifact that could not be written
pub fn record_artifact_write_failure(format: OutputFormat) {
    if let Some(m) = metrics() {
        m.artifact_write_failures
            .with_label_values(&[format.as_str()])
            .inc();
    }
}

/// Record items abandoned at the batch deadline
pub fn record_abandoned(count: usize) {
    if count == 0 {
        return;
    }
    if let Some(m) = metrics() {
        m.items_abandoned.inc_by(count as f64);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ensure_metrics_initialized() {
        let _ = init_metrics();
    }

    #[test]
    fn test_init_metrics_is_idempotent() {
        assert!(init_metrics().is_ok());
        assert!(init_metrics().is_ok());
        assert!(metrics_initialized());
    }

    #[test]
    fn test_record_and_encode() {
        ensure_metrics_initialized();

        record_response(200, 150);
        record_response(503, 20);
        record_failure(FailureKind::Timeout);
        record_artifact_written(OutputFormat::StructuredJson);
        record_artifact_write_failure(OutputFormat::RawJson);
        record_abandoned(2);

        let text = encode_metrics().unwrap();
        assert!(text.contains("guid_bench_requests_total"));
        assert!(text.contains("outcome=\"2xx\""));
        assert!(text.contains("outcome=\"timeout\""));
        assert!(text.contains("guid_bench_request_duration_seconds"));
        assert!(text.contains("format=\"structured-json\""));
        assert!(text.contains("guid_bench_items_abandoned_total"));
    }

    #[test]
    fn test_write_metrics_file() {
        ensure_metrics_initialized();
        record_response(200, 40);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("metrics.prom");
        write_metrics(&path).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("guid_bench_requests_total"));

        let err = write_metrics(&dir.path().join("missing").join("metrics.prom")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
