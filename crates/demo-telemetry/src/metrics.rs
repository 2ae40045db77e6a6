//! Prometheus metrics for the demo service.
//!
//! The exporter listens on its own address so the service's HTTP surface is
//! unchanged. Recording functions are no-ops until [`init_metrics`] installs
//! a recorder.
//!
//! # Example
//!
//! ```rust,ignore
//! use demo_telemetry::metrics::{record_calculation, record_request};
//! use std::time::Duration;
//!
//! record_request("calculate", 200, Duration::from_millis(3));
//! record_calculation("add", "ok");
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Total requests, labelled by endpoint and status.
pub const REQUESTS_TOTAL: &str = "demo_requests_total";

/// Request latency histogram, labelled by endpoint.
pub const REQUEST_DURATION_SECONDS: &str = "demo_request_duration_seconds";

/// Calculation outcomes, labelled by operation and outcome.
pub const CALCULATIONS_TOTAL: &str = "demo_calculations_total";

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Whether the exporter is installed.
    pub enabled: bool,

    /// Address the exporter listens on (e.g., "0.0.0.0:9090").
    pub addr: String,

    /// Histogram buckets for request duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
            // 1ms .. 1s
            duration_buckets: vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
        }
    }
}

/// Initializes the metrics subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidAddress` if `addr` does not parse, or
/// `TelemetryError::MetricsInit` if the exporter cannot be installed.
///
/// # Panics
///
/// Panics if metrics are enabled and this is called outside a Tokio runtime.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let (recorder, exporter) = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
        .with_http_listener(addr)
        .build()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    metrics::set_global_recorder(recorder)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = exporter.await {
            tracing::error!(error = ?e, "Metrics exporter stopped");
        }
    });

    register_metric_descriptions();

    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}

fn register_metric_descriptions() {
    describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests processed");
    describe_histogram!(REQUEST_DURATION_SECONDS, "HTTP request duration in seconds");
    describe_counter!(CALCULATIONS_TOTAL, "Total calculations by operation and outcome");
}

/// Records a completed request.
///
/// Updates `demo_requests_total` and `demo_request_duration_seconds`.
pub fn record_request(endpoint: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "endpoint" => endpoint.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(REQUEST_DURATION_SECONDS, "endpoint" => endpoint.to_string())
        .record(duration.as_secs_f64());
}

/// Records the outcome of a calculation.
///
/// `outcome` is `"ok"` or an error label such as `"division_by_zero"`.
pub fn record_calculation(operation: &str, outcome: &str) {
    counter!(
        CALCULATIONS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
