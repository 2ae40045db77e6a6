//! Logging and metrics for the DevSecOps demo service.
//!
//! - **Logging**: `tracing` events rendered by `tracing-subscriber` as JSON,
//!   pretty, or compact lines
//! - **Metrics**: counters and histograms via the `metrics` crate, exported in
//!   Prometheus format on a dedicated listener
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `demo_requests_total` | Counter | `endpoint`, `status` | Total request count |
//! | `demo_request_duration_seconds` | Histogram | `endpoint` | Request latency |
//! | `demo_calculations_total` | Counter | `operation`, `outcome` | Calculation outcomes |
//!
//! # Example
//!
//! ```rust,ignore
//! use demo_telemetry::{init_telemetry, LogConfig, MetricsConfig};
//!
//! init_telemetry(&LogConfig::production(), &MetricsConfig::default())?;
//! tracing::info!("telemetry ready");
//! ```

#![doc(html_root_url = "https://docs.rs/demo-telemetry/1.0.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{init_metrics, record_calculation, record_request, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(logging: &LogConfig, metrics: &MetricsConfig) -> TelemetryResult<()> {
    init_logging(logging)?;
    init_metrics(metrics)?;
    Ok(())
}
