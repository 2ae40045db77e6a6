//! Liveness reporting for `GET /health`.
//!
//! # Example
//!
//! ```rust
//! use demo_server::HealthCheck;
//!
//! let health = HealthCheck::new("devsecops-demo-app");
//! let status = health.status();
//!
//! assert!(status.is_healthy());
//! assert_eq!(status.service(), "devsecops-demo-app");
//! ```

use std::time::{Duration, Instant};

use demo_core::now_timestamp;
use serde::{Deserialize, Serialize};

/// Body of a `/health` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    status: String,
    timestamp: String,
    uptime: f64,
    service: String,
}

impl HealthStatus {
    /// Creates a healthy status.
    #[must_use]
    pub fn healthy(service: impl Into<String>, timestamp: impl Into<String>, uptime: Duration) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: timestamp.into(),
            uptime: uptime.as_secs_f64(),
            service: service.into(),
        }
    }

    /// Returns the status string.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns when the status was taken (RFC 3339, UTC).
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Returns the uptime in fractional seconds.
    #[must_use]
    pub fn uptime(&self) -> f64 {
        self.uptime
    }

    /// Returns the service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns whether the status is healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Health check handler.
///
/// The service is healthy whenever it can answer.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    service: String,
    start_time: Instant,
}

impl HealthCheck {
    /// Creates a health check whose uptime starts now.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            start_time: Instant::now(),
        }
    }

    /// Returns the service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the time elapsed since construction.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current health status.
    #[must_use]
    pub fn status(&self) -> HealthStatus {
        HealthStatus::healthy(self.service.clone(), now_timestamp(), self.uptime())
    }
}
