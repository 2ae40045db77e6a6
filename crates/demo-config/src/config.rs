//! Top-level configuration type.

use std::net::SocketAddr;
use std::time::Duration;

use demo_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Environment, LoggingConfig, MetricsConfig, ServerConfig, ServiceConfig};

/// Complete service configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use demo_config::AppConfig;
///
/// let config = AppConfig::default();
/// assert_eq!(config.server.port, 3000);
/// assert!(config.expose_error_details());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Service identity.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics exporter settings.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `host:port` is not a socket address, or the port is zero
    /// - a timeout is zero
    /// - metrics are enabled with an unparsable address
    /// - the log level is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid_value("server.port", "must be non-zero"));
        }

        self.socket_addr()?;

        if self.server.shutdown_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server.shutdown_timeout_secs",
                "must be non-zero",
            ));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_secs",
                "must be non-zero",
            ));
        }

        if self.metrics.enabled && self.metrics.addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "metrics.addr",
                format!("invalid socket address: {}", self.metrics.addr),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// Development preset: debug level, pretty logs.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.environment = Environment::Development;
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config
    }

    /// Production preset: info level, JSON logs.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.environment = Environment::Production;
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }

    /// Returns the address the HTTP server binds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `host:port` does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.server.host.trim();
        // IPv6 literals need brackets in socket address syntax
        let addr = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.server.port)
        } else {
            format!("{host}:{}", self.server.port)
        };

        addr.parse().map_err(|_| {
            ConfigError::invalid_value("server.host", format!("invalid socket address: {addr}"))
        })
    }

    /// Whether internal error messages are shown to clients.
    #[must_use]
    pub const fn expose_error_details(&self) -> bool {
        !self.environment.is_production()
    }

    /// Graceful shutdown timeout.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    /// Request body read timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Logging settings in the form the telemetry crate consumes.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            enabled: true,
            level: self.logging.level.clone(),
            format: self.logging.format,
            include_target: true,
        }
    }

    /// Metrics settings in the form the telemetry crate consumes.
    #[must_use]
    pub fn metrics_config(&self) -> demo_telemetry::MetricsConfig {
        demo_telemetry::MetricsConfig {
            enabled: self.metrics.enabled,
            addr: self.metrics.addr.clone(),
            ..demo_telemetry::MetricsConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_development_preset() {
        let config = AppConfig::development();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.expose_error_details());
    }

    #[test]
    fn test_production_preset() {
        let config = AppConfig::production();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.environment.is_production());
        assert!(!config.expose_error_details());
    }

    #[test]
    fn test_test_environment_exposes_details() {
        let config = AppConfig {
            environment: Environment::Test,
            ..AppConfig::default()
        };
        assert!(config.expose_error_details());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "server.port"
        ));
    }

    #[test]
    fn test_validate_bad_host() {
        let mut config = AppConfig::default();
        config.server.host = "not a host".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ipv6_host() {
        let mut config = AppConfig::default();
        config.server.host = "::1".to_string();
        assert_eq!(config.socket_addr().unwrap().to_string(), "[::1]:3000");
    }

    #[test]
    fn test_validate_zero_timeouts() {
        let mut config = AppConfig::default();
        config.server.shutdown_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_metrics_addr_only_when_enabled() {
        let mut config = AppConfig::default();
        config.metrics.addr = "nowhere".to_string();
        assert!(config.validate().is_ok());

        config.metrics.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_telemetry_conversions() {
        let mut config = AppConfig::production();
        config.metrics.enabled = true;
        config.metrics.addr = "127.0.0.1:9100".to_string();

        let log = config.log_config();
        assert_eq!(log.format, LogFormat::Json);
        assert_eq!(log.level, "info");

        let metrics = config.metrics_config();
        assert!(metrics.enabled);
        assert_eq!(metrics.addr, "127.0.0.1:9100");
    }

    #[test]
    fn test_timeouts() {
        let config = AppConfig::default();
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(10));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
