//! # DevSecOps Demo App
//!
//! A small JSON-over-HTTP service used to exercise a CI/CD security pipeline:
//!
//! - `GET /health`: liveness status, uptime and service name
//! - `GET /` and `GET /info`: static service metadata
//! - `POST /calculate`: validated add, subtract, multiply and divide
//!
//! This crate wires configuration, telemetry and the server together and
//! re-exports the member crates.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use demo_app::{build_server_config, ConfigLoader, Server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::from_env()?.load()?;
//!     Server::new(build_server_config(&config)?).run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/demo-app/1.0.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::path::Path;

pub use demo_config as config;
pub use demo_core as core;
pub use demo_server as server;
pub use demo_telemetry as telemetry;

pub use demo_config::{AppConfig, ConfigError, ConfigLoader, Environment};
pub use demo_server::{App, Server, ServerConfig, ServerError, ShutdownSignal};

/// Version of the service.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loads configuration the way the binary does.
///
/// With `path`, that file replaces the one named by `DEMO_CONFIG_FILE`.
///
/// # Errors
///
/// Returns `ConfigError` if a file cannot be loaded or the result is invalid.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let loader = match path {
        Some(path) => ConfigLoader::new()
            .with_dotenv()?
            .with_file(path)?
            .with_standard_env()
            .with_env_prefix(demo_config::ENV_PREFIX),
        None => ConfigLoader::from_env()?,
    };
    loader.load()
}

/// Derives server settings from application configuration.
///
/// # Errors
///
/// Returns `ConfigError` if `host:port` is not a socket address.
pub fn build_server_config(config: &AppConfig) -> Result<ServerConfig, ConfigError> {
    Ok(ServerConfig::builder()
        .http_addr(config.socket_addr()?.to_string())
        .shutdown_timeout(config.shutdown_timeout())
        .request_timeout(config.request_timeout())
        .service_name(config.service.name.clone())
        .service_version(config.service.version.clone())
        .environment(config.environment.as_str())
        .expose_error_details(config.expose_error_details())
        .build())
}

/// Builds the request handler for `config`.
///
/// # Errors
///
/// See [`build_server_config`].
pub fn build_app(config: &AppConfig) -> Result<App, ConfigError> {
    Ok(App::new(&build_server_config(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_build_server_config_defaults() {
        let server = build_server_config(&AppConfig::default()).unwrap();

        assert_eq!(server.http_addr(), "0.0.0.0:3000");
        assert_eq!(server.shutdown_timeout(), Duration::from_secs(10));
        assert_eq!(server.service_name(), "devsecops-demo-app");
        assert_eq!(server.service_version(), "1.0.0");
        assert_eq!(server.environment(), "development");
        assert!(server.expose_error_details());
    }

    #[test]
    fn test_build_server_config_production() {
        let server = build_server_config(&AppConfig::production()).unwrap();
        assert_eq!(server.environment(), "production");
        assert!(!server.expose_error_details());
    }

    #[test]
    fn test_build_server_config_ipv6() {
        let mut config = AppConfig::default();
        config.server.host = "::1".to_string();
        config.server.port = 8080;

        let server = build_server_config(&config).unwrap();
        assert_eq!(server.http_addr(), "[::1]:8080");
    }

    #[test]
    fn test_build_server_config_invalid_host() {
        let mut config = AppConfig::default();
        config.server.host = "not a host".to_string();
        assert!(build_server_config(&config).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.toml");
        std::fs::write(&path, "[server]\nport = 4000\nhost = \"127.0.0.1\"\n").unwrap();

        let config = ConfigLoader::new().with_file(&path).unwrap().load().unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(build_app(&config).unwrap().router().route_count(), 4);
    }
}
