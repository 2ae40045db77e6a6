//! Typed configuration for the DevSecOps demo service.
//!
//! - TOML and JSON configuration files
//! - `.env` files via `dotenvy`
//! - Conventional (`PORT`, `HOST`, `APP_ENV`) and prefixed
//!   (`DEMO__SECTION__KEY`) environment overrides
//! - Strict validation (fails on unknown fields)
//!
//! # Example
//!
//! ```no_run
//! use demo_config::ConfigLoader;
//!
//! # fn main() -> Result<(), demo_config::ConfigError> {
//! let config = ConfigLoader::from_env()?.load()?;
//! println!("Server will listen on: {}", config.socket_addr()?);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! environment = "production"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//! shutdown_timeout_secs = 10
//! request_timeout_secs = 30
//!
//! [service]
//! name = "devsecops-demo-app"
//! version = "1.0.0"
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//! ```

#![doc(html_root_url = "https://docs.rs/demo-config/1.0.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::AppConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, CONFIG_FILE_ENV, ENV_PREFIX};
pub use schema::{Environment, LoggingConfig, MetricsConfig, ServerConfig, ServiceConfig};
