//! # Demo Server
//!
//! HTTP server for the DevSecOps demo service.
//!
//! - HTTP/1.1 via Hyper
//! - Exact-path routing for `/`, `/health`, `/info` and `/calculate`
//! - Request IDs, request logging and request metrics
//! - Graceful shutdown with a bounded drain period
//!
//! ## Example
//!
//! ```rust,ignore
//! use demo_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder()
//!         .http_addr("0.0.0.0:3000")
//!         .build();
//!
//!     Server::new(config).run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/demo-server/1.0.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod handlers;
mod health;
mod info;
mod router;
mod server;
mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SERVICE_NAME, DEFAULT_SERVICE_VERSION, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use health::{HealthCheck, HealthStatus};
pub use info::{ApplicationInfo, EndpointPaths, ServiceDescription, ServiceInfo};
pub use router::{Endpoint, Router};
pub use server::{App, HttpResponse, ResponseBody, Server, ServerError, REQUEST_ID_HEADER};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
