//! HTTP server implementation.
//!
//! - [`App`] turns an `http::Request` into an `http::Response`. It has no
//!   transport of its own, so tests can drive it in memory.
//! - [`Server`] accepts TCP connections and serves them with hyper's
//!   HTTP/1.1 implementation, handing each request to the shared `App`.
//!
//! # Example
//!
//! ```rust,ignore
//! use demo_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder().http_addr("0.0.0.0:3000").build();
//!     Server::new(config).run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use demo_core::{now_timestamp, ApiError, ApiResult};
use demo_telemetry::{log_request_complete, log_request_error, log_request_start, record_request};
use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, Method, Request, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde::Serialize;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::handlers::{calculate, decode_body, BodyFormat};
use crate::health::HealthCheck;
use crate::info::ServiceInfo;
use crate::router::{Endpoint, Router};
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Header carrying the request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied request ID that is echoed back.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Metric label for requests that matched no route.
const NOT_FOUND_LABEL: &str = "not_found";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// The request handler shared by every connection.
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct App {
    router: Router,
    health: HealthCheck,
    info: ServiceInfo,
    request_timeout: Duration,
    expose_error_details: bool,
}

impl App {
    /// Creates the handler from server settings.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            router: Router::standard(),
            health: HealthCheck::new(config.service_name()),
            info: ServiceInfo::new(config.service_version()),
            request_timeout: config.request_timeout(),
            expose_error_details: config.expose_error_details(),
        }
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the health check.
    #[must_use]
    pub fn health(&self) -> &HealthCheck {
        &self.health
    }

    /// Returns whether internal error messages reach clients.
    #[must_use]
    pub fn expose_error_details(&self) -> bool {
        self.expose_error_details
    }

    /// Handles one request.
    ///
    /// Never fails: every error becomes a JSON error response.
    pub async fn handle<B>(&self, req: Request<B>) -> HttpResponse
    where
        B: Body,
        B::Error: Display,
    {
        let start = Instant::now();
        let request_id = request_id(req.headers());
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_string();

        log_request_start!(request_id, parts.method, path);

        let endpoint = self.router.match_route(&parts.method, &path);
        let result = match endpoint {
            Some(endpoint) => self.dispatch(endpoint, &parts.headers, body).await,
            None => Err(ApiError::not_found(path.as_str())),
        };

        let mut response = match result {
            Ok(response) => response,
            Err(err) => self.error_response(&request_id, &err),
        };

        if parts.method == Method::HEAD {
            strip_body(&mut response);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        let status = response.status().as_u16();
        let elapsed = start.elapsed();
        let label = endpoint.map_or(NOT_FOUND_LABEL, Endpoint::as_str);
        record_request(label, status, elapsed);
        log_request_complete!(request_id, status, elapsed.as_secs_f64() * 1000.0);

        response
    }

    async fn dispatch<B>(
        &self,
        endpoint: Endpoint,
        headers: &HeaderMap,
        body: B,
    ) -> ApiResult<HttpResponse>
    where
        B: Body,
        B::Error: Display,
    {
        match endpoint {
            Endpoint::Root => json_response(StatusCode::OK, &self.info.description()),
            Endpoint::Health => json_response(StatusCode::OK, &self.health.status()),
            Endpoint::Info => json_response(StatusCode::OK, &self.info.application_info()),
            Endpoint::Calculate => {
                let bytes = self.collect_body(body).await?;
                let value = decode_body(BodyFormat::from_headers(headers), &bytes)?;
                json_response(StatusCode::OK, &calculate(&value)?)
            }
        }
    }

    async fn collect_body<B>(&self, body: B) -> ApiResult<Bytes>
    where
        B: Body,
        B::Error: Display,
    {
        match tokio::time::timeout(self.request_timeout, body.collect()).await {
            Ok(Ok(collected)) => Ok(collected.to_bytes()),
            Ok(Err(e)) => Err(ApiError::internal(format!("Failed to read request body: {e}"))),
            Err(_) => Err(ApiError::internal(format!(
                "Request body not received within {:?}",
                self.request_timeout
            ))),
        }
    }

    fn error_response(&self, request_id: &str, err: &ApiError) -> HttpResponse {
        if err.is_internal() {
            log_request_error!(request_id, err);
        } else {
            tracing::debug!(request_id = %request_id, error = %err, "Request rejected");
        }

        let body = err.to_body(self.expose_error_details);
        json_response(err.status_code(), &body).unwrap_or_else(|_| fallback_response())
    }
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::now_v7().to_string(), ToString::to_string)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> ApiResult<HttpResponse> {
    let bytes = serde_json::to_vec(body)?;
    let mut response = Response::new(Full::new(Bytes::from(bytes)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    Ok(response)
}

fn fallback_response() -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::from_static(
        br#"{"error":"Internal server error"}"#,
    )));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    response
}

// HEAD keeps the GET headers, including the length the body would have had.
fn strip_body(response: &mut HttpResponse) {
    let length = response.body().size_hint().exact().unwrap_or_default();
    response
        .headers_mut()
        .insert(CONTENT_LENGTH, HeaderValue::from(length));
    *response.body_mut() = Full::new(Bytes::new());
}

/// The demo HTTP server.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    app: Arc<App>,
}

impl Server {
    /// Creates a server and its request handler from `config`.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let app = Arc::new(App::new(&config));
        Self { config, app }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the shared request handler.
    #[must_use]
    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    /// Runs until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// See [`Server::run_with_shutdown`].
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if the address is invalid, cannot be bound, or
    /// connections outlive the shutdown timeout.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|_| ServerError::InvalidAddress(self.config.http_addr().to_string()))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::ShutdownTimeout` if connections are still open
    /// when the shutdown timeout elapses.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        self.log_banner(local_addr);

        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, remote_addr)) => {
                        let app = Arc::clone(&self.app);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(app, stream, shutdown).await {
                                tracing::debug!(%remote_addr, error = %e, "Connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to accept connection"),
                },

                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }
        drop(listener);

        let timeout = self.config.shutdown_timeout();
        tracing::info!(
            active = tracker.active_connections(),
            timeout_secs = timeout.as_secs_f64(),
            "Waiting for open connections to close"
        );

        if tokio::time::timeout(timeout, tracker.wait_for_shutdown())
            .await
            .is_err()
        {
            let active = tracker.active_connections();
            tracing::warn!(active, "Forced shutdown after timeout");
            return Err(ServerError::ShutdownTimeout { active });
        }

        tracing::info!("HTTP server closed");
        Ok(())
    }

    fn log_banner(&self, addr: SocketAddr) {
        tracing::info!(
            service = self.config.service_name(),
            version = self.config.service_version(),
            "DevSecOps Demo Application Started"
        );
        tracing::info!(url = %format!("http://{addr}"), "Server running");
        tracing::info!(url = %format!("http://{addr}/health"), "Health check");
        tracing::info!(environment = self.config.environment(), "Environment");
        tracing::info!(started_at = %now_timestamp(), "Started");
    }
}

async fn serve_connection(
    app: Arc<App>,
    stream: TcpStream,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req: Request<Incoming>| {
        let app = Arc::clone(&app);
        async move { Ok::<_, Infallible>(app.handle(req).await) }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            // let the in-flight request finish, then close
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address is not a socket address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Failed to bind the listener.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Connections were still open when the shutdown timeout elapsed.
    #[error("Forced shutdown after timeout with {active} connection(s) still open")]
    ShutdownTimeout {
        /// Connections still open.
        active: usize,
    },

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
