//! Request routing.
//!
//! Maps a method and path to one of the service's [`Endpoint`]s. Paths are
//! compared whole and without regard to ASCII case. A single trailing slash
//! is tolerated, so `/info/` matches `/info` but `//info` and `/info//` do
//! not. `HEAD` falls back to the `GET` route for the same path.
//!
//! # Example
//!
//! ```rust
//! use demo_server::{Endpoint, Router};
//! use http::Method;
//!
//! let router = Router::standard();
//!
//! assert_eq!(router.match_route(&Method::POST, "/calculate"), Some(Endpoint::Calculate));
//! assert_eq!(router.match_route(&Method::HEAD, "/health/"), Some(Endpoint::Health));
//! assert_eq!(router.match_route(&Method::GET, "/calculate"), None);
//! ```

use std::fmt;

use http::Method;

/// The routed endpoints of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /`: service description.
    Root,
    /// `GET /health`: liveness status.
    Health,
    /// `GET /info`: application information.
    Info,
    /// `POST /calculate`: arithmetic.
    Calculate,
}

impl Endpoint {
    /// Returns the label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Health => "health",
            Self::Info => "info",
            Self::Calculate => "calculate",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    // pattern without its trailing slash; the root route is ""
    base: String,
    endpoint: Endpoint,
}

impl Route {
    fn new(method: Method, pattern: &str, endpoint: Endpoint) -> Self {
        Self {
            method,
            base: pattern.trim_end_matches('/').to_string(),
            endpoint,
        }
    }

    // One trailing slash is optional; anything else must match exactly,
    // ignoring ASCII case.
    fn matches_path(&self, path: &str) -> bool {
        let path = path.strip_suffix('/').unwrap_or(path);
        path.eq_ignore_ascii_case(&self.base)
    }
}

/// HTTP request router.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Creates the router with the service's four routes.
    #[must_use]
    pub fn standard() -> Self {
        let mut router = Self::new();
        router.add_route(Method::GET, "/", Endpoint::Root);
        router.add_route(Method::GET, "/health", Endpoint::Health);
        router.add_route(Method::GET, "/info", Endpoint::Info);
        router.add_route(Method::POST, "/calculate", Endpoint::Calculate);
        router
    }

    /// Adds a route. Earlier routes win.
    pub fn add_route(&mut self, method: Method, pattern: impl AsRef<str>, endpoint: Endpoint) {
        self.routes.push(Route::new(method, pattern.as_ref(), endpoint));
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Matches a request to an endpoint.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<Endpoint> {
        self.find(method, path).or_else(|| {
            if *method == Method::HEAD {
                self.find(&Method::GET, path)
            } else {
                None
            }
        })
    }

    fn find(&self, method: &Method, path: &str) -> Option<Endpoint> {
        self.routes
            .iter()
            .find(|route| route.method == *method && route.matches_path(path))
            .map(|route| route.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_routes() {
        let router = Router::standard();
        assert_eq!(router.route_count(), 4);
        assert_eq!(router.match_route(&Method::GET, "/"), Some(Endpoint::Root));
        assert_eq!(router.match_route(&Method::GET, "/health"), Some(Endpoint::Health));
        assert_eq!(router.match_route(&Method::GET, "/info"), Some(Endpoint::Info));
        assert_eq!(
            router.match_route(&Method::POST, "/calculate"),
            Some(Endpoint::Calculate)
        );
    }

    #[test]
    fn test_empty_path_is_root() {
        let router = Router::standard();
        assert_eq!(router.match_route(&Method::GET, ""), Some(Endpoint::Root));
    }

    #[test]
    fn test_trailing_slash() {
        let router = Router::standard();
        assert_eq!(router.match_route(&Method::GET, "/info/"), Some(Endpoint::Info));
        assert_eq!(
            router.match_route(&Method::POST, "/calculate/"),
            Some(Endpoint::Calculate)
        );
    }

    #[test]
    fn test_case_insensitive() {
        let router = Router::standard();
        assert_eq!(router.match_route(&Method::GET, "/Health"), Some(Endpoint::Health));
        assert_eq!(router.match_route(&Method::GET, "/INFO/"), Some(Endpoint::Info));
        assert_eq!(
            router.match_route(&Method::POST, "/Calculate"),
            Some(Endpoint::Calculate)
        );
    }

    #[test]
    fn test_extra_slashes_do_not_match() {
        let router = Router::standard();
        assert_eq!(router.match_route(&Method::GET, "//health"), None);
        assert_eq!(router.match_route(&Method::GET, "/health//"), None);
        assert_eq!(router.match_route(&Method::GET, "//"), None);
        assert_eq!(router.match_route(&Method::POST, "/calculate//"), None);
    }

    #[test]
    fn test_method_mismatch() {
        let router = Router::standard();
        assert_eq!(router.match_route(&Method::GET, "/calculate"), None);
        assert_eq!(router.match_route(&Method::POST, "/health"), None);
        assert_eq!(router.match_route(&Method::DELETE, "/"), None);
    }

    #[test]
    fn test_head_falls_back_to_get() {
        let router = Router::standard();
        assert_eq!(router.match_route(&Method::HEAD, "/health"), Some(Endpoint::Health));
        assert_eq!(router.match_route(&Method::HEAD, "/calculate"), None);
    }

    #[test]
    fn test_unknown_and_nested_paths() {
        let router = Router::standard();
        assert_eq!(router.match_route(&Method::GET, "/nonexistent"), None);
        assert_eq!(router.match_route(&Method::GET, "/health/live"), None);
        assert_eq!(router.match_route(&Method::GET, "/v1/health"), None);
    }

    #[test]
    fn test_first_route_wins() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/status", Endpoint::Health);
        router.add_route(Method::GET, "/status", Endpoint::Info);
        assert_eq!(router.match_route(&Method::GET, "/status"), Some(Endpoint::Health));
    }

    #[test]
    fn test_endpoint_labels() {
        assert_eq!(Endpoint::Calculate.as_str(), "calculate");
        assert_eq!(Endpoint::Root.to_string(), "root");
    }
}
