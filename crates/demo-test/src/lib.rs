//! # Demo Test
//!
//! In-memory HTTP testing for the DevSecOps demo service. Requests go
//! straight to [`demo_server::App::handle`], so no port is bound.
//!
//! ## Example
//!
//! ```ignore
//! use demo_test::TestClient;
//! use http::StatusCode;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_add() {
//!     let client = TestClient::with_defaults();
//!
//!     let response = client
//!         .post("/calculate")
//!         .json(&json!({"operation": "add", "a": 5, "b": 3}))
//!         .send()
//!         .await
//!         .unwrap();
//!
//!     response
//!         .assert_status(StatusCode::OK)
//!         .assert_json_field("result", &json!(8));
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/demo-test/1.0.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
