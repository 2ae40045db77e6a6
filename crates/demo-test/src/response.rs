//! Test response wrapper.

use std::fmt;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TestError;

/// A response with its body fully read.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Reads an `http::Response` into memory.
    ///
    /// # Errors
    ///
    /// Returns `TestError::BodyRead` if the body fails.
    pub async fn from_http<B>(response: http::Response<B>) -> Result<Self, TestError>
    where
        B: BodyExt,
        B::Error: fmt::Display,
    {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self::new(parts.status, parts.headers, body))
    }

    /// Creates a response from parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status as a number.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Returns a header value as a string, if it is valid text.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Returns the `Content-Length` header.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.header_str(header::CONTENT_LENGTH.as_str())
            .and_then(|v| v.parse().ok())
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns `TestError::BodyRead` if the body is not UTF-8.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `TestError::Json` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Parses the body as an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns `TestError::Json` if the body is not JSON.
    pub fn json_value(&self) -> Result<Value, TestError> {
        self.json()
    }

    /// Asserts the status.
    ///
    /// # Panics
    ///
    /// Panics if the status differs.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {} with body {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts a header value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("Header '{name}' not found"));
        assert_eq!(
            actual, expected,
            "Header '{name}': expected '{expected}', got '{actual}'"
        );
        self
    }

    /// Asserts the whole JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or differs.
    pub fn assert_json_eq(&self, expected: &Value) -> &Self {
        let actual = self.json_value().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }

    /// Asserts one field of the JSON body. `path` is dot-separated, with
    /// numeric segments indexing arrays (`features.0`).
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON, the path is absent, or the value differs.
    pub fn assert_json_field(&self, path: impl AsRef<str>, expected: &Value) -> &Self {
        let path = path.as_ref();
        let json = self.json_value().unwrap_or_else(|e| panic!("{e}"));
        let actual = json_path(&json, path)
            .unwrap_or_else(|| panic!("JSON path '{path}' not found in: {json}"));
        assert_eq!(
            actual, expected,
            "JSON field '{path}': expected {expected}, got {actual}"
        );
        self
    }

    /// Asserts that a JSON field is absent.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or the path is present.
    pub fn assert_json_missing(&self, path: impl AsRef<str>) -> &Self {
        let path = path.as_ref();
        let json = self.json_value().unwrap_or_else(|e| panic!("{e}"));
        assert!(
            json_path(&json, path).is_none(),
            "JSON path '{path}' should be absent in: {json}"
        );
        self
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}

fn json_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match segment.parse::<usize>() {
            Ok(index) => current.get(index),
            Err(_) => current.get(segment),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> TestResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        TestResponse::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            Bytes::from(body.to_string()),
        )
    }

    #[test]
    fn test_status() {
        let response = response(400, "{}");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.status_code(), 400);
    }

    #[test]
    fn test_headers() {
        let response = response(200, "{}");
        assert_eq!(
            response.content_type(),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(response.content_length(), None);
    }

    #[test]
    fn test_json() {
        let response = response(200, r#"{"result":8,"operation":"add"}"#);
        let value = response.json_value().unwrap();
        assert_eq!(value["result"], 8);
        assert_eq!(response.text().unwrap(), r#"{"result":8,"operation":"add"}"#);
    }

    #[test]
    fn test_json_path() {
        let value = json!({"features": ["a", "b"], "operands": {"a": 1}});
        assert_eq!(json_path(&value, "features.1"), Some(&json!("b")));
        assert_eq!(json_path(&value, "operands.a"), Some(&json!(1)));
        assert_eq!(json_path(&value, "operands.b"), None);
    }

    #[test]
    fn test_assertions() {
        response(404, r#"{"error":"Endpoint not found","path":"/x"}"#)
            .assert_status(StatusCode::NOT_FOUND)
            .assert_header("content-type", "application/json; charset=utf-8")
            .assert_json_field("path", &json!("/x"))
            .assert_json_missing("message");
    }

    #[test]
    #[should_panic(expected = "Expected status")]
    fn test_assert_status_panics() {
        response(500, "{}").assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_from_http() {
        let http_response = http::Response::builder()
            .status(StatusCode::CREATED)
            .body(http_body_util::Full::new(Bytes::from_static(b"ok")))
            .unwrap();

        let response = TestResponse::from_http(http_response).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.text().unwrap(), "ok");
    }
}
