//! Endpoint handlers.
//!
//! Handlers are plain functions of their input; the [`App`](crate::App)
//! turns their results into HTTP responses.

use bytes::Bytes;
use demo_core::{ApiError, ApiResult, CalculationRequest, CalculationResult};
use demo_telemetry::record_calculation;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde_json::{Map, Value};

/// How a request body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/json`, with or without parameters.
    Json,
    /// `application/x-www-form-urlencoded`.
    Form,
    /// Anything else, including no content type. The body is ignored.
    Unsupported,
}

impl BodyFormat {
    /// Chooses the format from the request's `Content-Type`.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(value) = headers.get(CONTENT_TYPE) else {
            return Self::Unsupported;
        };
        let Ok(value) = value.to_str() else {
            return Self::Unsupported;
        };

        let mime = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime == "application/json" {
            Self::Json
        } else if mime == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Unsupported
        }
    }
}

/// Decodes a request body into an untyped value.
///
/// Empty and unsupported bodies decode to an empty object. Form fields
/// decode as strings. A JSON body must be an object or an array.
///
/// # Errors
///
/// Returns an internal error if a JSON or form body is malformed, or if a
/// JSON body is a bare scalar.
pub fn decode_body(format: BodyFormat, body: &Bytes) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    match format {
        BodyFormat::Json => match serde_json::from_slice::<Value>(body)? {
            value @ (Value::Object(_) | Value::Array(_)) => Ok(value),
            _ => Err(ApiError::internal(
                "Request body must be a JSON object or array",
            )),
        },
        BodyFormat::Form => {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
                .map_err(|e| ApiError::internal_with_source(e.to_string(), e))?;
            Ok(Value::Object(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ))
        }
        BodyFormat::Unsupported => Ok(Value::Object(Map::new())),
    }
}

/// Validates and evaluates a calculation.
///
/// # Errors
///
/// Returns the validation or arithmetic failure as an [`ApiError`].
pub fn calculate(body: &Value) -> ApiResult<CalculationResult> {
    let request = CalculationRequest::from_value(body)?;
    let operation = request.operation();

    let result = request.evaluate();
    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => err.kind().as_str(),
    };
    record_calculation(operation.as_str(), outcome);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use demo_core::ErrorKind;
    use http::HeaderValue;
    use serde_json::json;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_body_format_from_headers() {
        assert_eq!(
            BodyFormat::from_headers(&HeaderMap::new()),
            BodyFormat::Unsupported
        );
        assert_eq!(
            BodyFormat::from_headers(&headers("application/json; charset=utf-8")),
            BodyFormat::Json
        );
        assert_eq!(
            BodyFormat::from_headers(&headers("application/merge-patch+json")),
            BodyFormat::Unsupported
        );
        assert_eq!(
            BodyFormat::from_headers(&headers("Application/X-WWW-Form-Urlencoded")),
            BodyFormat::Form
        );
        assert_eq!(
            BodyFormat::from_headers(&headers("text/plain")),
            BodyFormat::Unsupported
        );
    }

    #[test]
    fn test_decode_empty_body() {
        let value = decode_body(BodyFormat::Json, &Bytes::new()).unwrap();
        assert_eq!(value, json!({}));

        let value = decode_body(BodyFormat::Json, &Bytes::from_static(b"  \n")).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_decode_json() {
        let body = Bytes::from_static(br#"{"operation":"add","a":5,"b":3}"#);
        let value = decode_body(BodyFormat::Json, &body).unwrap();
        assert_eq!(value["a"], 5);
    }

    #[test]
    fn test_decode_invalid_json_is_internal() {
        let body = Bytes::from_static(b"{not json");
        let err = decode_body(BodyFormat::Json, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_decode_json_scalar_is_internal() {
        for body in ["5", "null", "\"add\"", "true"] {
            let err = decode_body(BodyFormat::Json, &Bytes::from(body)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Internal, "body {body}");
        }
    }

    #[test]
    fn test_decode_json_array_is_accepted() {
        let value = decode_body(BodyFormat::Json, &Bytes::from_static(b"[1, 2]")).unwrap();
        assert_eq!(value, json!([1, 2]));

        let err = calculate(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameters);
    }

    #[test]
    fn test_decode_form_fields_are_strings() {
        let body = Bytes::from_static(b"operation=add&a=5&b=3");
        let value = decode_body(BodyFormat::Form, &body).unwrap();
        assert_eq!(value, json!({"operation": "add", "a": "5", "b": "3"}));
    }

    #[test]
    fn test_decode_unsupported_ignores_body() {
        let body = Bytes::from_static(br#"{"operation":"add","a":5,"b":3}"#);
        let value = decode_body(BodyFormat::Unsupported, &body).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_calculate_success() {
        let result = calculate(&json!({"operation": "multiply", "a": 6, "b": 7})).unwrap();
        assert_eq!(result.result, 42.0);
    }

    #[test]
    fn test_calculate_errors() {
        let err = calculate(&json!({"operation": "divide", "a": 1, "b": 0})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivisionByZero);

        let err = calculate(&json!({"operation": "add", "a": "5", "b": "3"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameterType);
    }
}
