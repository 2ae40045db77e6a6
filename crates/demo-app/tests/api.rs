//! End-to-end tests of the HTTP surface, driven in memory.

use demo_app::{build_app, AppConfig};
use demo_test::{TestClient, TestResponse};
use http::{Method, StatusCode};
use serde_json::{json, Value};

fn client() -> TestClient {
    TestClient::new(build_app(&AppConfig::default()).unwrap())
}

fn production_client() -> TestClient {
    TestClient::new(build_app(&AppConfig::production()).unwrap())
}

async fn calculate(body: Value) -> TestResponse {
    client().post("/calculate").json(&body).send().await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = client().get("/health").send().await.unwrap();
    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "application/json; charset=utf-8")
        .assert_json_field("status", &json!("healthy"))
        .assert_json_field("service", &json!("devsecops-demo-app"));

    let body = response.json_value().unwrap();
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_root() {
    client()
        .get("/")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::OK)
        .assert_json_eq(&json!({
            "message": "DevSecOps CI/CD Pipeline Demo Application",
            "version": "1.0.0",
            "endpoints": {
                "health": "/health",
                "calculate": "/calculate",
                "info": "/info"
            }
        }));
}

#[tokio::test]
async fn test_info() {
    let response = client().get("/info").send().await.unwrap();
    response
        .assert_status(StatusCode::OK)
        .assert_json_field("application", &json!("DevSecOps Demo App"))
        .assert_json_field("version", &json!("1.0.0"))
        .assert_json_field("features.0", &json!("SAST with CodeQL"));

    let body = response.json_value().unwrap();
    assert_eq!(body["features"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_add() {
    let response = calculate(json!({"operation": "add", "a": 5, "b": 3})).await;
    response
        .assert_status(StatusCode::OK)
        .assert_json_field("operation", &json!("add"))
        .assert_json_field("operands", &json!({"a": 5, "b": 3}))
        .assert_json_field("result", &json!(8));
}

#[tokio::test]
async fn test_subtract_multiply_divide() {
    calculate(json!({"operation": "subtract", "a": 10, "b": 4}))
        .await
        .assert_status(StatusCode::OK)
        .assert_json_field("result", &json!(6));

    calculate(json!({"operation": "multiply", "a": 6, "b": 7}))
        .await
        .assert_status(StatusCode::OK)
        .assert_json_field("result", &json!(42));

    calculate(json!({"operation": "divide", "a": 10, "b": 4}))
        .await
        .assert_status(StatusCode::OK)
        .assert_json_field("result", &json!(2.5));
}

#[tokio::test]
async fn test_divide_by_zero() {
    calculate(json!({"operation": "divide", "a": 10, "b": 0}))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_json_eq(&json!({"error": "Cannot divide by zero"}));
}

#[tokio::test]
async fn test_invalid_operation() {
    calculate(json!({"operation": "invalid", "a": 5, "b": 3}))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_json_eq(&json!({
            "error": "Invalid operation",
            "validOperations": ["add", "multiply", "subtract", "divide"]
        }));
}

#[tokio::test]
async fn test_missing_parameter() {
    calculate(json!({"operation": "add", "a": 5}))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_json_eq(&json!({
            "error": "Missing required parameters",
            "required": ["operation", "a", "b"]
        }));
}

#[tokio::test]
async fn test_non_numeric_parameter() {
    calculate(json!({"operation": "add", "a": "five", "b": 3}))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_json_eq(&json!({"error": "Parameters a and b must be numbers"}));
}

#[tokio::test]
async fn test_form_fields_are_not_numbers() {
    client()
        .post("/calculate")
        .form(&[("operation", "add"), ("a", "5"), ("b", "3")])
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_json_field("error", &json!("Parameters a and b must be numbers"));
}

#[tokio::test]
async fn test_empty_body_is_missing_parameters() {
    client()
        .post("/calculate")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_json_field("error", &json!("Missing required parameters"));
}

#[tokio::test]
async fn test_body_without_content_type_is_ignored() {
    for body in [r#"{"operation":"add","a":5,"b":3}"#, "{oops"] {
        client()
            .post("/calculate")
            .body(body)
            .send()
            .await
            .unwrap()
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_json_field("error", &json!("Missing required parameters"));
    }
}

#[tokio::test]
async fn test_json_suffix_content_type_is_ignored() {
    client()
        .post("/calculate")
        .content_type("application/merge-patch+json")
        .body(r#"{"operation":"add","a":5,"b":3}"#)
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_json_field("error", &json!("Missing required parameters"));
}

#[tokio::test]
async fn test_json_scalar_body_is_internal_error() {
    for body in ["5", "null", "\"add\""] {
        production_client()
            .post("/calculate")
            .content_type("application/json")
            .body(body)
            .send()
            .await
            .unwrap()
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
            .assert_json_eq(&json!({"error": "Internal server error"}));
    }
}

#[tokio::test]
async fn test_json_array_body_is_missing_parameters() {
    client()
        .post("/calculate")
        .content_type("application/json")
        .body("[]")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_json_field("error", &json!("Missing required parameters"));
}

#[tokio::test]
async fn test_integral_float_operands_echo_as_integers() {
    let response = calculate(json!({"operation": "add", "a": 5.0, "b": 3})).await;
    response.assert_status(StatusCode::OK);

    let raw = String::from_utf8(response.body().to_vec()).unwrap();
    assert!(raw.contains(r#""operands":{"a":5,"b":3}"#), "{raw}");
    assert!(raw.contains(r#""result":8"#), "{raw}");
}

#[tokio::test]
async fn test_unknown_route() {
    client()
        .get("/nonexistent")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_json_eq(&json!({"error": "Endpoint not found", "path": "/nonexistent"}));
}

#[tokio::test]
async fn test_wrong_method_is_not_found() {
    client()
        .get("/calculate")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_json_field("path", &json!("/calculate"));

    client()
        .request(Method::DELETE, "/health")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trailing_slash() {
    client()
        .get("/health/")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_routes_ignore_case() {
    client()
        .get("/HEALTH")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::OK)
        .assert_json_field("status", &json!("healthy"));

    client()
        .post("/Calculate/")
        .json(&json!({"operation": "add", "a": 1, "b": 2}))
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::OK)
        .assert_json_field("result", &json!(3));
}

#[tokio::test]
async fn test_extra_slashes_are_not_found() {
    for path in ["//health", "/health//", "//"] {
        client()
            .get(path)
            .send()
            .await
            .unwrap()
            .assert_status(StatusCode::NOT_FOUND)
            .assert_json_eq(&json!({"error": "Endpoint not found", "path": path}));
    }
}

#[tokio::test]
async fn test_head_returns_headers_only() {
    let get = client().get("/").send().await.unwrap();
    let head = client().head("/").send().await.unwrap();

    head.assert_status(StatusCode::OK);
    assert!(head.body().is_empty());
    assert_eq!(head.content_length(), Some(get.body().len() as u64));
}

#[tokio::test]
async fn test_invalid_json_shows_message_in_development() {
    let response = client()
        .post("/calculate")
        .content_type("application/json")
        .body("{\"operation\": ")
        .send()
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_json_field("error", &json!("Internal server error"));
    assert!(response.json_value().unwrap()["message"].is_string());
}

#[tokio::test]
async fn test_invalid_json_hides_message_in_production() {
    production_client()
        .post("/calculate")
        .content_type("application/json")
        .body("{\"operation\": ")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_json_eq(&json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    client()
        .get("/health")
        .header("x-request-id", "trace-42")
        .send()
        .await
        .unwrap()
        .assert_header("x-request-id", "trace-42");

    let response = client().get("/health").send().await.unwrap();
    assert!(response.header_str("x-request-id").is_some());
}
