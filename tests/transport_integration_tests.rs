//! Unit Tests for the reqwest Transport
//!
//! UNIT UNDER TEST: ReqwestTransport
//!
//! BUSINESS RESPONSIBILITY:
//!   - Deliver requests with their headers and JSON body
//!   - Hand back every response that arrived, whatever its status
//!   - Decode JSON bodies, keep non-JSON bodies as text, map empty bodies to null
//!   - Fail with a transport error when no response arrives in time
//!
//! TEST COVERAGE:
//!   - Request headers and body on the wire
//!   - Status passthrough (2xx, 4xx, 5xx)
//!   - Body decoding variants
//!   - Timeouts and refused connections

mod common;

use common::fast_transport;
use ocr_llm::{
    ErrorCategory, HttpRequest, RecognizeError, ReqwestTransport, Transport, TransportSettings,
};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Request Delivery Tests
// ============================================================================

#[tokio::test]
async fn test_sends_headers_and_json_body() {
    let mock_server = MockServer::start().await;
    let payload = json!({ "model": "mistral-ocr-latest", "document": { "type": "image_url" } });

    Mock::given(method("POST"))
        .and(path("/v1/ocr"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pages": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new().unwrap();
    let request = HttpRequest::post_json(format!("{}/v1/ocr", mock_server.uri()), payload)
        .with_bearer_auth("test-key");

    let response = transport.send(request).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.data, json!({ "pages": [] }));
}

// ============================================================================
// Response Decoding Tests
// ============================================================================

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let mock_server = MockServer::start().await;
    let error_body = json!({ "error": { "message": "Invalid API key" } });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(&error_body))
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new().unwrap();
    let response = transport
        .send(HttpRequest::post_json(mock_server.uri(), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status, 401);
    assert!(!response.ok());
    assert_eq!(response.data, error_body);
}

#[tokio::test]
async fn test_non_json_body_is_kept_as_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new().unwrap();
    let response = transport
        .send(HttpRequest::post_json(mock_server.uri(), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status, 502);
    assert_eq!(response.data, Value::String("Bad Gateway".to_string()));
    assert_eq!(response.body_text(), "Bad Gateway");
}

#[tokio::test]
async fn test_empty_body_decodes_to_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new().unwrap();
    let response = transport
        .send(HttpRequest::post_json(mock_server.uri(), json!({})))
        .await
        .unwrap();

    assert!(response.ok());
    assert_eq!(response.data, Value::Null);
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let transport = fast_transport(Duration::from_millis(100));
    let result = transport
        .send(HttpRequest::post_json(mock_server.uri(), json!({})))
        .await;

    let error = result.unwrap_err();
    assert!(matches!(error, RecognizeError::TransportFailure { status: None, .. }));
    assert_eq!(error.to_string(), "Request timed out after 100ms");
    assert_eq!(error.category(), ErrorCategory::Transient);
}

#[tokio::test]
async fn test_refused_connection_is_transport_failure() {
    // Nothing listens on port 1
    let transport = fast_transport(Duration::from_secs(5));
    let result = transport
        .send(HttpRequest::post_json("http://127.0.0.1:1/v1/ocr", json!({})))
        .await;

    let error = result.unwrap_err();
    assert!(matches!(error, RecognizeError::TransportFailure { .. }));
    assert!(error.is_retryable(), "Network failures should be retryable");
    assert_eq!(
        error.user_message(),
        "Unable to reach the recognition service. Please try again"
    );
}

#[tokio::test]
async fn test_network_failure_does_not_leak_query_key() {
    // Google's native API carries the key in the URL; reqwest errors print it

    // Arrange
    let transport = fast_transport(Duration::from_secs(5));
    let url = "http://127.0.0.1:1/googleapis.com/v1beta/models/x:generateContent?key=SECRET-GOOGLE-KEY";

    // Act
    let error = transport
        .send(HttpRequest::post_json(url, json!({})))
        .await
        .unwrap_err();

    // Assert
    assert!(error.to_string().starts_with("Request failed"));
    assert!(
        !error.to_string().contains("SECRET-GOOGLE-KEY"),
        "Key leaked into message: {error}"
    );
    let source = std::error::Error::source(&error).map(ToString::to_string);
    assert!(!source.unwrap_or_default().contains("SECRET-GOOGLE-KEY"));
}

// ============================================================================
// Settings Tests
// ============================================================================

#[test]
fn test_default_transport_reports_default_settings() {
    let transport = ReqwestTransport::new().unwrap();

    assert_eq!(transport.settings().request_timeout, Duration::from_secs(120));
    assert_eq!(transport.settings().connect_timeout, Duration::from_secs(10));
}

#[tokio::test]
async fn test_connect_timeout_is_applied_to_client() {
    // Test verifies the connect timeout bounds the call, not the longer
    // request timeout

    // Arrange
    let settings = TransportSettings {
        request_timeout: Duration::from_secs(30),
        connect_timeout: Duration::from_millis(200),
    };
    let transport = ReqwestTransport::with_settings(settings).unwrap();
    // Non-routable address: the connect attempt hangs or fails outright
    let url = "http://10.255.255.1:81/v1/ocr";

    // Act
    let started = Instant::now();
    let error = transport
        .send(HttpRequest::post_json(url, json!({})))
        .await
        .unwrap_err();

    // Assert
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(
        error.to_string().starts_with("Request failed"),
        "Expected a connect failure, got: {error}"
    );
    assert_eq!(transport.settings().connect_timeout, Duration::from_millis(200));
}
