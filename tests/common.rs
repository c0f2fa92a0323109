//! Test helper utilities for ocr-llm integration tests
//!
//! This module provides reusable fixtures shared by the wiremock-backed
//! test files.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use base64::Engine;
use ocr_llm::{RecognizeConfig, ReqwestTransport, TransportSettings};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::MockServer;

pub const OCR_PATH: &str = "/v1/ocr";
pub const CHAT_PATH: &str = "/v1/chat/completions";

/// A few bytes standing in for a PNG, base64-encoded the way hosts send it
pub fn test_image() -> String {
    base64::engine::general_purpose::STANDARD.encode(b"\x89PNG\r\n\x1a\nfake image")
}

/// OCR response body with one page per markdown entry
pub fn ocr_response(markdown: &[&str]) -> Value {
    let pages: Vec<Value> = markdown
        .iter()
        .enumerate()
        .map(|(index, text)| {
            json!({
                "index": index,
                "markdown": text,
                "images": [],
                "dimensions": { "dpi": 200, "height": 1100, "width": 850 }
            })
        })
        .collect();
    json!({
        "pages": pages,
        "model": "mistral-ocr-latest",
        "usage_info": { "pages_processed": markdown.len() }
    })
}

pub fn chat_response(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

/// OCR-only config pointed at the mock server
pub fn ocr_config(server: &MockServer) -> RecognizeConfig {
    RecognizeConfig::new("ocr-key").with_ocr_endpoint(format!("{}{}", server.uri(), OCR_PATH))
}

/// Post-processing config with both calls pointed at the mock server
pub fn llm_config(server: &MockServer, model: &str) -> RecognizeConfig {
    ocr_config(server)
        .with_llm(model)
        .with_request_path(server.uri())
}

/// Transport with short timeouts so slow-response tests finish quickly
pub fn fast_transport(request_timeout: Duration) -> ReqwestTransport {
    ReqwestTransport::with_settings(TransportSettings {
        request_timeout,
        connect_timeout: Duration::from_secs(2),
    })
    .unwrap()
}
