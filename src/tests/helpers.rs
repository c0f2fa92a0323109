//! Test helper utilities for ocr-llm unit tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use crate::config::RecognizeConfig;
use crate::error::{RecognizeError, RecognizeResult};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// In-memory transport that replays canned responses in order and records
/// every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<RecognizeResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and JSON body
    pub fn respond(self, status: u16, data: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, data)));
        self
    }

    /// Queue a transport-level failure (no response at all)
    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(RecognizeError::transport_failure(message, None)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request(&self, index: usize) -> HttpRequest {
        self.requests()
            .get(index)
            .cloned()
            .unwrap_or_else(|| panic!("No request recorded at index {index}"))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> RecognizeResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RecognizeError::transport_failure("No scripted response", None)))
    }
}

pub const TEST_IMAGE: &str = "iVBORw0KGgoAAAANSUhEUg==";

/// OCR response body with one page per markdown entry
pub fn ocr_pages(markdown: &[&str]) -> Value {
    let pages: Vec<Value> = markdown
        .iter()
        .enumerate()
        .map(|(index, text)| json!({ "index": index, "markdown": text }))
        .collect();
    json!({ "pages": pages, "model": "mistral-ocr-latest" })
}

pub fn openai_reply(content: &str) -> Value {
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// Config with post-processing enabled for the given model
pub fn llm_config(model: &str) -> RecognizeConfig {
    RecognizeConfig::new("ocr-key").with_llm(model)
}
