//! HTTP transport abstraction
//!
//! The pipeline never talks to the network directly. It builds an
//! [`HttpRequest`], hands it to a [`Transport`], and inspects the
//! [`HttpResponse`] it gets back. Hosts that already own an HTTP stack
//! implement the trait themselves; everyone else can use
//! [`http::ReqwestTransport`].
//!
//! ```text
//! pipeline ──HttpRequest──> Transport ──> vendor API
//!          <─HttpResponse──
//! ```

pub mod http;

use crate::error::RecognizeResult;
use async_trait::async_trait;
use serde_json::Value;

pub use http::ReqwestTransport;

/// HTTP method of an outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
        }
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
}

/// A single outbound HTTP call
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Header name/value pairs, in insertion order
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// POST a JSON body
    pub fn post_json(url: impl Into<String>, payload: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(RequestBody::Json(payload)),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_bearer_auth(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }

    /// Look up a header, ignoring ASCII case in the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Some(RequestBody::Json(value)) => Some(value),
            None => None,
        }
    }
}

/// Response handed back by a transport
///
/// `data` is the decoded JSON body. Bodies that are not JSON arrive as
/// `Value::String`, empty bodies as `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub data: Value,
}

impl HttpResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// True for 2xx statuses
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body rendered as compact JSON, for error messages
    pub fn body_text(&self) -> String {
        render_body(&self.data)
    }
}

/// Render a JSON payload for diagnostics, leaving plain strings unquoted.
pub(crate) fn render_body(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Injected HTTP client.
///
/// Implementations must return `Ok` for any response that arrived, whatever
/// its status; `Err` is reserved for calls that produced no response at all
/// (DNS failure, refused connection, timeout).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> RecognizeResult<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> RecognizeResult<HttpResponse> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<'a, T: Transport + ?Sized> Transport for &'a T {
    async fn send(&self, request: HttpRequest) -> RecognizeResult<HttpResponse> {
        (**self).send(request).await
    }
}
