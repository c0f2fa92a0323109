//! `reqwest`-backed transport

use super::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
use crate::config::TransportSettings;
use crate::error::{RecognizeError, RecognizeResult};
use crate::logging::{log_debug, log_error};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// Default [`Transport`] built on a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    settings: TransportSettings,
}

impl ReqwestTransport {
    /// Create a transport with the default timeouts
    ///
    /// # Errors
    ///
    /// Returns [`RecognizeError::InvalidConfiguration`] if the HTTP client
    /// cannot be built.
    pub fn new() -> RecognizeResult<Self> {
        Self::with_settings(TransportSettings::default())
    }

    /// Create a transport with custom timeouts
    ///
    /// # Errors
    ///
    /// Returns [`RecognizeError::InvalidConfiguration`] if the HTTP client
    /// cannot be built (e.g. the TLS backend fails to initialize).
    pub fn with_settings(settings: TransportSettings) -> RecognizeResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| {
                RecognizeError::invalid_configuration(format!("Failed to build HTTP client: {e}"))
            })?;
        Ok(Self::with_client(client, settings))
    }

    /// Reuse an existing client (connection pool, proxies, custom TLS)
    ///
    /// Only `request_timeout` is enforced here. The connect timeout is
    /// whatever `client` was built with, so `settings.connect_timeout` should
    /// describe that client.
    pub fn with_client(client: reqwest::Client, settings: TransportSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    fn build_headers(headers: &[(String, String)]) -> RecognizeResult<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                RecognizeError::invalid_configuration(format!("Invalid header name {name}: {e}"))
            })?;
            // Header values carry API keys; keep them out of the message.
            let value = HeaderValue::from_str(value).map_err(|e| {
                RecognizeError::invalid_configuration(format!(
                    "Invalid value for header {name}: {e}"
                ))
            })?;
            map.insert(name, value);
        }
        Ok(map)
    }

    async fn execute(&self, request: HttpRequest) -> RecognizeResult<HttpResponse> {
        let headers = Self::build_headers(&request.headers)?;

        let mut builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
        }
        .headers(headers);

        if let Some(RequestBody::Json(payload)) = &request.body {
            builder = builder.json(payload);
        }

        // reqwest errors print the URL, which carries the Gemini query key.
        let response = builder.send().await.map_err(|e| {
            let e = e.without_url();
            log_error!(
                method = request.method.as_str(),
                error = %e,
                "HTTP request failed"
            );
            RecognizeError::transport_failure(format!("Request failed: {e}"), Some(Box::new(e)))
        })?;

        let status = response.status().as_u16();
        let raw_body = response.text().await.map_err(|e| {
            let e = e.without_url();
            log_error!(status = status, error = %e, "Failed to read response body");
            RecognizeError::transport_failure(
                format!("Failed to read response: {e}"),
                Some(Box::new(e)),
            )
        })?;

        log_debug!(
            status = status,
            body_length = raw_body.len(),
            "HTTP response received"
        );

        Ok(HttpResponse::new(status, decode_body(&raw_body)))
    }
}

/// Decode a response body: JSON when possible, raw text otherwise.
fn decode_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> RecognizeResult<HttpResponse> {
        let timeout = self.settings.request_timeout;
        match tokio::time::timeout(timeout, self.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(RecognizeError::transport_failure(
                format!("Request timed out after {timeout:?}"),
                None,
            )),
        }
    }
}
