//! LLM endpoint resolution
//!
//! Turns a model name and an optional user-supplied endpoint into the URL to
//! call, the body shape to send and the way the key is attached. Vendor
//! selection is an ordered rule table; the first rule whose predicate holds
//! decides the URL.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Default endpoint for OpenAI-compatible models
pub const OPENAI_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default endpoint for Mistral models
pub const MISTRAL_CHAT_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";

const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Marker for endpoints served by Google's native API
pub const GOOGLE_API_HOST_MARKER: &str = "googleapis.com";

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

static SCHEME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("scheme pattern is a valid regex"));

/// Vendor family chosen for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Gemini,
    Mistral,
    OpenAi,
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vendor::Gemini => write!(f, "gemini"),
            Vendor::Mistral => write!(f, "mistral"),
            Vendor::OpenAi => write!(f, "openai"),
        }
    }
}

/// How the API key travels with the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `?key=<key>` query parameter, no Authorization header
    QueryKey,
}

/// JSON body layout expected by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// `{contents: [{parts: [{text}]}]}`
    GeminiNative,
    /// `{model, messages, temperature}`
    ChatCompletions,
}

/// Result of endpoint resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub vendor: Vendor,
    pub auth: AuthScheme,
    pub body_shape: BodyShape,
}

impl ResolvedEndpoint {
    fn new(url: String, vendor: Vendor) -> Self {
        let native = is_google_endpoint(&url);
        Self {
            url,
            vendor,
            auth: if native {
                AuthScheme::QueryKey
            } else {
                AuthScheme::Bearer
            },
            body_shape: if native {
                BodyShape::GeminiNative
            } else {
                BodyShape::ChatCompletions
            },
        }
    }

    /// URL to send the request to, with the key attached when the endpoint
    /// expects it in the query string
    pub fn request_url(&self, api_key: &str) -> String {
        match self.auth {
            AuthScheme::QueryKey => append_query_key(&self.url, api_key),
            AuthScheme::Bearer => self.url.clone(),
        }
    }
}

/// True when the URL points at Google's native Generative Language API
pub fn is_google_endpoint(url: &str) -> bool {
    url.contains(GOOGLE_API_HOST_MARKER)
}

fn append_query_key(url: &str, api_key: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}key={api_key}")
}

/// Native `generateContent` endpoint for a Gemini model
pub fn google_generate_content_url(model: &str) -> String {
    format!("{GOOGLE_API_BASE}/{model}:generateContent")
}

/// Complete a user-supplied chat endpoint.
///
/// Adds `https://` when no scheme is present, strips trailing slashes and
/// appends `/chat/completions` (URL already has `/v1`) or
/// `/v1/chat/completions` (it does not) unless the full path is present.
pub fn normalize_chat_endpoint(endpoint: &str) -> String {
    let mut url = if SCHEME_PATTERN.is_match(endpoint) {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };

    let trimmed_len = url.trim_end_matches('/').len();
    url.truncate(trimmed_len);

    if !url.contains(CHAT_COMPLETIONS_PATH) {
        if url.contains("/v1") {
            url.push_str("/chat/completions");
        } else {
            url.push_str(CHAT_COMPLETIONS_PATH);
        }
    }
    url
}

/// One entry of the resolution table
struct EndpointRule {
    vendor: Vendor,
    applies: fn(&str, Option<&str>) -> bool,
    resolve: fn(&str, Option<&str>) -> String,
}

fn is_gemini_model(model: &str, _endpoint: Option<&str>) -> bool {
    model.to_lowercase().contains("gemini")
}

fn resolve_gemini(model: &str, endpoint: Option<&str>) -> String {
    match endpoint {
        Some(url) if !url.contains("api.openai.com") && !url.contains("api.mistral.ai") => {
            url.to_string()
        }
        _ => google_generate_content_url(model),
    }
}

fn is_mistral(model: &str, endpoint: Option<&str>) -> bool {
    model.to_lowercase().contains("mistral") || endpoint.is_some_and(|url| url.contains("mistral"))
}

fn resolve_mistral(_model: &str, endpoint: Option<&str>) -> String {
    endpoint.map_or_else(|| MISTRAL_CHAT_ENDPOINT.to_string(), normalize_chat_endpoint)
}

fn always(_model: &str, _endpoint: Option<&str>) -> bool {
    true
}

fn resolve_openai(_model: &str, endpoint: Option<&str>) -> String {
    endpoint.map_or_else(|| OPENAI_CHAT_ENDPOINT.to_string(), normalize_chat_endpoint)
}

/// Resolution rules in priority order; the last one always applies
const RULES: &[EndpointRule] = &[
    EndpointRule {
        vendor: Vendor::Gemini,
        applies: is_gemini_model,
        resolve: resolve_gemini,
    },
    EndpointRule {
        vendor: Vendor::Mistral,
        applies: is_mistral,
        resolve: resolve_mistral,
    },
    EndpointRule {
        vendor: Vendor::OpenAi,
        applies: always,
        resolve: resolve_openai,
    },
];

/// Resolve where and how to send the post-processing request.
///
/// An empty `endpoint` counts as not supplied.
pub fn resolve_endpoint(model: &str, endpoint: Option<&str>) -> ResolvedEndpoint {
    let endpoint = endpoint.map(str::trim).filter(|e| !e.is_empty());

    let (vendor, url) = RULES
        .iter()
        .find(|rule| (rule.applies)(model, endpoint))
        .map(|rule| (rule.vendor, (rule.resolve)(model, endpoint)))
        .unwrap_or_else(|| (Vendor::OpenAi, resolve_openai(model, endpoint)));

    ResolvedEndpoint::new(url, vendor)
}
