//! Reply text extraction
//!
//! Vendors and proxies disagree on where the reply lives, so extraction is
//! best-effort: an ordered list of JSON paths is tried and the first one that
//! holds a non-empty string wins.

use super::endpoint::is_google_endpoint;
use crate::error::{RecognizeError, RecognizeResult};
use crate::logging::{log_debug, log_warn};
use crate::transport::{render_body, HttpResponse};
use serde_json::Value;

/// A named JSON path that may hold the reply text
pub struct ResponseShape {
    pub name: &'static str,
    pub pointer: &'static str,
}

const OPENAI_SHAPE: ResponseShape = ResponseShape {
    name: "openai",
    pointer: "/choices/0/message/content",
};

const GEMINI_SHAPE: ResponseShape = ResponseShape {
    name: "gemini",
    pointer: "/candidates/0/content/parts/0/text",
};

/// Shapes tried for any endpoint other than Google's native API
pub const FALLBACK_SHAPES: &[ResponseShape] = &[
    OPENAI_SHAPE,
    GEMINI_SHAPE,
    ResponseShape {
        name: "simplified",
        pointer: "/content",
    },
    ResponseShape {
        name: "message",
        pointer: "/message/content",
    },
    ResponseShape {
        name: "text",
        pointer: "/text",
    },
    ResponseShape {
        name: "data",
        pointer: "/data",
    },
];

/// Shapes tried for Google's native API
pub const GOOGLE_SHAPES: &[ResponseShape] = &[GEMINI_SHAPE];

impl ResponseShape {
    fn extract<'a>(&self, data: &'a Value) -> Option<&'a str> {
        data.pointer(self.pointer)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }
}

/// Shapes to try for a resolved endpoint, in priority order
pub fn shapes_for(url: &str) -> &'static [ResponseShape] {
    if is_google_endpoint(url) {
        GOOGLE_SHAPES
    } else {
        FALLBACK_SHAPES
    }
}

/// Extract the reply text from a decoded response body.
///
/// Returns the matching shape name with the text.
///
/// # Errors
///
/// - [`RecognizeError::MalformedResponse`] if the body is empty
/// - [`RecognizeError::NoTextExtracted`] if no shape matches
pub fn extract_reply(url: &str, data: &Value) -> RecognizeResult<(&'static str, String)> {
    if data.is_null() {
        return Err(RecognizeError::malformed_response(
            "Empty response from API",
            String::new(),
        ));
    }

    let shapes = shapes_for(url);
    if let Some((name, text)) = shapes
        .iter()
        .find_map(|shape| shape.extract(data).map(|text| (shape.name, text)))
    {
        log_debug!(shape = name, text_length = text.len(), "Extracted LLM reply");
        return Ok((name, text.to_string()));
    }

    let body = render_body(data);
    let message = if is_google_endpoint(url) {
        format!("Invalid Gemini API Response: {body}")
    } else {
        log_warn!(
            shape_count = shapes.len(),
            "Unrecognized LLM response format"
        );
        format!("Unable to extract text from response: {body}")
    };
    Err(RecognizeError::no_text_extracted(message, Some(body)))
}

/// Check the status, then extract the reply text.
///
/// # Errors
///
/// [`RecognizeError::TransportFailure`] for non-2xx statuses, otherwise any
/// error from [`extract_reply`].
pub fn extract_response_text(url: &str, response: &HttpResponse) -> RecognizeResult<String> {
    if !response.ok() {
        let body = response.body_text();
        return Err(RecognizeError::http_status(
            format!("API request failed: {} - {}", response.status, body),
            response.status,
            body,
        ));
    }

    extract_reply(url, &response.data).map(|(_, text)| text)
}
