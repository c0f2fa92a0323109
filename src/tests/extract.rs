// Unit Tests for LLM Reply Extraction
//
// UNIT UNDER TEST: extract_reply, extract_response_text
//
// BUSINESS RESPONSIBILITY:
//   - Rejects non-success responses with status and body
//   - Requires the Gemini shape for Google's native API
//   - Sniffs the reply text from several known shapes elsewhere, first match wins
//
// TEST COVERAGE:
//   - Each fallback shape in isolation
//   - Priority when several shapes are present
//   - Failure messages carry the full body

use crate::error::RecognizeError;
use crate::llm::extract::{extract_reply, extract_response_text};
use crate::tests::helpers::{gemini_reply, openai_reply};
use crate::transport::HttpResponse;
use serde_json::{json, Value};

const PROXY_URL: &str = "https://my-proxy.com/v1/chat/completions";
const GOOGLE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent";

#[cfg(test)]
mod fallback_shape_tests {
    use super::*;

    fn shape_of(data: Value) -> (&'static str, String) {
        extract_reply(PROXY_URL, &data).unwrap()
    }

    #[test]
    fn test_openai_shape() {
        assert_eq!(shape_of(openai_reply("fixed")), ("openai", "fixed".to_string()));
    }

    #[test]
    fn test_gemini_shape_from_proxy() {
        assert_eq!(shape_of(gemini_reply("fixed")), ("gemini", "fixed".to_string()));
    }

    #[test]
    fn test_simplified_content_shape() {
        assert_eq!(
            shape_of(json!({ "content": "fixed" })),
            ("simplified", "fixed".to_string())
        );
    }

    #[test]
    fn test_message_content_shape() {
        assert_eq!(
            shape_of(json!({ "message": { "content": "fixed" } })),
            ("message", "fixed".to_string())
        );
    }

    #[test]
    fn test_text_then_data_shapes() {
        assert_eq!(shape_of(json!({ "text": "t" })), ("text", "t".to_string()));
        assert_eq!(shape_of(json!({ "data": "d" })), ("data", "d".to_string()));
        assert_eq!(
            shape_of(json!({ "text": "t", "data": "d" })),
            ("text", "t".to_string())
        );
    }

    #[test]
    fn test_first_matching_shape_wins() {
        // Test verifies OpenAI shape takes priority over the simpler ones
        let data = json!({
            "choices": [{ "message": { "content": "from choices" } }],
            "content": "from content"
        });

        assert_eq!(shape_of(data), ("openai", "from choices".to_string()));
    }

    #[test]
    fn test_empty_content_falls_through_to_next_shape() {
        let data = json!({
            "choices": [{ "message": { "content": "" } }],
            "text": "from text"
        });

        assert_eq!(shape_of(data), ("text", "from text".to_string()));
    }

    #[test]
    fn test_unrecognized_shape_fails_with_body() {
        // Arrange
        let data = json!({ "result": { "output": "hidden" } });

        // Act
        let error = extract_reply(PROXY_URL, &data).unwrap_err();

        // Assert
        assert!(matches!(error, RecognizeError::NoTextExtracted { .. }));
        assert!(error.to_string().contains("hidden"), "Message should name the body");
        assert_eq!(error.raw_body(), Some(data.to_string().as_str()));
    }

    #[test]
    fn test_null_body_is_malformed() {
        let error = extract_reply(PROXY_URL, &Value::Null).unwrap_err();

        assert!(matches!(error, RecognizeError::MalformedResponse { .. }));
        assert_eq!(error.to_string(), "Empty response from API");
    }
}

#[cfg(test)]
mod google_shape_tests {
    use super::*;

    #[test]
    fn test_google_endpoint_reads_candidates() {
        let (shape, text) = extract_reply(GOOGLE_URL, &gemini_reply("bonjour")).unwrap();

        assert_eq!(shape, "gemini");
        assert_eq!(text, "bonjour");
    }

    #[test]
    fn test_google_endpoint_ignores_other_shapes() {
        // Test verifies Google's native API only accepts the candidates shape

        // Arrange
        let data = openai_reply("should not be used");

        // Act
        let error = extract_reply(GOOGLE_URL, &data).unwrap_err();

        // Assert
        assert!(matches!(error, RecognizeError::NoTextExtracted { .. }));
        assert!(error.to_string().starts_with("Invalid Gemini API Response:"));
    }
}

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_non_success_status_fails_with_status_and_body() {
        // Arrange
        let response = HttpResponse::new(401, json!({ "error": { "message": "bad key" } }));

        // Act
        let error = extract_response_text(PROXY_URL, &response).unwrap_err();

        // Assert
        assert_eq!(error.status(), Some(401));
        assert!(error.to_string().starts_with("API request failed: 401 - "));
        assert!(error.to_string().contains("bad key"));
    }

    #[test]
    fn test_success_status_extracts_text() {
        let response = HttpResponse::new(200, openai_reply("clean text"));

        let text = extract_response_text(PROXY_URL, &response).unwrap();

        assert_eq!(text, "clean text");
    }

    #[test]
    fn test_plain_text_error_body_is_rendered_unquoted() {
        let response = HttpResponse::new(502, Value::String("Bad Gateway".to_string()));

        let error = extract_response_text(PROXY_URL, &response).unwrap_err();

        assert_eq!(error.to_string(), "API request failed: 502 - Bad Gateway");
    }
}
