//! LLM post-processing of OCR text
//!
//! Split into modules:
//! - `endpoint` - vendor selection, URL normalization, auth placement
//! - `payload` - prompt templating and request body encoders
//! - `extract` - reply text extraction from heterogeneous responses
//! - `types` - request body structures
//!
//! ```text
//! model + requestPath ──> endpoint ──> ResolvedEndpoint
//!                                            │
//! prompt + OCR text ──> payload ──> body ──> Transport ──> extract ──> text
//! ```

pub mod endpoint;
pub mod extract;
pub mod payload;
pub mod types;

pub use endpoint::{
    normalize_chat_endpoint, resolve_endpoint, AuthScheme, BodyShape, ResolvedEndpoint, Vendor,
};
pub use extract::extract_response_text;
pub use payload::{compose_user_content, render_prompt};

use crate::error::{RecognizeError, RecognizeResult};
use crate::logging::{log_debug, log_info};
use crate::transport::{HttpRequest, Transport};
use payload::PromptInput;

/// Effective settings for one post-processing call, fallbacks applied
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequestSettings {
    pub api_key: String,
    pub model: String,
    /// User-supplied endpoint; `None` lets resolution pick the vendor default
    pub request_path: Option<String>,
    pub prompt_template: String,
}

/// Send OCR text through the configured LLM and return its reply.
///
/// # Errors
///
/// - [`RecognizeError::MissingCredential`] if no API key is available
/// - [`RecognizeError::TransportFailure`] on network errors or non-2xx status
/// - [`RecognizeError::MalformedResponse`] / [`RecognizeError::NoTextExtracted`]
///   if no reply text can be found
pub async fn process_with_llm<T>(
    transport: &T,
    text: &str,
    lang: &str,
    settings: &LlmRequestSettings,
) -> RecognizeResult<String>
where
    T: Transport + ?Sized,
{
    if settings.api_key.is_empty() {
        return Err(RecognizeError::missing_credential("LLM API Key not provided"));
    }

    let resolved = resolve_endpoint(&settings.model, settings.request_path.as_deref());
    let prompt = render_prompt(&settings.prompt_template, lang);
    let content = compose_user_content(&prompt, text);

    let (encoder, body) = payload::encode_body(
        &resolved.url,
        &PromptInput {
            model: &settings.model,
            content: &content,
        },
    )?;

    log_info!(
        vendor = %resolved.vendor,
        model = %settings.model,
        endpoint = %resolved.url,
        auth = ?resolved.auth,
        encoder = encoder,
        "Sending LLM post-processing request"
    );

    let mut request = HttpRequest::post_json(resolved.request_url(&settings.api_key), body);
    if resolved.auth == AuthScheme::Bearer {
        request = request.with_bearer_auth(&settings.api_key);
    }

    let response = transport.send(request).await?;

    log_debug!(
        status = response.status,
        vendor = %resolved.vendor,
        "LLM response received"
    );

    extract_response_text(&resolved.url, &response)
}
