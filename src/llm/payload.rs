//! Prompt templating and request body encoding

use super::endpoint::is_google_endpoint;
use super::types::{
    ChatCompletionRequest, ChatMessage, GeminiContent, GeminiPart, GeminiRequest,
    CHAT_TEMPERATURE,
};
use crate::error::{RecognizeError, RecognizeResult};
use serde_json::Value;

/// Placeholder replaced with the target language code
pub const LANG_PLACEHOLDER: &str = "$lang";

/// Substitute every `$lang` in the template with `lang`.
pub fn render_prompt(template: &str, lang: &str) -> String {
    template.replace(LANG_PLACEHOLDER, lang)
}

/// User message content: the rendered prompt, a blank line, then the text.
pub fn compose_user_content(prompt: &str, text: &str) -> String {
    format!("{prompt}\n\n{text}")
}

/// Everything an encoder needs to build a body
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub model: &'a str,
    /// Already-composed user message
    pub content: &'a str,
}

type Encoder = fn(&PromptInput<'_>) -> serde_json::Result<Value>;

fn encode_gemini(input: &PromptInput<'_>) -> serde_json::Result<Value> {
    serde_json::to_value(GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: input.content.to_string(),
            }],
        }],
    })
}

fn encode_chat_completion(input: &PromptInput<'_>) -> serde_json::Result<Value> {
    serde_json::to_value(ChatCompletionRequest {
        model: input.model.to_string(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: input.content.to_string(),
        }],
        temperature: CHAT_TEMPERATURE,
    })
}

fn any_endpoint(_url: &str) -> bool {
    true
}

/// (predicate on resolved URL, encoder), first match wins
const ENCODERS: &[(&str, fn(&str) -> bool, Encoder)] = &[
    ("gemini_native", is_google_endpoint, encode_gemini),
    ("chat_completions", any_endpoint, encode_chat_completion),
];

/// Encode the request body for the resolved endpoint.
///
/// Returns the encoder name alongside the body for logging.
pub fn encode_body(url: &str, input: &PromptInput<'_>) -> RecognizeResult<(&'static str, Value)> {
    let (name, _, encoder) = ENCODERS
        .iter()
        .find(|(_, applies, _)| applies(url))
        .unwrap_or(&ENCODERS[ENCODERS.len() - 1]);

    let body = encoder(input).map_err(|e| {
        RecognizeError::invalid_configuration(format!("Failed to encode {name} request: {e}"))
    })?;
    Ok((*name, body))
}
