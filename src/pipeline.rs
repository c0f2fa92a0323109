//! Recognition pipeline: OCR, then optional LLM post-processing.
//!
//! ```text
//! OcrPending ──> OcrDone ──┬──> LlmDisabled ──> Done
//!                          └──> LlmPending ───> Done
//! ```
//!
//! OCR failures end the call with an error. LLM failures never do: the OCR
//! text is returned with a diagnostic note in front of it.

use crate::config::{PluginConfig, DEFAULT_LLM_MODEL, DEFAULT_OCR_ENDPOINT, DEFAULT_PROMPT};
use crate::error::{RecognizeError, RecognizeResult};
use crate::llm::{process_with_llm, LlmRequestSettings};
use crate::logging::{log_debug, log_info, log_warn};
use crate::ocr::run_ocr;
use crate::transport::Transport;
use std::fmt;
use tracing::Instrument;

/// Prefix of the note placed before OCR text when post-processing fails
pub const LLM_FAILURE_NOTE: &str = "[LLM post-processing failed, showing raw OCR result]";

/// Pipeline stages, logged at each transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    OcrPending,
    OcrDone,
    LlmDisabled,
    LlmPending,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::OcrPending => "ocr_pending",
            Stage::OcrDone => "ocr_done",
            Stage::LlmDisabled => "llm_disabled",
            Stage::LlmPending => "llm_pending",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Detailed result of a recognition call
#[derive(Debug)]
pub struct RecognizeOutcome {
    /// Text to hand back to the user
    pub text: String,
    /// Raw OCR text, before any post-processing
    pub ocr_text: String,
    /// Whether the LLM step was attempted
    pub llm_attempted: bool,
    /// Why the LLM step failed, when it did
    pub llm_error: Option<RecognizeError>,
}

impl RecognizeOutcome {
    /// True when `text` is the LLM reply rather than raw or annotated OCR text
    pub fn is_post_processed(&self) -> bool {
        self.llm_attempted && self.llm_error.is_none()
    }
}

/// Render the fallback returned when post-processing fails.
pub fn annotate_llm_failure(error: &RecognizeError, ocr_text: &str) -> String {
    format!("{LLM_FAILURE_NOTE} Error: {error}\n\n{ocr_text}")
}

/// Effective LLM settings with the documented fallbacks applied
pub fn llm_settings<C: PluginConfig + ?Sized>(config: &C) -> LlmRequestSettings {
    LlmRequestSettings {
        api_key: config
            .llm_api_key()
            .or(config.api_key())
            .unwrap_or_default()
            .to_string(),
        model: config.llm_model().unwrap_or(DEFAULT_LLM_MODEL).to_string(),
        request_path: config.request_path().map(str::to_string),
        prompt_template: config.custom_prompt().unwrap_or(DEFAULT_PROMPT).to_string(),
    }
}

fn enter(stage: Stage) {
    log_debug!(stage = %stage, "Recognition stage");
}

/// Run OCR and, if enabled, LLM post-processing, reporting what happened.
///
/// # Errors
///
/// Only OCR-tier failures are returned; see [`run_ocr`].
pub async fn recognize_detailed<C, T>(
    image_base64: &str,
    target_language: &str,
    config: &C,
    transport: &T,
) -> RecognizeResult<RecognizeOutcome>
where
    C: PluginConfig + ?Sized,
    T: Transport + ?Sized,
{
    let span = tracing::info_span!(
        "recognize",
        request_id = %uuid::Uuid::new_v4(),
        target_language = %target_language
    );

    async move {
        enter(Stage::OcrPending);
        let api_key = config.api_key().unwrap_or_default();
        let endpoint = config.ocr_endpoint().unwrap_or(DEFAULT_OCR_ENDPOINT);
        let ocr_text = run_ocr(transport, image_base64, api_key, endpoint).await?;
        enter(Stage::OcrDone);

        let toggle = config.enable_llm();
        if !toggle.is_enabled() {
            enter(Stage::LlmDisabled);
            log_info!(
                enable_llm = ?toggle,
                text_length = ocr_text.len(),
                "Post-processing disabled, returning OCR result"
            );
            enter(Stage::Done);
            return Ok(RecognizeOutcome {
                text: ocr_text.clone(),
                ocr_text,
                llm_attempted: false,
                llm_error: None,
            });
        }

        enter(Stage::LlmPending);
        let settings = llm_settings(config);
        log_info!(
            model = %settings.model,
            has_request_path = settings.request_path.is_some(),
            has_llm_api_key = config.llm_api_key().is_some(),
            "Post-processing enabled"
        );

        let outcome = match process_with_llm(transport, &ocr_text, target_language, &settings).await
        {
            Ok(text) => RecognizeOutcome {
                text,
                ocr_text,
                llm_attempted: true,
                llm_error: None,
            },
            Err(error) => {
                log_warn!(
                    error = %error,
                    category = ?error.category(),
                    "LLM post-processing failed, falling back to OCR text"
                );
                RecognizeOutcome {
                    text: annotate_llm_failure(&error, &ocr_text),
                    ocr_text,
                    llm_attempted: true,
                    llm_error: Some(error),
                }
            }
        };
        enter(Stage::Done);
        Ok(outcome)
    }
    .instrument(span)
    .await
}

/// Recognize the text in a base64-encoded PNG.
///
/// Returns the LLM reply when post-processing is enabled and succeeds, the
/// OCR text when it is disabled, and the annotated OCR text when it fails.
///
/// # Errors
///
/// Only OCR-tier failures are returned.
pub async fn recognize<C, T>(
    image_base64: &str,
    target_language: &str,
    config: &C,
    transport: &T,
) -> RecognizeResult<String>
where
    C: PluginConfig + ?Sized,
    T: Transport + ?Sized,
{
    recognize_detailed(image_base64, target_language, config, transport)
        .await
        .map(|outcome| outcome.text)
}

/// A configuration and a transport kept together for repeated calls.
#[derive(Debug, Clone)]
pub struct Recognizer<C, T> {
    config: C,
    transport: T,
}

impl<C, T> Recognizer<C, T>
where
    C: PluginConfig,
    T: Transport,
{
    pub fn new(config: C, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub async fn recognize(
        &self,
        image_base64: &str,
        target_language: &str,
    ) -> RecognizeResult<String> {
        recognize(image_base64, target_language, &self.config, &self.transport).await
    }

    pub async fn recognize_detailed(
        &self,
        image_base64: &str,
        target_language: &str,
    ) -> RecognizeResult<RecognizeOutcome> {
        recognize_detailed(image_base64, target_language, &self.config, &self.transport).await
    }
}
