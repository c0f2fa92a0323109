//! # ocr-llm
//!
//! Mistral OCR client with optional LLM post-processing through OpenAI-compatible,
//! Mistral, or Google Gemini chat APIs.
//!
//! ## Key Features
//!
//! - **OCR**: one call to Mistral OCR, page markdown joined in order
//! - **Post-processing**: optional clean-up or translation through an LLM,
//!   with the vendor picked from the model name and endpoint
//! - **Never lose the OCR result**: LLM failures fall back to the OCR text
//!   with a diagnostic note
//! - **Injected transport**: bring your own HTTP stack or use the bundled
//!   `reqwest` transport
//!
//! ## Example
//!
//! ```rust,no_run
//! use ocr_llm::{recognize, RecognizeConfig, ReqwestTransport};
//!
//! # async fn example(image_base64: &str) -> anyhow::Result<()> {
//! let config = RecognizeConfig::new("mistral-api-key")
//!     .with_llm("gemini-1.5-flash")
//!     .with_llm_api_key("google-api-key")
//!     .with_prompt("Translate the text to $lang. Reply with the translation only.");
//!
//! let transport = ReqwestTransport::new()?;
//! let text = recognize(image_base64, "fr", &config, &transport).await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod config;
pub mod error;
pub mod llm;
pub mod ocr;
pub mod pipeline;
pub mod transport;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use config::{LlmToggle, PluginConfig, RecognizeConfig, TransportSettings};
pub use error::{ErrorCategory, RecognizeError, RecognizeResult};
pub use llm::{resolve_endpoint, AuthScheme, BodyShape, ResolvedEndpoint, Vendor};
pub use pipeline::{recognize, recognize_detailed, RecognizeOutcome, Recognizer, Stage};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, RequestBody, ReqwestTransport, Transport};
