//! Error types for OCR and LLM post-processing.
//!
//! This module provides structured error handling for ocr-llm operations,
//! including categorization and user-facing messages.
//!
//! # Error Types
//!
//! The main error type is [`RecognizeError`], a closed set of failure kinds:
//! - Missing credentials (no OCR or LLM API key)
//! - Transport failures (network issues, non-2xx responses, timeouts)
//! - Malformed responses (empty body, missing `pages`)
//! - Responses that parse but carry no usable text
//! - Invalid configuration values
//!
//! Each variant carries the raw payload when one is available so the caller
//! can see exactly what the vendor sent back.
//!
//! # Two tiers
//!
//! Errors raised during the OCR step are returned to the caller. Errors raised
//! during LLM post-processing are caught by the pipeline and turned into an
//! annotation on the OCR text, so they never reach the caller of
//! [`recognize`](crate::recognize).
//!
//! ```rust
//! use ocr_llm::{RecognizeError, RecognizeResult};
//!
//! fn require_key(key: &str) -> RecognizeResult<&str> {
//!     if key.is_empty() {
//!         return Err(RecognizeError::missing_credential("API Key not found"));
//!     }
//!     Ok(key)
//! }
//! ```

use crate::logging::{log_error, log_warn};
use thiserror::Error;

/// High-level categorization of errors for routing and handling decisions.
///
/// Use [`RecognizeError::category()`] to get the category for any error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// External service failures (OCR or LLM vendor, network issues).
    External,

    /// Client errors (missing key, invalid configuration).
    ///
    /// The caller made a mistake that they can fix.
    Client,

    /// Temporary failures that may succeed if the caller tries again.
    ///
    /// Timeouts, rate limits and 5xx responses.
    Transient,
}

/// Convenient result type for recognition operations.
pub type RecognizeResult<T> = std::result::Result<T, RecognizeError>;

/// Errors that can occur while recognizing an image.
///
/// # Creating Errors
///
/// Use the constructor methods which automatically log the error:
///
/// ```rust
/// use ocr_llm::RecognizeError;
///
/// let err = RecognizeError::missing_credential("API Key not found");
/// let err = RecognizeError::malformed_response("No pages in response", "{}");
/// ```
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `MissingCredential` | Client | No |
/// | `TransportFailure` | External / Transient | 408, 429, 5xx, network |
/// | `MalformedResponse` | External | No |
/// | `NoTextExtracted` | External | No |
/// | `InvalidConfiguration` | Client | No |
#[derive(Error, Debug)]
pub enum RecognizeError {
    /// No API key was available for the step that needed one.
    #[error("{message}")]
    MissingCredential {
        /// Description of which credential is missing.
        message: String,
    },

    /// The request could not be delivered, or the vendor answered with a
    /// non-success status.
    #[error("{message}")]
    TransportFailure {
        /// Description of the failure.
        message: String,
        /// HTTP status, when the vendor answered at all.
        status: Option<u16>,
        /// Raw response body, when one was received.
        body: Option<String>,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The vendor answered but the payload does not have the expected shape.
    #[error("{message}")]
    MalformedResponse {
        /// Details about what was missing.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// The payload was well-formed but no text could be pulled out of it.
    #[error("{message}")]
    NoTextExtracted {
        /// Details about the extraction failure.
        message: String,
        /// Raw response body, when the failure concerns a vendor payload.
        body: Option<String>,
    },

    /// A configuration value could not be used.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl RecognizeError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredential { .. } => ErrorCategory::Client,
            Self::TransportFailure { status, .. } => match status {
                Some(code) if is_transient_status(*code) => ErrorCategory::Transient,
                Some(_) => ErrorCategory::External,
                None => ErrorCategory::Transient,
            },
            Self::MalformedResponse { .. } => ErrorCategory::External,
            Self::NoTextExtracted { .. } => ErrorCategory::External,
            Self::InvalidConfiguration { .. } => ErrorCategory::Client,
        }
    }

    /// Whether trying the same call again could plausibly succeed.
    ///
    /// Nothing in this crate retries on its own; this is a hint for hosts.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    /// HTTP status attached to a transport failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TransportFailure { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw vendor payload attached to the error, if any.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::TransportFailure { body, .. } => body.as_deref(),
            Self::MalformedResponse { body, .. } => Some(body),
            Self::NoTextExtracted { body, .. } => body.as_deref(),
            Self::MissingCredential { .. } | Self::InvalidConfiguration { .. } => None,
        }
    }

    /// Convert to a user-friendly message suitable for display.
    ///
    /// Raw payloads are left out.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential { .. } => {
                "API key not found. Please check your settings".to_string()
            }
            Self::TransportFailure { status: Some(code), .. } => {
                format!("The recognition service answered with status {code}. Please try again")
            }
            Self::TransportFailure { status: None, .. } => {
                "Unable to reach the recognition service. Please try again".to_string()
            }
            Self::MalformedResponse { .. } => {
                "Received an invalid response from the recognition service".to_string()
            }
            Self::NoTextExtracted { .. } => "No text was found in the image".to_string(),
            Self::InvalidConfiguration { .. } => {
                "Configuration issue. Please check your settings".to_string()
            }
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    /// Create a missing credential error (logs at ERROR level).
    pub fn missing_credential(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "missing_credential",
            message = %message,
            "Required API key is missing"
        );
        Self::MissingCredential { message }
    }

    /// Create a transport failure without a response (network error, timeout).
    pub fn transport_failure(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_error!(
            error_type = "transport_failure",
            message = %message,
            has_source = source.is_some(),
            "HTTP request could not be completed"
        );
        Self::TransportFailure {
            message,
            status: None,
            body: None,
            source,
        }
    }

    /// Create a transport failure for a non-success HTTP status.
    pub fn http_status(message: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let message = message.into();
        let body = body.into();
        log_error!(
            error_type = "http_status",
            status = status,
            message = %message,
            "Vendor API returned an error status"
        );
        Self::TransportFailure {
            message,
            status: Some(status),
            body: Some(body),
            source: None,
        }
    }

    pub fn malformed_response(message: impl Into<String>, body: impl Into<String>) -> Self {
        let message = message.into();
        let body = body.into();
        log_warn!(
            error_type = "malformed_response",
            message = %message,
            body_length = body.len(),
            "Vendor response format invalid"
        );
        Self::MalformedResponse { message, body }
    }

    pub fn no_text_extracted(message: impl Into<String>, body: Option<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "no_text_extracted",
            message = %message,
            has_body = body.is_some(),
            "No text could be extracted from response"
        );
        Self::NoTextExtracted { message, body }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "invalid_configuration",
            message = %message,
            "Configuration validation failed"
        );
        Self::InvalidConfiguration { message }
    }
}

fn is_transient_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..600).contains(&status)
}
