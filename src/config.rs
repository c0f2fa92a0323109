//! Configuration for a recognition call.
//!
//! The host hands over a flat record of strings each time it asks for a
//! recognition. [`PluginConfig`] is the narrow view the pipeline reads from;
//! it is implemented for the typed [`RecognizeConfig`] and for a raw
//! `HashMap<String, String>` keyed with the host's camelCase field names.

use crate::error::{RecognizeError, RecognizeResult};
use crate::logging::log_debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::time::Duration;

/// Fixed Mistral OCR endpoint.
pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.mistral.ai/v1/ocr";

/// Model used when `llmModel` is not set.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o";

/// Prompt used when `customPrompt` is not set.
pub const DEFAULT_PROMPT: &str =
    "Just recognize the text in the image. Do not offer unnecessary explanations.";

/// Tri-state switch for LLM post-processing.
///
/// Hosts store the flag as a string. A missing or empty value is `Unset`,
/// `"true"` (any case, surrounding whitespace ignored) is `Enabled`, and every
/// other value is `Disabled`. Only `Enabled` turns the LLM step on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmToggle {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

impl LlmToggle {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Unset,
            Some(value) if value.eq_ignore_ascii_case("true") => Self::Enabled,
            Some(_) => Self::Disabled,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Enabled => "true",
            Self::Disabled => "false",
        }
    }
}

impl Serialize for LlmToggle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LlmToggle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Hosts have been seen sending real booleans as well as strings.
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(s)) => Self::parse(Some(&s)),
            Some(serde_json::Value::Bool(true)) => Self::Enabled,
            Some(serde_json::Value::Null) | None => Self::Unset,
            Some(_) => Self::Disabled,
        })
    }
}

/// Read-only view over the host configuration.
///
/// Getters return `None` for fields that are missing or empty, so callers
/// can use `Option::or` to apply fallbacks.
pub trait PluginConfig: Send + Sync {
    /// OCR API key (also the LLM key unless `llm_api_key` is set)
    fn api_key(&self) -> Option<&str>;

    fn enable_llm(&self) -> LlmToggle;

    fn llm_model(&self) -> Option<&str>;

    /// User-supplied LLM endpoint, before resolution
    fn request_path(&self) -> Option<&str>;

    /// Prompt template; `$lang` is replaced with the target language
    fn custom_prompt(&self) -> Option<&str>;

    fn llm_api_key(&self) -> Option<&str>;

    /// OCR endpoint override
    fn ocr_endpoint(&self) -> Option<&str> {
        None
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Typed configuration record, field names match the host JSON config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecognizeConfig {
    pub api_key: String,
    #[serde(rename = "enableLLM")]
    pub enable_llm: LlmToggle,
    pub llm_model: Option<String>,
    pub request_path: Option<String>,
    pub custom_prompt: Option<String>,
    pub llm_api_key: Option<String>,
    pub ocr_endpoint: Option<String>,
}

impl RecognizeConfig {
    /// Config with only the OCR key set; LLM post-processing stays off.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Turn LLM post-processing on with the given model.
    pub fn with_llm(mut self, model: impl Into<String>) -> Self {
        self.enable_llm = LlmToggle::Enabled;
        self.llm_model = Some(model.into());
        self
    }

    pub fn with_request_path(mut self, path: impl Into<String>) -> Self {
        self.request_path = Some(path.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }

    pub fn with_llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm_api_key = Some(key.into());
        self
    }

    pub fn with_ocr_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ocr_endpoint = Some(endpoint.into());
        self
    }

    /// Validate the configuration is complete
    ///
    /// # Errors
    ///
    /// Returns [`RecognizeError::MissingCredential`] if the OCR API key is empty.
    pub fn validate(&self) -> RecognizeResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(RecognizeError::missing_credential("API Key not found"));
        }
        Ok(())
    }

    /// Build a config from the host's key/value record.
    pub fn from_map(section: &HashMap<String, String>) -> Self {
        log_debug!(
            key_count = section.len(),
            "Creating recognize configuration from key/value map"
        );

        let get = |key: &str| non_empty(section.get(key).map(String::as_str)).map(str::to_string);

        Self {
            api_key: get("apiKey").unwrap_or_default(),
            enable_llm: section.enable_llm(),
            llm_model: get("llmModel"),
            request_path: get("requestPath"),
            custom_prompt: get("customPrompt"),
            llm_api_key: get("llmApiKey"),
            ocr_endpoint: get("ocrEndpoint"),
        }
    }

    /// Parse the host's JSON config object.
    ///
    /// # Errors
    ///
    /// Returns [`RecognizeError::InvalidConfiguration`] if the JSON is invalid.
    pub fn from_json_str(raw: &str) -> RecognizeResult<Self> {
        serde_json::from_str(raw).map_err(|e| {
            RecognizeError::invalid_configuration(format!("Failed to parse config JSON: {e}"))
        })
    }

    /// Load configuration from environment variables
    /// This is the ONLY method that should access environment variables
    ///
    /// Reads `OCR_API_KEY`, `OCR_ENABLE_LLM`, `OCR_LLM_MODEL`,
    /// `OCR_LLM_REQUEST_PATH`, `OCR_LLM_CUSTOM_PROMPT`, `OCR_LLM_API_KEY` and
    /// `OCR_ENDPOINT`.
    ///
    /// # Errors
    ///
    /// Returns [`RecognizeError::MissingCredential`] if `OCR_API_KEY` is unset.
    pub fn from_env() -> RecognizeResult<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let config = Self {
            api_key: var("OCR_API_KEY").unwrap_or_default(),
            enable_llm: LlmToggle::parse(var("OCR_ENABLE_LLM").as_deref()),
            llm_model: var("OCR_LLM_MODEL"),
            request_path: var("OCR_LLM_REQUEST_PATH"),
            custom_prompt: var("OCR_LLM_CUSTOM_PROMPT"),
            llm_api_key: var("OCR_LLM_API_KEY"),
            ocr_endpoint: var("OCR_ENDPOINT"),
        };

        config.validate()?;

        log_debug!(
            enable_llm = ?config.enable_llm,
            has_llm_model = config.llm_model.is_some(),
            has_request_path = config.request_path.is_some(),
            has_llm_api_key = config.llm_api_key.is_some(),
            "Recognize configuration loaded from environment"
        );

        Ok(config)
    }
}

impl PluginConfig for RecognizeConfig {
    fn api_key(&self) -> Option<&str> {
        non_empty(Some(self.api_key.as_str()))
    }

    fn enable_llm(&self) -> LlmToggle {
        self.enable_llm
    }

    fn llm_model(&self) -> Option<&str> {
        non_empty(self.llm_model.as_deref())
    }

    fn request_path(&self) -> Option<&str> {
        non_empty(self.request_path.as_deref())
    }

    fn custom_prompt(&self) -> Option<&str> {
        non_empty(self.custom_prompt.as_deref())
    }

    fn llm_api_key(&self) -> Option<&str> {
        non_empty(self.llm_api_key.as_deref())
    }

    fn ocr_endpoint(&self) -> Option<&str> {
        non_empty(self.ocr_endpoint.as_deref())
    }
}

impl PluginConfig for HashMap<String, String> {
    fn api_key(&self) -> Option<&str> {
        non_empty(self.get("apiKey").map(String::as_str))
    }

    fn enable_llm(&self) -> LlmToggle {
        LlmToggle::parse(self.get("enableLLM").map(String::as_str))
    }

    fn llm_model(&self) -> Option<&str> {
        non_empty(self.get("llmModel").map(String::as_str))
    }

    fn request_path(&self) -> Option<&str> {
        non_empty(self.get("requestPath").map(String::as_str))
    }

    fn custom_prompt(&self) -> Option<&str> {
        non_empty(self.get("customPrompt").map(String::as_str))
    }

    fn llm_api_key(&self) -> Option<&str> {
        non_empty(self.get("llmApiKey").map(String::as_str))
    }

    fn ocr_endpoint(&self) -> Option<&str> {
        non_empty(self.get("ocrEndpoint").map(String::as_str))
    }
}

/// Settings for the bundled HTTP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportSettings {
    /// Upper bound for a single request, including reading the body
    pub request_timeout: Duration,
    /// Upper bound for establishing the connection
    pub connect_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
        }
    }
}
