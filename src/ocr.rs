//! Mistral OCR invocation
//!
//! Sends one base64 image to the OCR endpoint and joins the markdown of every
//! returned page. Every failure here is fatal for the recognition call.

use crate::error::{RecognizeError, RecognizeResult};
use crate::logging::{log_debug, log_info};
use crate::transport::{render_body, HttpRequest, Transport};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OCR model requested from the vendor
pub const OCR_MODEL: &str = "mistral-ocr-latest";

/// Separator placed between the text of consecutive pages
pub const PAGE_SEPARATOR: &str = "\n\n";

/// OCR request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrRequest {
    pub model: String,
    pub document: OcrDocument,
}

/// Document reference inside an OCR request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrDocument {
    #[serde(rename = "type")]
    pub document_type: String, // "image_url"
    pub image_url: String,
}

impl OcrRequest {
    /// Wrap base64 PNG data in a data URL document
    pub fn for_image(image_base64: &str) -> Self {
        Self {
            model: OCR_MODEL.to_string(),
            document: OcrDocument {
                document_type: "image_url".to_string(),
                image_url: format!("data:image/png;base64,{image_base64}"),
            },
        }
    }
}

/// Join the markdown of every page that has some, in order.
///
/// Pages that are not objects, lack `markdown`, or carry an empty or
/// non-string value are skipped.
pub fn concatenate_pages(pages: &[Value]) -> String {
    pages
        .iter()
        .filter_map(|page| page.get("markdown").and_then(Value::as_str))
        .filter(|markdown| !markdown.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Pull the page text out of a decoded OCR response.
///
/// # Errors
///
/// - [`RecognizeError::MalformedResponse`] if the body is empty or has no
///   non-empty `pages` array
/// - [`RecognizeError::NoTextExtracted`] if no page carries any text
pub fn extract_ocr_text(data: &Value) -> RecognizeResult<String> {
    if data.is_null() {
        return Err(RecognizeError::malformed_response(
            "Empty response from Mistral API",
            String::new(),
        ));
    }

    let pages = match data.get("pages").and_then(Value::as_array) {
        Some(pages) if !pages.is_empty() => pages,
        _ => {
            let body = render_body(data);
            return Err(RecognizeError::malformed_response(
                format!("No pages in response: {body}"),
                body,
            ));
        }
    };

    let text = concatenate_pages(pages);
    if text.is_empty() {
        return Err(RecognizeError::no_text_extracted(
            "No text content found in OCR results",
            Some(render_body(data)),
        ));
    }

    log_debug!(
        page_count = pages.len(),
        text_length = text.len(),
        "Extracted OCR text"
    );

    Ok(text)
}

/// Run OCR on a base64-encoded PNG.
///
/// # Errors
///
/// - [`RecognizeError::MissingCredential`] if `api_key` is empty
/// - [`RecognizeError::TransportFailure`] if the call fails or the status is
///   not 2xx
/// - any error from [`extract_ocr_text`]
pub async fn run_ocr<T>(
    transport: &T,
    image_base64: &str,
    api_key: &str,
    endpoint: &str,
) -> RecognizeResult<String>
where
    T: Transport + ?Sized,
{
    if api_key.is_empty() {
        return Err(RecognizeError::missing_credential("API Key not found"));
    }

    let body = serde_json::to_value(OcrRequest::for_image(image_base64)).map_err(|e| {
        RecognizeError::invalid_configuration(format!("Failed to encode OCR request: {e}"))
    })?;

    log_info!(
        endpoint = %endpoint,
        model = OCR_MODEL,
        image_length = image_base64.len(),
        "Sending OCR request"
    );

    let request = HttpRequest::post_json(endpoint, body).with_bearer_auth(api_key);
    let response = transport.send(request).await?;

    if !response.ok() {
        let body = response.body_text();
        return Err(RecognizeError::http_status(
            format!("Request failed with status {}: {}", response.status, body),
            response.status,
            body,
        ));
    }

    extract_ocr_text(&response.data)
}
