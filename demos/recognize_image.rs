//! Recognize the text in an image file, optionally post-processed by an LLM.
//!
//! This example shows how to:
//! - Load configuration from `OCR_*` environment variables
//! - Base64-encode an image the way hosts pass it in
//! - Run recognition and inspect what happened
//!
//! # Running
//!
//! ```bash
//! export OCR_API_KEY="..."            # Mistral key, required
//! export OCR_ENABLE_LLM="true"        # optional
//! export OCR_LLM_MODEL="gpt-4o"       # optional
//! export OCR_LLM_API_KEY="sk-..."     # optional, falls back to OCR_API_KEY
//! export RUST_LOG="ocr_llm=debug"     # optional
//! cargo run --example recognize_image -- screenshot.png fr
//! ```

use anyhow::Context;
use base64::Engine;
use ocr_llm::{recognize_detailed, RecognizeConfig, ReqwestTransport};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let image_path = args
        .next()
        .context("usage: recognize_image <image.png> [target-language]")?;
    let target_language = args.next().unwrap_or_else(|| "en".to_string());

    let bytes = std::fs::read(&image_path).with_context(|| format!("reading {image_path}"))?;
    let image_base64 = base64::engine::general_purpose::STANDARD.encode(bytes);

    let config = RecognizeConfig::from_env()?;
    let transport = ReqwestTransport::new()?;

    println!("Recognizing {image_path}...");

    let outcome = recognize_detailed(&image_base64, &target_language, &config, &transport).await?;

    if let Some(error) = &outcome.llm_error {
        eprintln!("Post-processing failed: {}", error.user_message());
    } else if outcome.is_post_processed() {
        println!("(post-processed, {} chars of raw OCR text)", outcome.ocr_text.len());
    }

    println!("\n{}", outcome.text);
    Ok(())
}
