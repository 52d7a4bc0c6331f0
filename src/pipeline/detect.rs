//! Digital vs. scanned detection.
//!
//! The leading pages' text layer is pulled with pdftotext and measured. A
//! scanned document either has no text layer or a few stray characters
//! (a stamped page number, a watermark), so a plain character threshold
//! separates the two cases well.

use crate::config::{ExtractionConfig, ExtractionMode, Tool};
use crate::error::Pdf2TxtError;
use crate::output::Detection;
use crate::pipeline::tools;
use std::ffi::OsString;
use std::path::Path;
use tracing::{debug, info, warn};

/// Sample the first `config.sample_pages` pages of `pdf_path` and classify.
///
/// A missing pdftotext is an error. A pdftotext failure on the sample (broken
/// text layer, timeout) classifies the document as scanned.
pub async fn detect_mode(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<Detection, Pdf2TxtError> {
    let args: Vec<OsString> = vec![
        "-f".into(),
        "1".into(),
        "-l".into(),
        config.sample_pages.to_string().into(),
        "-enc".into(),
        "UTF-8".into(),
        pdf_path.as_os_str().to_os_string(),
        "-".into(),
    ];

    let sample = match tools::run_tool(
        Tool::PdfToText,
        &config.tools.pdftotext,
        args,
        config.detect_timeout,
    )
    .await
    {
        Ok(sample) => sample,
        Err(e @ (Pdf2TxtError::ToolMissing { .. } | Pdf2TxtError::MissingTools { .. })) => {
            return Err(e)
        }
        Err(e) => {
            warn!("Text-layer sample failed, treating as scanned: {}", e);
            String::new()
        }
    };

    let detection = classify(&sample, config.sample_pages, config.min_text_chars);
    info!(
        "Detected {} PDF ({} chars / {} words in first {} pages, threshold {})",
        detection.mode,
        detection.text_chars,
        detection.words,
        detection.sampled_pages,
        detection.threshold
    );
    Ok(detection)
}

/// Classify a text-layer sample: more than `threshold` non-whitespace
/// characters means digital.
pub fn classify(sample: &str, sampled_pages: usize, threshold: usize) -> Detection {
    let text_chars = sample.chars().filter(|c| !c.is_whitespace()).count();
    let words = sample.split_whitespace().count();
    let mode = if text_chars > threshold {
        ExtractionMode::Digital
    } else {
        ExtractionMode::Scanned
    };
    debug!("Sample: {} chars, {} words -> {:?}", text_chars, words, mode);

    Detection {
        mode,
        sampled_pages,
        text_chars,
        words,
        threshold,
    }
}
