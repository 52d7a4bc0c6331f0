//! Digital extraction: read the embedded text layer with pdftotext.
//!
//! `-layout` keeps columns and indentation roughly where they sit on the
//! page, which the line cleaner relies on: running headers and page numbers
//! stay on lines of their own instead of being glued to body text.

use crate::config::{ExtractionConfig, Tool};
use crate::error::Pdf2TxtError;
use crate::pipeline::tools;
use std::ffi::OsString;
use std::path::Path;
use tracing::{info, warn};

/// Extract the full text layer of `pdf_path`.
pub async fn extract_text_layer(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<String, Pdf2TxtError> {
    info!("Using pdftotext (text-based PDF)");
    let args: Vec<OsString> = vec![
        "-layout".into(),
        "-enc".into(),
        "UTF-8".into(),
        pdf_path.as_os_str().to_os_string(),
        "-".into(),
    ];

    let text = tools::run_tool(
        Tool::PdfToText,
        &config.tools.pdftotext,
        args,
        config.text_timeout,
    )
    .await?;

    if text.trim().is_empty() {
        warn!(
            "pdftotext returned no text for {}; try --force-ocr",
            pdf_path.display()
        );
    }
    Ok(text)
}
