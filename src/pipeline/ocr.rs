//! Scanned extraction: rasterise with pdftoppm, recognise with tesseract.
//!
//! Page images are written to a [`TempDir`] that lives only as long as the
//! OCR run; it is removed on return, including on error. Pages are
//! recognised one at a time, in page order.
//!
//! A page that tesseract cannot read does not sink the document: it becomes
//! a [`PageError`] plus a visible placeholder line, so the reader can see
//! where text is missing. Only a missing tesseract binary, or every page
//! failing, aborts the run.

use crate::config::{ExtractionConfig, Tool};
use crate::error::{PageError, Pdf2TxtError};
use crate::output::PageResult;
use crate::pipeline::tools;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// File-name stem given to pdftoppm; it appends `-<page>.png`.
const IMAGE_PREFIX: &str = "page";

/// OCR every page of `pdf_path`.
///
/// # Returns
/// One [`PageResult`] per rendered page, in page order. Failed pages carry a
/// placeholder text and `error: Some(..)`.
pub async fn extract_with_ocr(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<Vec<PageResult>, Pdf2TxtError> {
    info!("Using OCR at {} DPI (image-based PDF)", config.dpi);

    let temp_dir = tempfile::Builder::new()
        .prefix("pdf2txt-")
        .tempdir()
        .map_err(|e| Pdf2TxtError::Internal(format!("Failed to create temp dir: {e}")))?;

    let images = render_pages(pdf_path, &temp_dir, config).await?;
    if images.is_empty() {
        return Err(Pdf2TxtError::NoPagesRendered {
            path: pdf_path.to_path_buf(),
        });
    }

    let total = images.len();
    info!("Processing {} pages...", total);
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total);
    }

    let mut pages = Vec::with_capacity(total);
    for (page_num, image) in images {
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total);
        }
        let start = Instant::now();
        let result = recognise_page(&image, config).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                debug!("OCR page {}/{}: {} bytes", page_num, total, text.len());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(page_num, total, text.len());
                }
                pages.push(PageResult {
                    page_num,
                    text,
                    error: None,
                    duration_ms,
                });
            }
            Err(e @ Pdf2TxtError::ToolMissing { .. }) => return Err(e),
            Err(e) => {
                let error = page_error(page_num, e);
                warn!("{}", error);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total, &error.to_string());
                }
                pages.push(PageResult {
                    page_num,
                    text: placeholder(page_num),
                    error: Some(error),
                    duration_ms,
                });
            }
        }
    }

    let success = pages.iter().filter(|p| p.error.is_none()).count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(total, success);
    }

    if success == 0 {
        let first_error = pages
            .iter()
            .find_map(|p| p.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(Pdf2TxtError::AllPagesFailed { total, first_error });
    }

    Ok(pages)
}

/// Join per-page texts with a blank line between pages.
pub fn join_pages(pages: &[PageResult]) -> String {
    pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Text standing in for a page whose OCR failed.
pub fn placeholder(page_num: usize) -> String {
    format!("[OCR ERROR on page {page_num}]")
}

/// Rasterise all pages into `dir`, returning `(page_num, image)` in page order.
async fn render_pages(
    pdf_path: &Path,
    dir: &TempDir,
    config: &ExtractionConfig,
) -> Result<Vec<(usize, PathBuf)>, Pdf2TxtError> {
    let start = Instant::now();
    let args: Vec<OsString> = vec![
        "-r".into(),
        config.dpi.to_string().into(),
        "-png".into(),
        pdf_path.as_os_str().to_os_string(),
        dir.path().join(IMAGE_PREFIX).into_os_string(),
    ];
    tools::run_tool(
        Tool::PdfToPpm,
        &config.tools.pdftoppm,
        args,
        config.render_timeout,
    )
    .await?;

    let images = collect_page_images(dir.path())?;
    debug!(
        "Rendered {} page images in {}ms",
        images.len(),
        start.elapsed().as_millis()
    );
    Ok(images)
}

/// Run tesseract on one page image, returning the recognised text.
async fn recognise_page(image: &Path, config: &ExtractionConfig) -> Result<String, Pdf2TxtError> {
    let args: Vec<OsString> = vec![
        image.as_os_str().to_os_string(),
        "stdout".into(),
        "-l".into(),
        config.ocr_language.clone().into(),
        "--oem".into(),
        config.ocr_oem.to_string().into(),
        "--psm".into(),
        config.ocr_psm.to_string().into(),
        "--dpi".into(),
        config.dpi.to_string().into(),
    ];
    tools::run_tool(
        Tool::Tesseract,
        &config.tools.tesseract,
        args,
        config.ocr_page_timeout,
    )
    .await
}

fn page_error(page: usize, err: Pdf2TxtError) -> PageError {
    match err {
        Pdf2TxtError::ToolTimeout { timeout, .. } => PageError::Timeout {
            page,
            secs: timeout.as_secs(),
        },
        other => PageError::OcrFailed {
            page,
            detail: other.to_string(),
        },
    }
}

/// List the PNGs pdftoppm wrote into `dir`, ordered by page number.
fn collect_page_images(dir: &Path) -> Result<Vec<(usize, PathBuf)>, Pdf2TxtError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Pdf2TxtError::Internal(format!("Failed to list rendered pages: {e}")))?;

    let mut images: Vec<(usize, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .filter_map(|path| {
            let page = path.file_stem()?.to_str().and_then(page_number)?;
            Some((page, path))
        })
        .collect();

    images.sort_by_key(|(page, _)| *page);
    Ok(images)
}

/// Page number from a pdftoppm file stem such as `page-07` or `page-113`.
fn page_number(stem: &str) -> Option<usize> {
    let (prefix, digits) = stem.rsplit_once('-')?;
    if prefix != IMAGE_PREFIX {
        return None;
    }
    digits.parse().ok()
}
