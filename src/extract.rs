//! Extraction entry points.
//!
//! [`extract`] runs the whole pipeline and returns the text in memory;
//! [`extract_to_file`] additionally writes it (atomically) to disk, which is
//! what the CLI uses. [`detect`] runs only the digital/scanned detector.

use crate::config::{ExtractionConfig, ExtractionMode};
use crate::error::Pdf2TxtError;
use crate::output::{Detection, ExtractionOutput, ExtractionStats};
use crate::pipeline::clean::{self, Cleaner};
use crate::pipeline::detect::detect_mode;
use crate::pipeline::{input, ocr, text, tools};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Extract the text of a PDF.
///
/// # Arguments
/// * `input`  — Path to a local PDF
/// * `config` — Extraction configuration
///
/// # Returns
/// `Ok(ExtractionOutput)` on success, even if some OCR pages failed
/// (check `output.stats.ocr_failed_pages`).
///
/// # Errors
/// * input errors — file missing, unreadable, not a PDF
/// * extraction errors — engine missing, crashing or timing out; every OCR
///   page failing
/// * config errors — an invalid removal pattern
pub async fn extract(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TxtError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    info!("Starting extraction: {}", input.display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input)?;
    let pdf_path = resolved.path();

    // ── Step 2: Compile removal rules before any tool runs ───────────────
    let cleaner = if config.clean {
        Some(Cleaner::with_patterns(&config.extra_patterns)?)
    } else {
        None
    };

    // ── Step 3: Fix the extraction mode ──────────────────────────────────
    let (mode, detection) = match config.mode.forced() {
        Some(mode) => {
            info!("Extraction mode forced: {}", mode);
            (mode, None)
        }
        None => {
            let detection = detect_mode(pdf_path, config).await?;
            (detection.mode, Some(detection))
        }
    };
    if let Some(ref cb) = config.progress_callback {
        cb.on_mode_selected(mode, detection.is_some());
    }

    // ── Step 4: Check the engines for that mode ──────────────────────────
    tools::ensure_available(mode.required_tools(), &config.tools).await?;

    // ── Step 5: Extract ──────────────────────────────────────────────────
    let extract_start = Instant::now();
    let (raw, pages) = match mode {
        ExtractionMode::Digital => {
            (text::extract_text_layer(pdf_path, config).await?, Vec::new())
        }
        ExtractionMode::Scanned => {
            let pages = ocr::extract_with_ocr(pdf_path, config).await?;
            (ocr::join_pages(&pages), pages)
        }
    };
    let extraction_duration_ms = extract_start.elapsed().as_millis() as u64;
    debug!("Raw text: {} bytes in {}ms", raw.len(), extraction_duration_ms);

    // ── Step 6: Clean ────────────────────────────────────────────────────
    let (text, removed_lines) = match cleaner {
        Some(cleaner) => {
            info!("Cleaning headers/footers...");
            let cleaned = cleaner.clean(&raw);
            (clean::tidy_whitespace(&cleaned.text), cleaned.removed)
        }
        None => (raw, 0),
    };

    // ── Step 7: Stats ────────────────────────────────────────────────────
    let stats = ExtractionStats {
        removed_lines,
        ocr_pages: pages.len(),
        ocr_failed_pages: pages.iter().filter(|p| p.error.is_some()).count(),
        extraction_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        ..ExtractionStats::measure(&text)
    };

    info!(
        "Extraction complete: {} lines, {} words, {} removed, {}ms total",
        stats.lines, stats.words, stats.removed_lines, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        text,
        mode,
        detection,
        pages,
        stats,
    })
}

/// Extract a PDF and write the text to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files. No file
/// other than `output_path` is replaced.
pub async fn extract_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TxtError> {
    let input = input.as_ref();
    let path = output_path.as_ref();
    check_output_path(input, path)?;

    let output = extract(input, config).await?;
    write_output(path, &output.text).await?;

    info!("Saved to: {}", path.display());
    Ok(output)
}

/// Write `text` to `path` via a uniquely named temp file in the same
/// directory, renamed into place. The temp file is removed on failure.
async fn write_output(path: &Path, text: &str) -> Result<(), Pdf2TxtError> {
    let write_err = |source: std::io::Error| Pdf2TxtError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    tokio::fs::create_dir_all(dir).await.map_err(write_err)?;

    let tmp = tempfile::Builder::new()
        .prefix(".pdf2txt-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    tokio::fs::write(tmp.path(), text).await.map_err(write_err)?;

    // Temp files are created owner-only; the result is an ordinary text file.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a single-threaded tokio runtime internally.
pub fn extract_sync(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TxtError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Pdf2TxtError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input, config))
}

/// Run only the digital/scanned detector.
///
/// Needs pdftotext but neither pdftoppm nor tesseract.
pub async fn detect(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<Detection, Pdf2TxtError> {
    let resolved = input::resolve_input(input)?;
    detect_mode(resolved.path(), config).await
}

/// The output path used when none is given: the input with a `.txt`
/// extension.
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    input.as_ref().with_extension("txt")
}

/// Refuse to overwrite the input PDF with its own text.
fn check_output_path(input: &Path, output: &Path) -> Result<(), Pdf2TxtError> {
    let same = input == output
        || matches!(
            (input.canonicalize(), output.canonicalize()),
            (Ok(a), Ok(b)) if a == b
        );
    if same {
        return Err(Pdf2TxtError::InvalidConfig(format!(
            "Output path '{}' is the input file",
            output.display()
        )));
    }
    Ok(())
}
