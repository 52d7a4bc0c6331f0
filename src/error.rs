//! Error types for the edgequake-pdf2txt library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2TxtError`] — **Fatal**: the extraction cannot proceed at all
//!   (missing input, not a PDF, external tool absent or crashing). Returned as
//!   `Err(Pdf2TxtError)` from the top-level `extract*` functions.
//!
//! * [`PageError`] — **Non-fatal**: OCR failed for a single page while the
//!   other pages are fine. Stored inside [`crate::output::PageResult`] and
//!   replaced by a placeholder line in the output text.
//!
//! Fatal errors are further grouped by [`ErrorKind`] so callers (and the CLI)
//! can tell a bad input apart from a broken toolchain without matching on
//! every variant.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`Pdf2TxtError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input file is missing, unreadable, or not a PDF.
    Input,
    /// An external engine failed or is not installed.
    Extraction,
    /// The result could not be written.
    Output,
    /// The caller supplied an invalid setting or pattern.
    Config,
}

/// All fatal errors returned by the edgequake-pdf2txt library.
#[derive(Debug, Error)]
pub enum Pdf2TxtError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The path exists but is a directory or other non-file entry.
    #[error("Input '{path}' is not a regular file")]
    NotAFile { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file could be opened but reading it failed.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists and was read, but carries no `%PDF` signature.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// A required executable could not be spawned.
    #[error("'{tool}' is not installed or not on PATH.\n{hint}")]
    ToolMissing { tool: String, hint: String },

    /// Several required executables are missing; reported together.
    #[error("Missing dependencies: {}\n\nInstall with:\n  {hint}", tools.join(", "))]
    MissingTools { tools: Vec<String>, hint: String },

    /// An external tool ran but exited unsuccessfully.
    #[error("'{tool}' failed ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// An external tool did not finish within its time limit and was killed.
    #[error("'{tool}' timed out after {}s", timeout.as_secs())]
    ToolTimeout { tool: String, timeout: Duration },

    /// Rasterisation produced no page images for OCR.
    #[error("No page images were rendered from '{path}'")]
    NoPagesRendered { path: PathBuf },

    /// OCR failed on every page; the output would be empty.
    #[error("OCR failed on all {total} pages.\nFirst error: {first_error}")]
    AllPagesFailed { total: usize, first_error: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A caller-supplied removal pattern is not a valid regex.
    #[error("Invalid removal pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2TxtError {
    /// Which broad category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. }
            | Self::NotAFile { .. }
            | Self::PermissionDenied { .. }
            | Self::ReadFailed { .. }
            | Self::NotAPdf { .. } => ErrorKind::Input,
            Self::ToolMissing { .. }
            | Self::MissingTools { .. }
            | Self::ToolFailed { .. }
            | Self::ToolTimeout { .. }
            | Self::NoPagesRendered { .. }
            | Self::AllPagesFailed { .. }
            | Self::Internal(_) => ErrorKind::Extraction,
            Self::OutputWriteFailed { .. } => ErrorKind::Output,
            Self::InvalidConfig(_) | Self::InvalidPattern { .. } => ErrorKind::Config,
        }
    }
}

/// A non-fatal error for a single OCR page.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The OCR engine exited with an error for this page.
    #[error("Page {page}: OCR failed: {detail}")]
    OcrFailed { page: usize, detail: String },

    /// The OCR engine did not finish in time.
    #[error("Page {page}: OCR timed out after {secs}s")]
    Timeout { page: usize, secs: u64 },
}

impl PageError {
    /// 1-indexed page number this error refers to.
    pub fn page(&self) -> usize {
        match self {
            PageError::OcrFailed { page, .. } | PageError::Timeout { page, .. } => *page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tools_display_lists_all() {
        let e = Pdf2TxtError::MissingTools {
            tools: vec!["tesseract-ocr".into(), "poppler-utils".into()],
            hint: "sudo apt install tesseract-ocr poppler-utils".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("tesseract-ocr, poppler-utils"), "got: {msg}");
        assert!(msg.contains("sudo apt install"));
    }

    #[test]
    fn tool_timeout_display() {
        let e = Pdf2TxtError::ToolTimeout {
            tool: "pdftotext".into(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(e.to_string(), "'pdftotext' timed out after 30s");
    }

    #[test]
    fn kinds_group_input_and_extraction() {
        let input = Pdf2TxtError::FileNotFound {
            path: PathBuf::from("a.pdf"),
        };
        assert_eq!(input.kind(), ErrorKind::Input);

        let failed = Pdf2TxtError::ToolFailed {
            tool: "tesseract".into(),
            status: "exit status: 1".into(),
            stderr: "boom".into(),
        };
        assert_eq!(failed.kind(), ErrorKind::Extraction);

        let pattern = Pdf2TxtError::InvalidPattern {
            pattern: "(".into(),
            reason: "unclosed group".into(),
        };
        assert_eq!(pattern.kind(), ErrorKind::Config);
    }

    #[test]
    fn page_error_reports_page() {
        let e = PageError::Timeout { page: 7, secs: 120 };
        assert_eq!(e.page(), 7);
        assert!(e.to_string().contains("Page 7"));
    }
}
