//! # edgequake-pdf2txt
//!
//! Extract plain text from PDF documents, digital or scanned, and strip the
//! academic boilerplate (page numbers, copyright notices, DOIs, …) that
//! journal PDFs repeat on every page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate path and %PDF signature
//!  ├─ 2. Detect   sample the text layer of the first pages → digital | scanned
//!  ├─ 3. Extract  digital: pdftotext -layout
//!  │              scanned: pdftoppm @ DPI → tesseract, page by page
//!  ├─ 4. Clean    drop boilerplate lines, tidy blank lines
//!  └─ 5. Output   text + detection evidence + stats
//! ```
//!
//! The engines are external executables from poppler-utils and
//! tesseract-ocr:
//!
//! ```text
//! sudo apt install poppler-utils tesseract-ocr
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2txt::{extract, ExtractionConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("article.pdf", &config).await?;
//!     println!("{}", output.text);
//!     eprintln!("{} lines, {} words ({} boilerplate lines removed)",
//!         output.stats.lines, output.stats.words, output.stats.removed_lines);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2txt` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

#[cfg(test)]
mod testing;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ExtractionConfig, ExtractionConfigBuilder, ExtractionMode, ModeSelection, Tool, ToolPaths,
};
pub use error::{ErrorKind, PageError, Pdf2TxtError};
pub use extract::{default_output_path, detect, extract, extract_sync, extract_to_file};
pub use output::{Detection, ExtractionOutput, ExtractionStats, PageResult};
pub use pipeline::clean::{tidy_whitespace, Cleaned, Cleaner, RuleCategory};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
