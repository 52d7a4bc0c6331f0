//! Result types returned by the extraction entry points.

use crate::config::ExtractionMode;
use crate::error::PageError;
use serde::{Deserialize, Serialize};

/// The outcome of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Final (optionally cleaned) text.
    pub text: String,
    /// Path the text was produced by.
    pub mode: ExtractionMode,
    /// Detector evidence; `None` when the mode was forced.
    pub detection: Option<Detection>,
    /// Per-page OCR results. Empty on the digital path.
    pub pages: Vec<PageResult>,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// The text as a sequence of lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// The detector's verdict together with the evidence behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub mode: ExtractionMode,
    /// Number of leading pages requested from the text layer.
    pub sampled_pages: usize,
    /// Non-whitespace characters found in the sample.
    pub text_chars: usize,
    /// Whitespace-separated words found in the sample.
    pub words: usize,
    /// The sample had to contain more than this many characters.
    pub threshold: usize,
}

/// OCR outcome for a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Recognised text, or a placeholder when `error` is set.
    pub text: String,
    pub error: Option<PageError>,
    pub duration_ms: u64,
}

/// Counters describing the produced text and the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Newline count plus one.
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
    /// Lines dropped by the cleaner (0 when cleaning is disabled).
    pub removed_lines: usize,
    pub ocr_pages: usize,
    pub ocr_failed_pages: usize,
    pub extraction_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl ExtractionStats {
    /// Fill the text-derived counters from `text`.
    pub fn measure(text: &str) -> Self {
        Self {
            lines: text.matches('\n').count() + 1,
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
            ..Self::default()
        }
    }
}
