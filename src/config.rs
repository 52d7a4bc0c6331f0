//! Configuration types for PDF-to-text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The CLI maps its flags (and their
//! `PDF2TXT_*` environment variables) onto the builder one-to-one.

use crate::error::Pdf2TxtError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Lowest accepted OCR rasterisation resolution.
pub const MIN_DPI: u32 = 72;
/// Highest accepted OCR rasterisation resolution.
pub const MAX_DPI: u32 = 1200;

/// Configuration for a single extraction run.
///
/// # Example
/// ```rust
/// use edgequake_pdf2txt::{ExtractionConfig, ModeSelection};
///
/// let config = ExtractionConfig::builder()
///     .mode(ModeSelection::ForceOcr)
///     .dpi(300)
///     .extra_patterns(["^RUNNING HEADER$"])
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// How the extraction path is chosen. Default: [`ModeSelection::Auto`].
    pub mode: ModeSelection,

    /// OCR rasterisation DPI. Range: 72–1200. Default: 400.
    ///
    /// Academic scans with small footnote type need 300+ DPI for tesseract to
    /// read them reliably; 400 keeps superscripts legible.
    pub dpi: u32,

    /// Tesseract language(s), e.g. `eng` or `eng+deu`. Default: `eng`.
    pub ocr_language: String,

    /// Tesseract page segmentation mode. Default: 4 (single column of text).
    pub ocr_psm: u8,

    /// Tesseract OCR engine mode. Default: 3 (engine default).
    pub ocr_oem: u8,

    /// Number of leading pages sampled by the detector. Default: 2.
    pub sample_pages: usize,

    /// The sample must contain more than this many non-whitespace characters
    /// for the document to count as digital. Default: 200.
    pub min_text_chars: usize,

    /// Apply the line cleaner to the extracted text. Default: true.
    pub clean: bool,

    /// Additional removal patterns (regex), matched case-insensitively at the
    /// start of each trimmed line.
    pub extra_patterns: Vec<String>,

    /// Executables used for each external engine.
    pub tools: ToolPaths,

    /// Time limit for the detector's text sample. Default: 30 s.
    pub detect_timeout: Duration,

    /// Time limit for full-document text extraction. Default: 120 s.
    pub text_timeout: Duration,

    /// Time limit for rasterising the whole document. Default: 600 s.
    pub render_timeout: Duration,

    /// Time limit for OCR of one page. Default: 120 s.
    pub ocr_page_timeout: Duration,

    /// Optional receiver of per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ModeSelection::default(),
            dpi: 400,
            ocr_language: "eng".to_string(),
            ocr_psm: 4,
            ocr_oem: 3,
            sample_pages: 2,
            min_text_chars: 200,
            clean: true,
            extra_patterns: Vec::new(),
            tools: ToolPaths::default(),
            detect_timeout: Duration::from_secs(30),
            text_timeout: Duration::from_secs(120),
            render_timeout: Duration::from_secs(600),
            ocr_page_timeout: Duration::from_secs(120),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("mode", &self.mode)
            .field("dpi", &self.dpi)
            .field("ocr_language", &self.ocr_language)
            .field("ocr_psm", &self.ocr_psm)
            .field("ocr_oem", &self.ocr_oem)
            .field("sample_pages", &self.sample_pages)
            .field("min_text_chars", &self.min_text_chars)
            .field("clean", &self.clean)
            .field("extra_patterns", &self.extra_patterns)
            .field("tools", &self.tools)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn mode(mut self, mode: ModeSelection) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn ocr_psm(mut self, psm: u8) -> Self {
        self.config.ocr_psm = psm;
        self
    }

    pub fn ocr_oem(mut self, oem: u8) -> Self {
        self.config.ocr_oem = oem;
        self
    }

    pub fn sample_pages(mut self, n: usize) -> Self {
        self.config.sample_pages = n;
        self
    }

    pub fn min_text_chars(mut self, n: usize) -> Self {
        self.config.min_text_chars = n;
        self
    }

    pub fn clean(mut self, v: bool) -> Self {
        self.config.clean = v;
        self
    }

    pub fn extra_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .extra_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn tools(mut self, tools: ToolPaths) -> Self {
        self.config.tools = tools;
        self
    }

    pub fn detect_timeout(mut self, timeout: Duration) -> Self {
        self.config.detect_timeout = timeout;
        self
    }

    pub fn text_timeout(mut self, timeout: Duration) -> Self {
        self.config.text_timeout = timeout;
        self
    }

    pub fn render_timeout(mut self, timeout: Duration) -> Self {
        self.config.render_timeout = timeout;
        self
    }

    pub fn ocr_page_timeout(mut self, timeout: Duration) -> Self {
        self.config.ocr_page_timeout = timeout;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2TxtError> {
        let c = &self.config;
        if !(MIN_DPI..=MAX_DPI).contains(&c.dpi) {
            return Err(Pdf2TxtError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.sample_pages == 0 {
            return Err(Pdf2TxtError::InvalidConfig(
                "Detector sample must cover at least 1 page".into(),
            ));
        }
        if c.ocr_language.trim().is_empty() {
            return Err(Pdf2TxtError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if c.ocr_psm > 13 {
            return Err(Pdf2TxtError::InvalidConfig(format!(
                "Tesseract PSM must be 0–13, got {}",
                c.ocr_psm
            )));
        }
        if c.ocr_oem > 3 {
            return Err(Pdf2TxtError::InvalidConfig(format!(
                "Tesseract OEM must be 0–3, got {}",
                c.ocr_oem
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// The extraction path taken for a document. Decided once, before any
/// engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// The PDF carries a usable text layer; read it with pdftotext.
    Digital,
    /// The PDF is page images; rasterise and OCR.
    Scanned,
}

impl ExtractionMode {
    /// External tools this mode needs on the system.
    pub fn required_tools(self) -> &'static [Tool] {
        match self {
            ExtractionMode::Digital => &[Tool::PdfToText],
            ExtractionMode::Scanned => &[Tool::PdfToPpm, Tool::Tesseract],
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Digital => f.write_str("text-based"),
            ExtractionMode::Scanned => f.write_str("image-based (scanned)"),
        }
    }
}

/// How the [`ExtractionMode`] is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModeSelection {
    /// Sample the leading pages and decide (default).
    #[default]
    Auto,
    /// Always OCR, even when a text layer exists.
    ForceOcr,
    /// Always use the text layer, even when the PDF looks scanned.
    ForceText,
}

impl ModeSelection {
    /// The mode this selection pins, or `None` when detection must run.
    pub fn forced(self) -> Option<ExtractionMode> {
        match self {
            ModeSelection::Auto => None,
            ModeSelection::ForceOcr => Some(ExtractionMode::Scanned),
            ModeSelection::ForceText => Some(ExtractionMode::Digital),
        }
    }
}

/// The external executables this crate drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    PdfToText,
    PdfToPpm,
    Tesseract,
}

impl Tool {
    /// Executable name looked up on `PATH` by default.
    pub fn default_program(self) -> &'static str {
        match self {
            Tool::PdfToText => "pdftotext",
            Tool::PdfToPpm => "pdftoppm",
            Tool::Tesseract => "tesseract",
        }
    }

    /// Distribution package that ships the executable.
    pub fn package(self) -> &'static str {
        match self {
            Tool::PdfToText | Tool::PdfToPpm => "poppler-utils",
            Tool::Tesseract => "tesseract-ocr",
        }
    }

    /// Argument that makes the tool print its version and exit.
    pub fn version_arg(self) -> &'static str {
        match self {
            Tool::PdfToText | Tool::PdfToPpm => "-v",
            Tool::Tesseract => "--version",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_program())
    }
}

/// Paths (or bare names resolved via `PATH`) of the external executables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    pub pdftotext: PathBuf,
    pub pdftoppm: PathBuf,
    pub tesseract: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            pdftotext: PathBuf::from(Tool::PdfToText.default_program()),
            pdftoppm: PathBuf::from(Tool::PdfToPpm.default_program()),
            tesseract: PathBuf::from(Tool::Tesseract.default_program()),
        }
    }
}

impl ToolPaths {
    /// The configured program for `tool`.
    pub fn program(&self, tool: Tool) -> &PathBuf {
        match tool {
            Tool::PdfToText => &self.pdftotext,
            Tool::PdfToPpm => &self.pdftoppm,
            Tool::Tesseract => &self.tesseract,
        }
    }
}
