//! CLI binary for edgequake-pdf2txt.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2txt::{
    default_output_path, extract_to_file, Detection, ExtractionConfig, ExtractionMode,
    ExtractionProgressCallback, ExtractionStats, ModeSelection, PageResult, ProgressCallback,
    ToolPaths,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while the PDF is inspected and
/// rendered, then a per-page bar during OCR.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Inspecting PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("OCR");
        self.bar.reset_eta();
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_mode_selected(&self, mode: ExtractionMode, detected: bool) {
        let how = if detected { "Detected" } else { "Forced" };
        self.bar
            .println(format!("{} {}: {} PDF", cyan("◆"), how, bold(&mode.to_string())));
        match mode {
            ExtractionMode::Digital => self.bar.set_message("Running pdftotext…"),
            ExtractionMode::Scanned => self.bar.set_message("Rendering pages…"),
        }
    }

    fn on_extraction_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        let failed = total_pages.saturating_sub(success_count);
        self.bar.finish_and_clear();
        if failed > 0 {
            eprintln!(
                "{} {}/{} pages recognised  ({} failed)",
                cyan("⚠"),
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Auto-detect text layer vs. scan, write document.txt
  pdf2txt document.pdf

  # Explicit output file
  pdf2txt document.pdf output.txt

  # Scanned book, lower DPI for speed
  pdf2txt book.pdf --dpi 300 --force-ocr

  # Remove running headers as well
  pdf2txt article.pdf --headers "RUNNING HEADER" "AUTHOR NAME"

  # Raw extraction without cleaning, JSON report on stdout
  pdf2txt article.pdf --no-clean --json

REMOVED BY DEFAULT (whole lines, case-insensitive):
  page numbers      12 · Page 5 · Page 3 of 20
  copyright         Copyright © 2019 … · © 2021 …
  access stamps     Access provided by …
  DOI lines         DOI: 10.1353/… · https://doi.org/10.…
  repository URLs   http://muse.jhu.edu/… · https://www.jstor.org/…
  publisher lines   Published by … Press

ENVIRONMENT VARIABLES:
  PDF2TXT_PDFTOTEXT   pdftotext executable (default: pdftotext on PATH)
  PDF2TXT_PDFTOPPM    pdftoppm executable  (default: pdftoppm on PATH)
  PDF2TXT_TESSERACT   tesseract executable (default: tesseract on PATH)
  RUST_LOG            Log filter, e.g. RUST_LOG=edgequake_pdf2txt=debug

SETUP:
  sudo apt install poppler-utils tesseract-ocr
"#;

/// Extract text from PDF files (handles both text and scanned PDFs).
#[derive(Parser, Debug)]
#[command(
    name = "pdf2txt",
    version,
    about = "Extract text from PDF files (handles both text and scanned PDFs)",
    long_about = "Extract plain text from PDF documents. Digital PDFs are read with pdftotext; \
scanned PDFs are rasterised with pdftoppm and recognised with tesseract. Common academic \
headers and footers are removed from the result.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file.
    input: PathBuf,

    /// Output text file (default: input with a .txt extension).
    output: Option<PathBuf>,

    /// OCR rasterisation DPI (72–1200).
    #[arg(long, env = "PDF2TXT_DPI", default_value_t = 400,
          value_parser = clap::value_parser!(u32).range(72..=1200))]
    dpi: u32,

    /// Force OCR even if text is extractable.
    #[arg(long, conflicts_with = "force_text")]
    force_ocr: bool,

    /// Force pdftotext even if the PDF appears scanned.
    #[arg(long)]
    force_text: bool,

    /// Additional header patterns to remove (regex, matched at line start).
    #[arg(long, num_args = 0.., value_name = "REGEX")]
    headers: Vec<String>,

    /// Skip header/footer cleaning.
    #[arg(long, env = "PDF2TXT_NO_CLEAN")]
    no_clean: bool,

    /// Tesseract language(s), e.g. eng or eng+deu.
    #[arg(long, env = "PDF2TXT_LANG", default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode (4 = single column).
    #[arg(long, env = "PDF2TXT_PSM", default_value_t = 4,
          value_parser = clap::value_parser!(u8).range(0..=13))]
    psm: u8,

    /// Tesseract OCR engine mode.
    #[arg(long, env = "PDF2TXT_OEM", default_value_t = 3,
          value_parser = clap::value_parser!(u8).range(0..=3))]
    oem: u8,

    /// Leading pages sampled to detect a text layer.
    #[arg(long, env = "PDF2TXT_SAMPLE_PAGES", default_value_t = 2,
          value_parser = clap::value_parser!(u64).range(1..))]
    sample_pages: u64,

    /// Characters the sample must exceed to count as a text-based PDF.
    #[arg(long, env = "PDF2TXT_MIN_CHARS", default_value_t = 200)]
    min_chars: usize,

    /// pdftotext executable.
    #[arg(long, env = "PDF2TXT_PDFTOTEXT", default_value = "pdftotext", hide = true)]
    pdftotext: PathBuf,

    /// pdftoppm executable.
    #[arg(long, env = "PDF2TXT_PDFTOPPM", default_value = "pdftoppm", hide = true)]
    pdftoppm: PathBuf,

    /// tesseract executable.
    #[arg(long, env = "PDF2TXT_TESSERACT", default_value = "tesseract", hide = true)]
    tesseract: PathBuf,

    /// Per-page OCR timeout in seconds.
    #[arg(long, env = "PDF2TXT_OCR_TIMEOUT", default_value_t = 120)]
    ocr_timeout: u64,

    /// Print a JSON report on stdout instead of the text summary.
    #[arg(long, env = "PDF2TXT_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TXT_QUIET")]
    quiet: bool,
}

impl Cli {
    fn mode(&self) -> ModeSelection {
        if self.force_ocr {
            ModeSelection::ForceOcr
        } else if self.force_text {
            ModeSelection::ForceText
        } else {
            ModeSelection::Auto
        }
    }
}

/// What `--json` prints.
#[derive(Serialize)]
struct Report<'a> {
    input: &'a PathBuf,
    output: &'a PathBuf,
    mode: ExtractionMode,
    detection: Option<&'a Detection>,
    stats: &'a ExtractionStats,
    failed_pages: Vec<&'a PageResult>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    if !cli.quiet && !cli.json {
        eprintln!("Input:  {}", cli.input.display());
        eprintln!("Output: {}", output_path.display());
    }

    let progress = show_progress.then(CliProgressCallback::new);
    let config = build_config(
        &cli,
        progress
            .clone()
            .map(|cb| cb as Arc<dyn ExtractionProgressCallback>),
    )?;

    // ── Run extraction ───────────────────────────────────────────────────
    let result = extract_to_file(&cli.input, &output_path, &config).await;
    if let Some(ref cb) = progress {
        cb.finish();
    }
    let output = result.context("Extraction failed")?;

    if cli.json {
        let report = Report {
            input: &cli.input,
            output: &output_path,
            mode: output.mode,
            detection: output.detection.as_ref(),
            stats: &output.stats,
            failed_pages: output.pages.iter().filter(|p| p.error.is_some()).collect(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        // The progress callback already announced the mode.
        if progress.is_none() {
            let how = if output.detection.is_some() {
                "Detected"
            } else {
                "Forced"
            };
            eprintln!("{} {}: {} PDF", cyan("◆"), how, bold(&output.mode.to_string()));
        }
        let stats = &output.stats;
        eprintln!(
            "{}  Complete: {} lines, {} words  {}",
            if stats.ocr_failed_pages == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.lines,
            stats.words,
            dim(&format!(
                "({} boilerplate lines removed, {}ms)",
                stats.removed_lines, stats.total_duration_ms
            )),
        );
        eprintln!("   Saved to: {}", bold(&output_path.display().to_string()));
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .mode(cli.mode())
        .dpi(cli.dpi)
        .ocr_language(cli.lang.clone())
        .ocr_psm(cli.psm)
        .ocr_oem(cli.oem)
        .sample_pages(cli.sample_pages as usize)
        .min_text_chars(cli.min_chars)
        .clean(!cli.no_clean)
        .extra_patterns(cli.headers.iter().cloned())
        .ocr_page_timeout(Duration::from_secs(cli.ocr_timeout))
        .tools(ToolPaths {
            pdftotext: cli.pdftotext.clone(),
            pdftoppm: cli.pdftoppm.clone(),
            tesseract: cli.tesseract.clone(),
        });

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn force_flags_conflict() {
        let err = Cli::try_parse_from(["pdf2txt", "a.pdf", "--force-ocr", "--force-text"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn force_flags_map_to_mode() {
        let cli = Cli::try_parse_from(["pdf2txt", "a.pdf", "--force-ocr"]).unwrap();
        assert_eq!(cli.mode(), ModeSelection::ForceOcr);
        let cli = Cli::try_parse_from(["pdf2txt", "a.pdf", "--force-text"]).unwrap();
        assert_eq!(cli.mode(), ModeSelection::ForceText);
        let cli = Cli::try_parse_from(["pdf2txt", "a.pdf"]).unwrap();
        assert_eq!(cli.mode(), ModeSelection::Auto);
    }

    #[test]
    fn positional_output_and_headers() {
        let cli = Cli::try_parse_from([
            "pdf2txt",
            "a.pdf",
            "out.txt",
            "--headers",
            "RUNNING HEADER",
            "AUTHOR NAME",
            "--no-clean",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.headers, vec!["RUNNING HEADER", "AUTHOR NAME"]);
        assert!(cli.no_clean);

        let config = build_config(&cli, None).unwrap();
        assert!(!config.clean);
        assert_eq!(config.extra_patterns, vec!["RUNNING HEADER", "AUTHOR NAME"]);
    }

    #[test]
    fn dpi_range_is_enforced() {
        assert!(Cli::try_parse_from(["pdf2txt", "a.pdf", "--dpi", "40"]).is_err());
        let cli = Cli::try_parse_from(["pdf2txt", "a.pdf", "--dpi", "300"]).unwrap();
        assert_eq!(build_config(&cli, None).unwrap().dpi, 300);
    }
}
