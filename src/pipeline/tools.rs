//! Running the external engines.
//!
//! Every tool invocation goes through [`run_tool`], which maps the three ways
//! a child process can go wrong onto [`Pdf2TxtError`] variants:
//!
//! * the executable cannot be spawned → [`Pdf2TxtError::ToolMissing`]
//! * it runs past its time limit → [`Pdf2TxtError::ToolTimeout`] (the child
//!   is killed when the pending future is dropped)
//! * it exits unsuccessfully → [`Pdf2TxtError::ToolFailed`] with its stderr

use crate::config::{Tool, ToolPaths};
use crate::error::Pdf2TxtError;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Upper bound on stderr carried inside an error message.
const MAX_STDERR_CHARS: usize = 500;

/// How long a `--version` probe may take.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Run `program` with `args`, returning its stdout decoded as (lossy) UTF-8.
pub async fn run_tool<I, S>(
    tool: Tool,
    program: &Path,
    args: I,
    limit: Duration,
) -> Result<String, Pdf2TxtError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let name = program.display().to_string();
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    debug!("Running {:?}", cmd.as_std());

    let output = match tokio::time::timeout(limit, cmd.output()).await {
        Err(_) => {
            warn!("{} exceeded its {}s limit; killed", name, limit.as_secs());
            return Err(Pdf2TxtError::ToolTimeout {
                tool: name,
                timeout: limit,
            });
        }
        Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
            return Err(Pdf2TxtError::ToolMissing {
                tool: name,
                hint: install_hint(&[tool]),
            });
        }
        Ok(Err(e)) => {
            return Err(Pdf2TxtError::ToolFailed {
                tool: name,
                status: "failed to start".to_string(),
                stderr: e.to_string(),
            });
        }
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        return Err(Pdf2TxtError::ToolFailed {
            tool: name,
            status: output.status.to_string(),
            stderr: summarise_stderr(&output.stderr),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Whether `program` can be spawned at all.
///
/// The exit status is ignored: older poppler builds exit non-zero from `-v`.
pub async fn is_available(tool: Tool, program: &Path) -> bool {
    let mut cmd = Command::new(program);
    cmd.arg(tool.version_arg())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    match tokio::time::timeout(PROBE_TIMEOUT, cmd.status()).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            debug!("{} not available: {}", program.display(), e);
            false
        }
        // It started, so it exists.
        Err(_) => true,
    }
}

/// Check that every tool in `tools` can be spawned, reporting all missing
/// ones together.
pub async fn ensure_available(tools: &[Tool], paths: &ToolPaths) -> Result<(), Pdf2TxtError> {
    let mut missing = Vec::new();
    for &tool in tools {
        if !is_available(tool, paths.program(tool)).await {
            missing.push(tool);
        }
    }
    if missing.is_empty() {
        return Ok(());
    }

    Err(Pdf2TxtError::MissingTools {
        tools: missing
            .iter()
            .map(|t| format!("{} ({})", paths.program(*t).display(), t.package()))
            .collect(),
        hint: install_hint(&missing),
    })
}

/// `apt` command line installing the packages that provide `tools`.
pub fn install_hint(tools: &[Tool]) -> String {
    let mut packages: Vec<&str> = Vec::new();
    for tool in tools {
        if !packages.contains(&tool.package()) {
            packages.push(tool.package());
        }
    }
    format!("sudo apt install {}", packages.join(" "))
}

fn summarise_stderr(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.chars().count() > MAX_STDERR_CHARS {
        let cut: String = text.chars().take(MAX_STDERR_CHARS).collect();
        format!("{cut}\u{2026}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn install_hint_deduplicates_packages() {
        assert_eq!(
            install_hint(&[Tool::PdfToText, Tool::Tesseract, Tool::PdfToPpm]),
            "sudo apt install poppler-utils tesseract-ocr"
        );
    }

    #[test]
    fn long_stderr_is_truncated() {
        let long = "x".repeat(2000);
        let s = summarise_stderr(long.as_bytes());
        assert_eq!(s.chars().count(), MAX_STDERR_CHARS + 1);
        assert!(s.ends_with('\u{2026}'));
    }

    #[tokio::test]
    async fn nonexistent_program_is_tool_missing() {
        let program = PathBuf::from("pdf2txt-no-such-binary-7f3a");
        let err = run_tool(Tool::Tesseract, &program, ["--version"], Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            Pdf2TxtError::ToolMissing { tool, hint } => {
                assert_eq!(tool, "pdf2txt-no-such-binary-7f3a");
                assert!(hint.contains("tesseract-ocr"));
            }
            other => panic!("expected ToolMissing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ensure_available_lists_missing_tools() {
        let paths = ToolPaths {
            pdftotext: PathBuf::from("pdf2txt-missing-a"),
            pdftoppm: PathBuf::from("pdf2txt-missing-b"),
            tesseract: PathBuf::from("pdf2txt-missing-c"),
        };
        let err = ensure_available(&[Tool::PdfToPpm, Tool::Tesseract], &paths)
            .await
            .unwrap_err();
        match err {
            Pdf2TxtError::MissingTools { tools, hint } => {
                assert_eq!(tools.len(), 2);
                assert!(tools[0].contains("pdf2txt-missing-b"));
                assert_eq!(hint, "sudo apt install poppler-utils tesseract-ocr");
            }
            other => panic!("expected MissingTools, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdout_is_returned_on_success() {
        let out = run_tool(
            Tool::PdfToText,
            Path::new("sh"),
            ["-c", "printf 'hello\\nworld'"],
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(out, "hello\nworld");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_tool_failed_with_stderr() {
        let err = run_tool(
            Tool::PdfToText,
            Path::new("sh"),
            ["-c", "echo 'Syntax Error: broken xref' >&2; exit 3"],
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        match err {
            Pdf2TxtError::ToolFailed { stderr, .. } => {
                assert_eq!(stderr, "Syntax Error: broken xref");
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_tool_times_out() {
        let err = run_tool(
            Tool::Tesseract,
            Path::new("sh"),
            ["-c", "sleep 5"],
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Pdf2TxtError::ToolTimeout { .. }), "got: {err:?}");
    }
}
