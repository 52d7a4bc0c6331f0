//! Input resolution: validate the user-supplied path before any tool runs.
//!
//! pdftotext and pdftoppm report a missing or non-PDF input with terse,
//! version-dependent messages. Checking up front gives every input problem a
//! precise [`Pdf2TxtError`] variant in the input category.

use crate::error::Pdf2TxtError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writers may put junk before the header; readers accept it within 1 KiB.
const SIGNATURE_WINDOW: u64 = 1024;

/// A validated local PDF.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    path: PathBuf,
}

impl ResolvedInput {
    /// Path to the PDF file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Validate that `path` names a readable file carrying a `%PDF` signature.
pub fn resolve_input(path: impl AsRef<Path>) -> Result<ResolvedInput, Pdf2TxtError> {
    let path = path.as_ref().to_path_buf();

    let meta = match std::fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(Pdf2TxtError::PermissionDenied { path });
        }
        Err(_) => return Err(Pdf2TxtError::FileNotFound { path }),
    };
    if !meta.is_file() {
        return Err(Pdf2TxtError::NotAFile { path });
    }

    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(Pdf2TxtError::PermissionDenied { path });
        }
        Err(_) => return Err(Pdf2TxtError::FileNotFound { path }),
    };

    let head = read_head(file, &path)?;

    if !has_pdf_signature(&head) {
        let mut magic = [0u8; 4];
        let n = head.len().min(4);
        magic[..n].copy_from_slice(&head[..n]);
        return Err(Pdf2TxtError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput {
        path: argv_safe(path),
    })
}

/// Read the signature window from the start of the file.
fn read_head(reader: impl Read, path: &Path) -> Result<Vec<u8>, Pdf2TxtError> {
    let mut head = Vec::with_capacity(SIGNATURE_WINDOW as usize);
    reader
        .take(SIGNATURE_WINDOW)
        .read_to_end(&mut head)
        .map_err(|source| Pdf2TxtError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(head)
}

/// Relative paths get a `./` prefix so a name like `-draft.pdf` reaches the
/// engines as a file, not an option.
fn argv_safe(path: PathBuf) -> PathBuf {
    if path.is_relative() {
        Path::new(".").join(path)
    } else {
        path
    }
}

fn has_pdf_signature(head: &[u8]) -> bool {
    head.windows(4).any(|w| w == b"%PDF")
}
