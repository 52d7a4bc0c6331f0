//! Pipeline stages for PDF-to-text extraction.
//!
//! Each submodule implements exactly one step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ detect ──▶ text | ocr ──▶ clean
//! (path)    (sample)   (engine)      (rules)
//! ```
//!
//! 1. [`input`]  — validate the user-supplied path
//! 2. [`detect`] — sample the text layer of the leading pages and decide
//!    digital vs. scanned
//! 3. [`text`]   — digital path: pdftotext `-layout`
//! 4. [`ocr`]    — scanned path: pdftoppm rasterisation + tesseract per page
//! 5. [`clean`]  — drop boilerplate lines, tidy blank lines
//!
//! [`tools`] runs the external executables for stages 2–4.

pub mod clean;
pub mod detect;
pub mod input;
pub mod ocr;
pub mod text;
pub mod tools;
