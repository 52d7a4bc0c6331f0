//! Progress-callback trait for extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to hear
//! which path was chosen and, on the OCR path, how each page went.
//!
//! The digital path runs a single pdftotext invocation and therefore only
//! reports [`ExtractionProgressCallback::on_mode_selected`]; per-page events
//! come from the OCR path.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2txt::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("OCR page {}/{} done ({} bytes)", page_num, total_pages, text_len);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::config::ExtractionMode;
use std::sync::Arc;

/// Called by the extraction pipeline as it advances.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events are delivered sequentially from the task
/// running the extraction.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once the extraction path is fixed.
    ///
    /// # Arguments
    /// * `mode`     — the chosen path
    /// * `detected` — `true` when the detector decided, `false` when forced
    fn on_mode_selected(&self, mode: ExtractionMode, detected: bool) {
        let _ = (mode, detected);
    }

    /// Called once the page images are rendered, before the first OCR call.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page image is handed to the OCR engine.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages rendered for OCR
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page is recognised successfully.
    ///
    /// `text_len` is the byte length of the recognised text.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called when OCR fails for a page; the run continues.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after every page has been attempted.
    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TrackingCallback;

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_mode_selected(ExtractionMode::Digital, true);
        cb.on_extraction_start(5);
        cb.on_page_start(1, 5);
        cb.on_page_complete(1, 5, 42);
        cb.on_page_error(2, 5, "some error");
        cb.on_extraction_complete(5, 4);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_mode_selected(ExtractionMode::Scanned, false);
        assert_eq!(
            *tracker.mode.lock().unwrap(),
            Some((ExtractionMode::Scanned, false))
        );

        tracker.on_extraction_start(3);
        assert_eq!(TrackingCallback::count(&tracker.started_total), 3);

        tracker.on_page_start(1, 3);
        tracker.on_page_complete(1, 3, 100);
        tracker.on_page_start(2, 3);
        tracker.on_page_complete(2, 3, 200);
        tracker.on_page_start(3, 3);
        tracker.on_page_error(3, 3, "tesseract exited with status 1");

        assert_eq!(TrackingCallback::count(&tracker.starts), 3);
        assert_eq!(TrackingCallback::count(&tracker.completes), 2);
        assert_eq!(TrackingCallback::count(&tracker.errors), 1);

        tracker.on_extraction_complete(3, 2);
        assert_eq!(*tracker.finished.lock().unwrap(), Some((3, 2)));
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ExtractionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(10);
        cb.on_page_start(1, 10);
        cb.on_page_complete(1, 10, 512);
    }
}
