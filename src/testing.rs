//! Test doubles shared by the unit tests: stand-in engine scripts and a
//! progress callback that records what it was told.

use crate::config::ExtractionMode;
use crate::progress::ExtractionProgressCallback;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Records every progress event it receives.
#[derive(Default)]
pub(crate) struct TrackingCallback {
    pub mode: Mutex<Option<(ExtractionMode, bool)>>,
    pub started_total: AtomicUsize,
    pub starts: AtomicUsize,
    pub completes: AtomicUsize,
    pub errors: AtomicUsize,
    pub finished: Mutex<Option<(usize, usize)>>,
}

impl TrackingCallback {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl ExtractionProgressCallback for TrackingCallback {
    fn on_mode_selected(&self, mode: ExtractionMode, detected: bool) {
        *self.mode.lock().unwrap() = Some((mode, detected));
    }

    fn on_extraction_start(&self, total_pages: usize) {
        self.started_total.store(total_pages, Ordering::SeqCst);
    }

    fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _text_len: usize) {
        self.completes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_page_error(&self, _page_num: usize, _total_pages: usize, _error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }

    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        *self.finished.lock().unwrap() = Some((total_pages, success_count));
    }
}

/// A program name that is never on `PATH`.
pub(crate) fn missing_tool(name: &str) -> PathBuf {
    PathBuf::from(format!("pdf2txt-missing-{name}"))
}

/// Write an executable shell script.
#[cfg(unix)]
pub(crate) fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, body).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Fake pdftotext: prints `sample` for a `-f 1 -l N` detection call and
/// `layout` for a `-layout` extraction call. Version probes exit 0.
#[cfg(unix)]
pub(crate) fn fake_pdftotext(dir: &Path, sample: &str, layout: &str) -> PathBuf {
    let sample_file = dir.join("sample.out");
    let layout_file = dir.join("layout.out");
    std::fs::write(&sample_file, sample).unwrap();
    std::fs::write(&layout_file, layout).unwrap();

    let script = dir.join("fake-pdftotext");
    write_script(
        &script,
        &format!(
            "#!/bin/sh\ncase \"$1\" in\n  -f) cat '{}';;\n  -layout) cat '{}';;\nesac\n",
            sample_file.display(),
            layout_file.display()
        ),
    );
    script
}

/// Fake pdftoppm: writes `pages` empty PNGs under the output prefix (its
/// last argument).
#[cfg(unix)]
pub(crate) fn fake_pdftoppm(dir: &Path, pages: usize) -> PathBuf {
    let mut body = String::from("#!/bin/sh\n[ \"$1\" = \"-v\" ] && exit 0\neval last=\\${$#}\n");
    for page in 1..=pages {
        body.push_str(&format!(": > \"$last-{page}.png\"\n"));
    }
    let script = dir.join("fake-pdftoppm");
    write_script(&script, &body);
    script
}

/// Fake tesseract: prints `texts[i]` for the image of page `i + 1`; any
/// other page fails with an error on stderr.
#[cfg(unix)]
pub(crate) fn fake_tesseract(dir: &Path, texts: &[&str]) -> PathBuf {
    let texts_dir = dir.join("ocr");
    std::fs::create_dir_all(&texts_dir).unwrap();
    let mut body = String::from("#!/bin/sh\n[ \"$1\" = \"--version\" ] && exit 0\ncase \"$1\" in\n");
    for (i, text) in texts.iter().enumerate() {
        let page = i + 1;
        let file = texts_dir.join(format!("{page}.txt"));
        std::fs::write(&file, text).unwrap();
        body.push_str(&format!("  *-{page}.png) cat '{}';;\n", file.display()));
    }
    body.push_str("  *) echo 'Error in pixReadStream' >&2; exit 1;;\nesac\n");

    let script = dir.join("fake-tesseract");
    write_script(&script, &body);
    script
}

/// A file that passes input validation.
pub(crate) fn write_pdf_stub(dir: &Path) -> PathBuf {
    let pdf = dir.join("doc.pdf");
    std::fs::write(&pdf, b"%PDF-1.4\n%%EOF\n").unwrap();
    pdf
}
