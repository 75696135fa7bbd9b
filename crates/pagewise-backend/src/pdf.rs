//! PDF text-layer extraction via lopdf
//!
//! Reads the embedded text layer page by page. There is no layout analysis:
//! each run of non-blank lines on a page becomes one text item on that page.
//! Scanned PDFs without a text layer therefore produce no items.

use crate::traits::{BackendOptions, DocumentBackend};
use crate::utils::ItemSink;
use pagewise_core::{ContentLabel, Document, DocumentMetadata, InputFormat, PagewiseError};

/// Split extracted page text into blank-line separated paragraphs
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Backend for PDF documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PdfBackend;

impl PdfBackend {
    /// Create a new PDF backend
    #[inline]
    #[must_use = "creates a PDF backend"]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentBackend for PdfBackend {
    #[inline]
    fn format(&self) -> InputFormat {
        InputFormat::Pdf
    }

    fn parse_bytes(&self, data: &[u8], options: &BackendOptions) -> Result<Document, PagewiseError> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| PagewiseError::BackendError(format!("Failed to load PDF: {e}")))?;

        let pages = doc.get_pages();
        let num_pages = pages.len();
        let mut sink = ItemSink::new();
        let mut attempted = 0_usize;
        let mut failed = 0_usize;

        for &page_num in pages.keys() {
            let page_no = page_num as usize;
            if !options.allows_page(page_no) {
                log::debug!("PDF: stopping at page limit {page_no}");
                break;
            }
            attempted += 1;
            match doc.extract_text(&[page_num]) {
                Ok(text) => {
                    for paragraph in split_paragraphs(&text) {
                        sink.push_text(ContentLabel::Text, &paragraph, Some(page_no));
                    }
                }
                Err(e) => {
                    failed += 1;
                    log::warn!("PDF: skipping page {page_no}, text extraction failed: {e}");
                }
            }
        }

        if attempted > 0 && failed == attempted {
            let hint = if doc.is_encrypted() {
                " (document is encrypted)"
            } else {
                ""
            };
            return Err(PagewiseError::ConversionError(format!(
                "text extraction failed on all {attempted} page(s){hint}"
            )));
        }
        log::debug!("PDF: {} items from {attempted} page(s)", sink.len());

        Ok(Document::from_items(
            InputFormat::Pdf,
            sink.into_items(),
            DocumentMetadata {
                num_pages: Some(num_pages),
                ..DocumentMetadata::default()
            },
        ))
    }
}
