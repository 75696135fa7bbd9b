//! Core trait definitions for document backends

use pagewise_core::{Document, InputFormat, PagewiseError};
use std::path::Path;

/// Options for backend processing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendOptions {
    /// Maximum pages (PDF) or slides (PPTX) to process (None = all)
    pub max_pages: Option<usize>,
}

impl BackendOptions {
    /// Create default options
    #[inline]
    #[must_use = "creates default backend options"]
    pub const fn new() -> Self {
        Self { max_pages: None }
    }

    /// Set maximum pages to process
    #[inline]
    #[must_use = "returns options with maximum pages configured"]
    pub const fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Whether page/slide `page_no` (1-based) is within the configured limit
    #[inline]
    #[must_use = "returns whether the page should be processed"]
    pub const fn allows_page(&self, page_no: usize) -> bool {
        match self.max_pages {
            Some(max) => page_no <= max,
            None => true,
        }
    }
}

/// Main trait for document backends
///
/// Each backend (PDF, DOCX, etc.) implements this trait to turn raw bytes into
/// a [`Document`] with a flat, reading-order item list.
pub trait DocumentBackend: Send + Sync {
    /// Get the format this backend handles
    fn format(&self) -> InputFormat;

    /// Parse document from bytes
    ///
    /// # Errors
    /// Returns an error if parsing fails.
    fn parse_bytes(&self, data: &[u8], options: &BackendOptions) -> Result<Document, PagewiseError>;

    /// Parse document from file path
    ///
    /// # Errors
    /// Returns an error if file reading or parsing fails.
    fn parse_file(&self, path: &Path, options: &BackendOptions) -> Result<Document, PagewiseError> {
        let data = std::fs::read(path).map_err(PagewiseError::IoError)?;
        self.parse_bytes(&data, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_allow_all_pages() {
        let options = BackendOptions::default();
        assert_eq!(options, BackendOptions::new());
        assert!(options.allows_page(1));
        assert!(options.allows_page(10_000));
    }

    #[test]
    fn test_max_pages_limit() {
        let options = BackendOptions::new().with_max_pages(Some(2));
        assert!(options.allows_page(1));
        assert!(options.allows_page(2));
        assert!(!options.allows_page(3));
    }
}
