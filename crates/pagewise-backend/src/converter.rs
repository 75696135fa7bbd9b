//! Format dispatch
//!
//! Picks the backend from the file extension, runs it and times the
//! conversion.

use crate::docx::DocxBackend;
use crate::html::HtmlBackend;
use crate::pdf::PdfBackend;
use crate::pptx::PptxBackend;
use crate::traits::{BackendOptions, DocumentBackend};
use pagewise_core::{ConversionResult, InputFormat, PagewiseError, Result};
use std::path::Path;
use std::time::Instant;

/// Converts PDF, DOCX, PPTX and HTML files into [`pagewise_core::Document`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentConverter {
    options: BackendOptions,
}

impl DocumentConverter {
    /// Create a converter with default options
    #[inline]
    #[must_use = "creates a document converter"]
    pub const fn new() -> Self {
        Self {
            options: BackendOptions::new(),
        }
    }

    /// Create a converter with explicit backend options
    #[inline]
    #[must_use = "creates a document converter with the given options"]
    pub const fn with_options(options: BackendOptions) -> Self {
        Self { options }
    }

    /// Options passed to every backend
    #[inline]
    #[must_use = "returns the backend options"]
    pub const fn options(&self) -> &BackendOptions {
        &self.options
    }

    /// Backend for a format
    fn backend_for(format: InputFormat) -> Box<dyn DocumentBackend> {
        match format {
            InputFormat::Pdf => Box::new(PdfBackend::new()),
            InputFormat::Docx => Box::new(DocxBackend::new()),
            InputFormat::Pptx => Box::new(PptxBackend::new()),
            InputFormat::Html => Box::new(HtmlBackend::new()),
        }
    }

    /// Convert a document file
    ///
    /// # Errors
    ///
    /// Returns [`PagewiseError::FormatError`] if the extension is not a
    /// supported format, or the backend's error if reading or parsing fails.
    pub fn convert<P: AsRef<Path>>(&self, path: P) -> Result<ConversionResult> {
        let path_ref = path.as_ref();
        let format = InputFormat::from_path(path_ref).ok_or_else(|| {
            PagewiseError::FormatError(format!(
                "Unsupported file extension: {}",
                path_ref.display()
            ))
        })?;

        let backend = Self::backend_for(format);
        log::debug!(
            "Converting {} with the {} backend",
            path_ref.display(),
            backend.format()
        );
        let start = Instant::now();
        let document = backend.parse_file(path_ref, &self.options)?;
        let latency = start.elapsed();
        log::debug!(
            "Converted {} in {latency:?}: {} items",
            path_ref.display(),
            document.items.len()
        );

        Ok(ConversionResult { document, latency })
    }
}
