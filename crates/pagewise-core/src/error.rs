//! Error types for document conversion and report writing.

use thiserror::Error;

/// Error types that can occur while converting a document or writing outputs.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use pagewise_core::{InputFormat, PagewiseError, Result};
///
/// fn detect(path: &Path) -> Result<InputFormat> {
///     InputFormat::from_path(path).ok_or_else(|| {
///         PagewiseError::FormatError(format!("Unsupported file: {}", path.display()))
///     })
/// }
///
/// assert_eq!(detect(Path::new("slides.pptx")).unwrap(), InputFormat::Pptx);
///
/// match detect(Path::new("notes.txt")) {
///     Err(PagewiseError::FormatError(msg)) => assert_eq!(msg, "Unsupported file: notes.txt"),
///     other => panic!("expected a format error, got {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum PagewiseError {
    /// General conversion error.
    #[error("Conversion error: {0}")]
    ConversionError(String),

    /// File I/O error.
    ///
    /// This occurs when reading input files or writing output files fails,
    /// such as file not found, permission denied, or disk full.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Format detection or unsupported format error.
    ///
    /// This occurs when the file format cannot be detected from the extension.
    #[error("Format detection error: {0}")]
    FormatError(String),

    /// Backend-specific error.
    ///
    /// This occurs when a format backend cannot read its container
    /// (broken ZIP archive, malformed XML, unreadable PDF).
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Type alias for [`Result<T, PagewiseError>`].
pub type Result<T> = std::result::Result<T, PagewiseError>;
