//! Input format detection.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Document formats accepted by the ingest pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputFormat {
    /// Portable Document Format (.pdf)
    #[serde(rename = "PDF")]
    Pdf,
    /// Microsoft Word (.docx)
    #[serde(rename = "DOCX")]
    Docx,
    /// Microsoft `PowerPoint` (.pptx)
    #[serde(rename = "PPTX")]
    Pptx,
    /// HTML page (.html, .htm)
    #[serde(rename = "HTML")]
    Html,
}

/// File suffixes the CLI accepts as conversion candidates (lower-case, with dot).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = [".pdf", ".docx", ".pptx", ".html"];

impl InputFormat {
    /// Detect format from file extension
    #[inline]
    #[must_use = "detects format from file extension"]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    #[inline]
    #[must_use = "detects format from file path"]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// File extensions associated with this format
    #[inline]
    #[must_use = "returns the file extensions for this format"]
    pub const fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Docx => &["docx"],
            Self::Pptx => &["pptx"],
            Self::Html => &["html", "htm"],
        }
    }
}

impl std::fmt::Display for InputFormat {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Pptx => "PPTX",
            Self::Html => "HTML",
        };
        write!(f, "{s}")
    }
}

/// Check whether a path is a conversion candidate.
///
/// The lower-cased suffix must be one of [`SUPPORTED_EXTENSIONS`]; `.htm` is
/// not a candidate even though the HTML backend can read it.
#[must_use = "returns whether the path has a supported suffix"]
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .is_some_and(|suffix| SUPPORTED_EXTENSIONS.contains(&suffix.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_case_insensitive() {
        assert_eq!(InputFormat::from_extension("PDF"), Some(InputFormat::Pdf));
        assert_eq!(InputFormat::from_extension("Docx"), Some(InputFormat::Docx));
        assert_eq!(InputFormat::from_extension("pptx"), Some(InputFormat::Pptx));
        assert_eq!(InputFormat::from_extension("htm"), Some(InputFormat::Html));
        assert_eq!(InputFormat::from_extension("txt"), None);
        assert_eq!(InputFormat::from_extension(""), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            InputFormat::from_path(Path::new("dir/Report.PDF")),
            Some(InputFormat::Pdf)
        );
        assert_eq!(InputFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_extensions_roundtrip() {
        for format in [
            InputFormat::Pdf,
            InputFormat::Docx,
            InputFormat::Pptx,
            InputFormat::Html,
        ] {
            for ext in format.extensions() {
                assert_eq!(InputFormat::from_extension(ext), Some(format));
            }
        }
    }

    #[test]
    fn test_is_supported_path() {
        assert!(is_supported_path(Path::new("a.pdf")));
        assert!(is_supported_path(Path::new("b.DOCX")));
        assert!(is_supported_path(Path::new("c.Pptx")));
        assert!(is_supported_path(Path::new("d.html")));
        assert!(!is_supported_path(Path::new("e.htm")));
        assert!(!is_supported_path(Path::new("notes.txt")));
        assert!(!is_supported_path(Path::new("no_extension")));
    }

    #[test]
    fn test_display() {
        assert_eq!(InputFormat::Pdf.to_string(), "PDF");
        assert_eq!(InputFormat::Html.to_string(), "HTML");
    }
}
