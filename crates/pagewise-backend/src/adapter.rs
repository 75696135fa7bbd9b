//! Converter adapter: one file in, sections and pages out.

use crate::converter::DocumentConverter;
use pagewise_core::{aggregate, IngestResult};
use std::path::Path;

/// Display name of an input file (its final path component)
#[must_use = "returns the display name of the file"]
pub fn doc_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Convert one file and aggregate its items.
///
/// Never fails: on any conversion error the result is empty and the second
/// element holds `"<file name>: <error>"`.
///
/// # Examples
///
/// ```rust
/// use pagewise_backend::{convert_to_sections, DocumentConverter};
/// use std::path::Path;
///
/// let (result, error) = convert_to_sections(&DocumentConverter::new(), Path::new("missing.pdf"));
/// assert!(result.pages.is_empty());
/// assert!(error.unwrap().starts_with("missing.pdf: "));
/// ```
#[must_use = "returns the ingest result and the error, if any"]
pub fn convert_to_sections(
    converter: &DocumentConverter,
    path: &Path,
) -> (IngestResult, Option<String>) {
    let name = doc_name(path);
    match converter.convert(path) {
        Ok(result) => {
            let document = result.document;
            let (sections, pages) = aggregate(&name, &document.items);
            log::debug!(
                "{name}: {} sections, {} pages in {:?}",
                sections.len(),
                pages.len(),
                result.latency
            );
            (
                IngestResult {
                    markdown: document.markdown,
                    sections,
                    pages,
                },
                None,
            )
        }
        Err(e) => {
            log::debug!("{name}: conversion failed: {e}");
            (IngestResult::default(), Some(format!("{name}: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::tests::build_zip;
    use pagewise_core::UNTITLED_HEADING;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_doc_name() {
        assert_eq!(doc_name(Path::new("/tmp/in/report.pdf")), "report.pdf");
        assert_eq!(doc_name(Path::new("slides.pptx")), "slides.pptx");
    }

    #[test]
    fn test_html_sections_and_pages() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guide.html");
        fs::write(
            &path,
            "<body><p>Preface</p><h2>1. Scope</h2><p>Scope text</p><h2>NOTES</h2><p>More</p></body>",
        )
        .unwrap();

        let (result, error) = convert_to_sections(&DocumentConverter::new(), &path);
        assert!(error.is_none());
        assert!(result.markdown.contains("## 1. Scope"));

        let headings: Vec<&str> = result.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec![UNTITLED_HEADING, "1. Scope", "NOTES"]);
        assert_eq!(result.sections[1].text, "1. Scope\nScope text");

        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.pages[0].page, 1);
        assert_eq!(result.pages[0].doc_name, "guide.html");
        assert_eq!(result.pages[0].headings, vec!["H1: NOTES", "H2: 1. Scope"]);
    }

    #[test]
    fn test_pdf_pages() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("two.pdf");
        fs::write(&path, crate::pdf::tests::build_pdf(&["First", "Second"])).unwrap();

        let (result, error) = convert_to_sections(&DocumentConverter::new(), &path);
        assert!(error.is_none());
        let pages: Vec<usize> = result.pages.iter().map(|p| p.page).collect();
        assert_eq!(pages, vec![1, 2]);
        assert!(result.pages.iter().all(|p| p.headings.is_empty()));
        assert_eq!(result.sections.len(), 1);
        assert_eq!(result.sections[0].heading, UNTITLED_HEADING);
    }

    #[test]
    fn test_corrupt_docx_reports_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.docx");
        fs::write(&path, b"not a zip").unwrap();

        let (result, error) = convert_to_sections(&DocumentConverter::new(), &path);
        assert_eq!(result, IngestResult::default());
        let error = error.unwrap();
        assert!(error.starts_with("broken.docx: "));
        assert!(error.contains("ZIP"));
    }

    #[test]
    fn test_docx_without_body_reports_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.docx");
        fs::write(&path, build_zip(&[("docProps/core.xml", "<cp:coreProperties/>")])).unwrap();

        let (_, error) = convert_to_sections(&DocumentConverter::new(), &path);
        assert!(error.unwrap().contains("word/document.xml"));
    }

    #[test]
    fn test_unsupported_extension_reports_error() {
        let (result, error) = convert_to_sections(&DocumentConverter::new(), Path::new("a.txt"));
        assert!(result.sections.is_empty());
        assert!(error.unwrap().starts_with("a.txt: Format detection error"));
    }
}
