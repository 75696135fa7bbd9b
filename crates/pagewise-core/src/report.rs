//! Combined page-wise report formatting
//!
//! The report is plain UTF-8 text: a short header, one fixed-format block per
//! page of every converted file, and a trailer. Consumers split it on the
//! `---------` separators, so the block layout must stay byte-stable.

use crate::aggregate::{IngestResult, DEFAULT_PAGE};

/// First line of every report
pub const REPORT_HEADER: &str = "# Combined page-wise export with headings";
/// Last line of every report (before the optional error count)
pub const REPORT_FOOTER: &str = "# End";
/// Report name inside the output directory
pub const COMBINED_FILE: &str = "combined.txt";
/// Error log name inside the output directory
pub const ERRORS_FILE: &str = "_errors.txt";
/// Report body when there was nothing to convert
pub const NO_CONTENT: &str = "No content.";
/// Error log body (and console message) when no path had a supported suffix
pub const NO_SUPPORTED_FILES: &str = "No supported files given.";
/// Error log body when every file converted
pub const NO_ERRORS: &str = "No errors.";

const SEPARATOR: &str = "---------";

/// Format one page block.
///
/// The block always ends with a newline so that consecutive blocks joined by
/// `\n` are separated by a blank line.
#[must_use = "returns the formatted page block"]
pub fn page_block(doc_name: &str, page: usize, headings: &[String], text: &str) -> String {
    let headings = if headings.is_empty() {
        "None".to_string()
    } else {
        headings.join(", ")
    };

    let doc_line = format!("Doc: {doc_name}");
    let page_line = format!("Page: {page}");
    let headings_line = format!("Headings: {headings}");

    [
        SEPARATOR,
        "meta data",
        SEPARATOR,
        doc_line.as_str(),
        page_line.as_str(),
        headings_line.as_str(),
        "",
        SEPARATOR,
        "respective text",
        SEPARATOR,
        text.trim(),
        "",
    ]
    .join("\n")
}

/// Accumulates page blocks for every processed file
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    lines: Vec<String>,
}

impl ReportBuilder {
    /// Start a report for `file_count` candidate files
    #[must_use = "creates a report builder"]
    pub fn new(file_count: usize) -> Self {
        Self {
            lines: vec![
                REPORT_HEADER.to_string(),
                format!("# Files: {file_count}"),
                String::new(),
            ],
        }
    }

    /// Append the blocks of one converted file.
    ///
    /// A file without pages is represented by a single page-1 block holding its
    /// trimmed markdown export.
    pub fn add_file(&mut self, doc_name: &str, result: &IngestResult) {
        if result.pages.is_empty() {
            self.lines
                .push(page_block(doc_name, DEFAULT_PAGE, &[], &result.markdown));
            return;
        }
        for page in &result.pages {
            self.lines
                .push(page_block(doc_name, page.page, &page.headings, &page.text));
        }
    }

    /// Close the report and render it
    #[must_use = "returns the rendered report"]
    pub fn finish(mut self, error_count: usize) -> String {
        self.lines.push(REPORT_FOOTER.to_string());
        if error_count > 0 {
            self.lines
                .push(format!("# Errors: {error_count} (see {ERRORS_FILE})"));
        }
        self.lines.join("\n")
    }
}

/// Render the error log: one error per line, or [`NO_ERRORS`]
#[must_use = "returns the rendered error log"]
pub fn error_log(errors: &[String]) -> String {
    if errors.is_empty() {
        NO_ERRORS.to_string()
    } else {
        errors.join("\n")
    }
}
