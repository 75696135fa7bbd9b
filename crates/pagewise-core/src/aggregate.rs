//! Page and section aggregation
//!
//! Walks a converted document's items once and buckets their text by page and
//! by heading-delimited section. Item capabilities (page number, labels,
//! heading metadata, table export) are all optional; a missing capability is
//! treated as "no signal" and never as an error.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::content::{DocItem, HEADING_LABEL};
use crate::heading::format_heading;

/// Heading active before the first heading item of a document
pub const UNTITLED_HEADING: &str = "Untitled";

/// Page used until an item reports one
pub const DEFAULT_PAGE: usize = 1;

/// Read-only view of an engine item used by the aggregator.
///
/// Every accessor may return `None`; implementors should never panic.
pub trait ContentItem {
    /// Page number (1-based) of the item's first provenance entry
    fn page_no(&self) -> Option<usize>;

    /// Structural label (`"table"`, `"text"`, ...)
    fn label(&self) -> Option<String>;

    /// Classification labels attached by the engine
    fn labels(&self) -> Option<&[String]>;

    /// Raw item text
    fn text(&self) -> Option<&str>;

    /// Engine-supplied heading metadata
    fn meta_headings(&self) -> Option<&[String]>;

    /// Markdown export for table items
    fn table_markdown(&self) -> Option<String>;
}

impl ContentItem for DocItem {
    #[inline]
    fn page_no(&self) -> Option<usize> {
        DocItem::page_no(self)
    }

    #[inline]
    fn label(&self) -> Option<String> {
        Some(self.label.to_string())
    }

    #[inline]
    fn labels(&self) -> Option<&[String]> {
        (!self.labels.is_empty()).then_some(self.labels.as_slice())
    }

    #[inline]
    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    #[inline]
    fn meta_headings(&self) -> Option<&[String]> {
        self.meta.as_ref().map(|meta| meta.headings.as_slice())
    }

    #[inline]
    fn table_markdown(&self) -> Option<String> {
        self.export_to_markdown()
    }
}

/// Text and headings collected for one page of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Source file name
    pub doc_name: String,
    /// Page number (1-based)
    pub page: usize,
    /// Newline-joined text of the page, trimmed
    pub text: String,
    /// `"<level>: <text>"` entries, sorted and deduplicated
    pub headings: Vec<String>,
}

/// Contiguous text between two headings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Source file name
    pub doc_name: String,
    /// Heading active when the section started
    pub heading: String,
    /// Page the section's first text landed on
    pub page: usize,
    /// Newline-joined section text, trimmed
    pub text: String,
}

/// Outcome of ingesting one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResult {
    /// Full markdown export of the document
    pub markdown: String,
    /// Sections in document order
    pub sections: Vec<SectionRecord>,
    /// Pages with text, ascending
    pub pages: Vec<PageRecord>,
}

/// Whether an item should be treated as a heading.
///
/// A classification label equal to `heading` (any case) wins; otherwise a
/// non-empty heading-metadata list marks the item.
#[must_use = "returns whether the item is a heading"]
pub fn is_heading<I: ContentItem + ?Sized>(item: &I) -> bool {
    if item
        .labels()
        .is_some_and(|labels| labels.iter().any(|l| l.to_lowercase() == HEADING_LABEL))
    {
        return true;
    }
    item.meta_headings()
        .is_some_and(|headings| !headings.is_empty())
}

/// Heading text of an item: its own trimmed text, else the first metadata heading.
#[must_use = "returns the heading text if one can be resolved"]
pub fn heading_text<I: ContentItem + ?Sized>(item: &I) -> Option<String> {
    if let Some(text) = item.text().map(str::trim).filter(|t| !t.is_empty()) {
        return Some(text.to_string());
    }
    item.meta_headings()
        .and_then(|headings| headings.first())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

/// Text an item contributes to its page and section, if any.
///
/// Table items contribute their trimmed markdown export; everything else its
/// trimmed text.
#[must_use = "returns the text the item contributes"]
pub fn item_text<I: ContentItem + ?Sized>(item: &I) -> Option<String> {
    let is_table = item
        .label()
        .is_some_and(|label| label.to_lowercase() == "table");

    let text = if is_table {
        item.table_markdown()?.trim().to_string()
    } else {
        item.text()?.trim().to_string()
    };
    (!text.is_empty()).then_some(text)
}

/// Single-pass aggregation state for one document
#[derive(Debug)]
pub struct Aggregator {
    doc_name: String,
    current_page: usize,
    current_heading: String,
    section_buf: Vec<String>,
    section_page: usize,
    sections: Vec<SectionRecord>,
    page_text: BTreeMap<usize, Vec<String>>,
    page_headings: BTreeMap<usize, BTreeSet<String>>,
}

impl Aggregator {
    /// Start aggregating a document
    #[must_use = "creates a new aggregator"]
    pub fn new(doc_name: impl Into<String>) -> Self {
        Self {
            doc_name: doc_name.into(),
            current_page: DEFAULT_PAGE,
            current_heading: UNTITLED_HEADING.to_string(),
            section_buf: Vec::new(),
            section_page: DEFAULT_PAGE,
            sections: Vec::new(),
            page_text: BTreeMap::new(),
            page_headings: BTreeMap::new(),
        }
    }

    /// Feed the next item in reading order
    pub fn push<I: ContentItem + ?Sized>(&mut self, item: &I) {
        // Page numbers are sticky; 0 counts as unknown
        if let Some(page) = item.page_no().filter(|&p| p > 0) {
            self.current_page = page;
        }

        if is_heading(item) {
            if let Some(heading) = heading_text(item) {
                self.flush_section();
                self.page_headings
                    .entry(self.current_page)
                    .or_default()
                    .insert(format_heading(&heading));
                self.current_heading = heading;
            }
        }

        if let Some(text) = item_text(item) {
            if self.section_buf.is_empty() {
                self.section_page = self.current_page;
            }
            self.section_buf.push(text.clone());
            self.page_text
                .entry(self.current_page)
                .or_default()
                .push(text);
        }
    }

    fn flush_section(&mut self) {
        if self.section_buf.is_empty() {
            return;
        }
        let text = self.section_buf.join("\n").trim().to_string();
        self.section_buf.clear();
        if text.is_empty() {
            return;
        }
        self.sections.push(SectionRecord {
            doc_name: self.doc_name.clone(),
            heading: self.current_heading.clone(),
            page: self.section_page,
            text,
        });
    }

    /// Flush the open section and emit sections and pages
    #[must_use = "returns the aggregated sections and pages"]
    pub fn finish(mut self) -> (Vec<SectionRecord>, Vec<PageRecord>) {
        self.flush_section();

        let mut page_headings = self.page_headings;
        let pages = self
            .page_text
            .into_iter()
            .map(|(page, texts)| PageRecord {
                doc_name: self.doc_name.clone(),
                page,
                text: texts.join("\n").trim().to_string(),
                headings: page_headings
                    .remove(&page)
                    .map(|set| set.into_iter().collect())
                    .unwrap_or_default(),
            })
            .collect();

        (self.sections, pages)
    }
}

/// Aggregate a document's items into sections and pages.
///
/// # Examples
///
/// ```
/// use pagewise_core::{aggregate, ContentLabel, DocItem};
///
/// let items = vec![
///     DocItem::heading("#/texts/0", ContentLabel::SectionHeader, "1. Scope", 1).on_page(1),
///     DocItem::new("#/texts/1", ContentLabel::Text, "Body").on_page(1),
/// ];
/// let (sections, pages) = aggregate("report.pdf", &items);
/// assert_eq!(sections[0].heading, "1. Scope");
/// assert_eq!(pages[0].headings, vec!["H2: 1. Scope".to_string()]);
/// ```
#[must_use = "returns the aggregated sections and pages"]
pub fn aggregate<I: ContentItem>(
    doc_name: &str,
    items: &[I],
) -> (Vec<SectionRecord>, Vec<PageRecord>) {
    let mut aggregator = Aggregator::new(doc_name);
    for item in items {
        aggregator.push(item);
    }
    let (sections, pages) = aggregator.finish();
    log::debug!(
        "{doc_name}: {} items -> {} sections, {} pages",
        items.len(),
        sections.len(),
        pages.len()
    );
    (sections, pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentLabel, TableData};

    /// Minimal item exposing only what a test sets
    #[derive(Default)]
    struct FakeItem {
        page: Option<usize>,
        label: Option<String>,
        labels: Option<Vec<String>>,
        text: Option<String>,
        headings: Option<Vec<String>>,
        table_md: Option<String>,
    }

    impl ContentItem for FakeItem {
        fn page_no(&self) -> Option<usize> {
            self.page
        }
        fn label(&self) -> Option<String> {
            self.label.clone()
        }
        fn labels(&self) -> Option<&[String]> {
            self.labels.as_deref()
        }
        fn text(&self) -> Option<&str> {
            self.text.as_deref()
        }
        fn meta_headings(&self) -> Option<&[String]> {
            self.headings.as_deref()
        }
        fn table_markdown(&self) -> Option<String> {
            self.table_md.clone()
        }
    }

    fn text(page: Option<usize>, body: &str) -> FakeItem {
        FakeItem {
            page,
            text: Some(body.to_string()),
            ..FakeItem::default()
        }
    }

    fn heading(page: Option<usize>, title: &str) -> FakeItem {
        FakeItem {
            labels: Some(vec!["Heading".to_string()]),
            ..text(page, title)
        }
    }

    /// Test 1: no headings gives one Untitled section and empty heading lists
    #[test]
    fn test_no_headings_single_untitled_section() {
        let items = vec![text(Some(1), "alpha"), text(Some(2), "beta"), text(None, "gamma")];
        let (sections, pages) = aggregate("a.pdf", &items);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, UNTITLED_HEADING);
        assert_eq!(sections[0].page, 1);
        assert_eq!(sections[0].text, "alpha\nbeta\ngamma");

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[0].text, "alpha");
        assert_eq!(pages[1].page, 2);
        assert_eq!(pages[1].text, "beta\ngamma");
        assert!(pages.iter().all(|p| p.headings.is_empty()));
    }

    /// Test 2: headings are deduplicated and sorted per page
    #[test]
    fn test_headings_sorted_and_deduplicated() {
        let items = vec![
            heading(Some(1), "Zeta"),
            heading(Some(1), "ALPHA"),
            heading(Some(1), "Zeta"),
            heading(Some(1), "2Test"),
        ];
        let (_, pages) = aggregate("a.docx", &items);
        assert_eq!(pages.len(), 1);
        assert_eq!(
            pages[0].headings,
            vec![
                "H1: ALPHA".to_string(),
                "H2: Zeta".to_string(),
                "H3: 2Test".to_string()
            ]
        );
    }

    /// Test 3: sections split at headings and keep the heading text
    #[test]
    fn test_sections_split_at_headings() {
        let items = vec![
            text(Some(1), "preface"),
            heading(Some(1), "1. Scope"),
            text(Some(1), "scope body"),
            heading(Some(2), "2. Terms"),
            text(Some(3), "terms body"),
        ];
        let (sections, pages) = aggregate("manual.pdf", &items);

        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec![UNTITLED_HEADING, "1. Scope", "2. Terms"]);
        assert_eq!(sections[1].text, "1. Scope\nscope body");
        assert_eq!(sections[2].page, 2);
        assert_eq!(sections[2].text, "2. Terms\nterms body");

        assert_eq!(pages[0].headings, vec!["H2: 1. Scope".to_string()]);
        assert_eq!(pages[1].headings, vec!["H2: 2. Terms".to_string()]);
        assert_eq!(pages[2].page, 3);
        assert!(pages[2].headings.is_empty());
    }

    /// A section running over page breaks keeps the page it started on
    #[test]
    fn test_section_spanning_pages_keeps_start_page() {
        let items = vec![
            heading(Some(1), "1. Scope"),
            text(Some(1), "body"),
            text(Some(2), "more"),
            heading(Some(3), "2. Next"),
            text(Some(3), "next body"),
        ];
        let (sections, pages) = aggregate("manual.pdf", &items);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "1. Scope");
        assert_eq!(sections[0].page, 1);
        assert_eq!(sections[0].text, "1. Scope\nbody\nmore");
        assert_eq!(sections[1].heading, "2. Next");
        assert_eq!(sections[1].page, 3);

        let split: Vec<(usize, &str)> = pages.iter().map(|p| (p.page, p.text.as_str())).collect();
        assert_eq!(
            split,
            vec![(1, "1. Scope\nbody"), (2, "more"), (3, "2. Next\nnext body")]
        );
    }

    /// Test 4: unknown and zero pages inherit the previous page
    #[test]
    fn test_sticky_page_numbers() {
        let items = vec![text(Some(4), "four"), text(None, "still four"), text(Some(0), "also four")];
        let (_, pages) = aggregate("x.pdf", &items);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page, 4);
        assert_eq!(pages[0].text, "four\nstill four\nalso four");
    }

    /// Test 5: items without a page start on page 1
    #[test]
    fn test_default_page_is_one() {
        let (_, pages) = aggregate("x.html", &[text(None, "hello")]);
        assert_eq!(pages[0].page, DEFAULT_PAGE);
    }

    /// Test 6: heading metadata is used when the item text is empty
    #[test]
    fn test_meta_heading_fallback() {
        let item = FakeItem {
            page: Some(2),
            text: Some("   ".to_string()),
            headings: Some(vec!["  Appendix  ".to_string(), "ignored".to_string()]),
            ..FakeItem::default()
        };
        assert!(is_heading(&item));
        assert_eq!(heading_text(&item).as_deref(), Some("Appendix"));

        let (sections, pages) = aggregate("x.pdf", &[item, text(None, "body")]);
        assert_eq!(sections[0].heading, "Appendix");
        assert_eq!(sections[0].text, "body");
        assert_eq!(pages[0].headings, vec!["H2: Appendix".to_string()]);
    }

    /// Test 7: an empty metadata list is not a heading signal
    #[test]
    fn test_empty_meta_is_not_heading() {
        let item = FakeItem {
            text: Some("Plain".to_string()),
            headings: Some(Vec::new()),
            ..FakeItem::default()
        };
        assert!(!is_heading(&item));
    }

    /// Test 8: a heading without resolvable text does not open a section
    #[test]
    fn test_heading_without_text_is_ignored() {
        let blank = FakeItem {
            labels: Some(vec!["heading".to_string()]),
            text: Some(String::new()),
            ..FakeItem::default()
        };
        let items = vec![text(Some(1), "a"), blank, text(Some(1), "b")];
        let (sections, pages) = aggregate("x.pdf", &items);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].text, "a\nb");
        assert!(pages[0].headings.is_empty());
    }

    /// Test 9: tables contribute their markdown export, or nothing
    #[test]
    fn test_table_items() {
        let table = FakeItem {
            label: Some("TABLE".to_string()),
            text: Some("ignored text".to_string()),
            table_md: Some("| a |\n|---|\n| 1 |\n".to_string()),
            ..FakeItem::default()
        };
        let broken = FakeItem {
            label: Some("table".to_string()),
            text: Some("ignored".to_string()),
            ..FakeItem::default()
        };
        let (_, pages) = aggregate("t.pdf", &[table, broken]);
        assert_eq!(pages[0].text, "| a |\n|---|\n| 1 |");
    }

    /// Test 10: items with no capabilities at all contribute nothing
    #[test]
    fn test_empty_items() {
        let (sections, pages) = aggregate("e.pdf", &[FakeItem::default(), FakeItem::default()]);
        assert!(sections.is_empty());
        assert!(pages.is_empty());
    }

    /// Test 11: pages come out ascending regardless of item order
    #[test]
    fn test_pages_ascending() {
        let items = vec![text(Some(3), "c"), text(Some(1), "a"), text(Some(2), "b")];
        let (_, pages) = aggregate("p.pdf", &items);
        let numbers: Vec<usize> = pages.iter().map(|p| p.page).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_doc_items_aggregate() {
        let items = vec![
            DocItem::heading("#/texts/0", ContentLabel::Title, "QUARTERLY REPORT", 1).on_page(1),
            DocItem::new("#/texts/1", ContentLabel::Text, "Revenue grew.").on_page(1),
            DocItem::table(
                "#/tables/0",
                TableData::from_rows(vec![vec!["Q".into(), "Rev".into()], vec!["Q1".into(), "10".into()]], true),
            )
            .on_page(2),
        ];
        let (sections, pages) = aggregate("report.pptx", &items);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "QUARTERLY REPORT");
        assert_eq!(pages[0].headings, vec!["H1: QUARTERLY REPORT".to_string()]);
        assert_eq!(pages[0].text, "QUARTERLY REPORT\nRevenue grew.");
        assert!(pages[1].text.starts_with("| Q"));
        assert_eq!(pages[1].doc_name, "report.pptx");
    }
}
