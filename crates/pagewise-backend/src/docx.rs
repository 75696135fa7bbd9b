//! DOCX (Microsoft Word) document parser
//!
//! # Architecture
//!
//! Manual ZIP + XML parsing. DOCX files are ZIP archives containing:
//! - `word/document.xml`: Main content (paragraphs, tables)
//! - `word/styles.xml`: Style definitions (headings, title)
//! - `docProps/core.xml`: Metadata (title)
//!
//! Word does not store layout, so page numbers only advance at explicit page
//! breaks (`<w:br w:type="page"/>`). Everything before the first break is page 1.

use crate::traits::{BackendOptions, DocumentBackend};
use crate::utils::{
    attr_value, open_archive, read_zip_entry, require_zip_entry, xml_error, ItemSink,
};
use pagewise_core::{
    ContentLabel, DocItem, Document, DocumentMetadata, InputFormat, PagewiseError, TableData,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::Cursor;

const DOCUMENT_XML: &str = "word/document.xml";
const STYLES_XML: &str = "word/styles.xml";
const CORE_XML: &str = "docProps/core.xml";

/// `w:outlineLvl` value Word uses for body text
const BODY_TEXT_OUTLINE_LEVEL: usize = 9;

/// Heading role of a paragraph style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingStyle {
    Title,
    Heading(usize),
}

/// Classify a style by its display name or id (`Title`, `heading 2`, `Heading2`)
fn classify_style_name(name: &str) -> Option<HeadingStyle> {
    let lower = name.trim().to_lowercase();
    if lower == "title" {
        return Some(HeadingStyle::Title);
    }
    let rest = lower.strip_prefix("heading")?.trim();
    if rest.is_empty() {
        return Some(HeadingStyle::Heading(1));
    }
    rest.parse::<usize>()
        .ok()
        .filter(|level| (1..=9).contains(level))
        .map(HeadingStyle::Heading)
}

/// Parse `word/styles.xml` into a map of style id → heading role
fn parse_styles(xml: &str) -> Result<HashMap<String, HeadingStyle>, PagewiseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut styles = HashMap::new();
    let mut current_id: Option<String> = None;
    let mut current_name: Option<String> = None;
    let mut outline_level: Option<usize> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => match e.name().as_ref() {
                b"w:style" => {
                    current_id = attr_value(&e, &reader, b"w:styleId");
                    current_name = None;
                    outline_level = None;
                }
                b"w:name" if current_id.is_some() => {
                    current_name = attr_value(&e, &reader, b"w:val");
                }
                b"w:outlineLvl" if current_id.is_some() => {
                    outline_level = attr_value(&e, &reader, b"w:val")
                        .and_then(|v| v.parse::<usize>().ok())
                        .filter(|&lvl| lvl < BODY_TEXT_OUTLINE_LEVEL);
                }
                _ => {}
            },
            Ok(Event::End(e)) if e.name().as_ref() == b"w:style" => {
                if let Some(id) = current_id.take() {
                    let role = current_name
                        .as_deref()
                        .and_then(classify_style_name)
                        .or_else(|| outline_level.map(|lvl| HeadingStyle::Heading(lvl + 1)));
                    if let Some(role) = role {
                        styles.insert(id, role);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(STYLES_XML, &reader, &e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(styles)
}

/// Extract `dc:title` from `docProps/core.xml`
fn parse_core_title(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut in_title = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"dc:title" => in_title = true,
            Ok(Event::Text(e)) if in_title => {
                return e
                    .unescape()
                    .ok()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty());
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"dc:title" => in_title = false,
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

#[derive(Debug, Default)]
struct Paragraph {
    text: String,
    style_id: Option<String>,
    numbered: bool,
}

/// State for walking `word/document.xml`
struct WalkBodyState<'a> {
    styles: &'a HashMap<String, HeadingStyle>,
    sink: ItemSink,
    page: usize,
    paragraph: Option<Paragraph>,
    in_run: bool,
    in_text: bool,
    pending_page_break: bool,
    table_depth: usize,
    table_rows: Vec<Vec<String>>,
    table_row: Vec<String>,
    table_cell: Option<String>,
}

impl<'a> WalkBodyState<'a> {
    fn new(styles: &'a HashMap<String, HeadingStyle>) -> Self {
        Self {
            styles,
            sink: ItemSink::new(),
            page: 1,
            paragraph: None,
            in_run: false,
            in_text: false,
            pending_page_break: false,
            table_depth: 0,
            table_rows: Vec::new(),
            table_row: Vec::new(),
            table_cell: None,
        }
    }

    fn handle_open(&mut self, e: &BytesStart<'_>, reader: &Reader<&[u8]>, is_empty: bool) {
        match e.name().as_ref() {
            b"w:p" if !is_empty => self.paragraph = Some(Paragraph::default()),
            b"w:r" if !is_empty => self.in_run = true,
            b"w:t" if !is_empty => self.in_text = true,
            b"w:pStyle" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.style_id = attr_value(e, reader, b"w:val");
                }
            }
            b"w:numPr" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.numbered = true;
                }
            }
            b"w:tab" if self.in_run => self.push_str("\t"),
            b"w:cr" if self.in_run => self.push_str("\n"),
            b"w:br" if self.in_run => {
                if attr_value(e, reader, b"w:type").as_deref() == Some("page") {
                    self.handle_page_break();
                } else {
                    self.push_str("\n");
                }
            }
            b"w:tbl" if !is_empty => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table_rows.clear();
                }
            }
            b"w:tr" if !is_empty && self.table_depth == 1 => self.table_row.clear(),
            b"w:tc" if !is_empty && self.table_depth == 1 => self.table_cell = Some(String::new()),
            _ => {}
        }
    }

    fn handle_close(&mut self, name: &[u8]) {
        match name {
            b"w:p" => self.handle_paragraph_end(),
            b"w:r" => self.in_run = false,
            b"w:t" => self.in_text = false,
            b"w:tc" if self.table_depth == 1 => {
                let cell = self.table_cell.take().unwrap_or_default();
                self.table_row.push(cell);
            }
            b"w:tr" if self.table_depth == 1 => {
                let row = std::mem::take(&mut self.table_row);
                self.table_rows.push(row);
            }
            b"w:tbl" if self.table_depth > 0 => {
                if self.table_depth == 1 {
                    self.handle_table_end();
                }
                self.table_depth -= 1;
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.in_text {
            self.push_str(text);
        }
    }

    fn push_str(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.text.push_str(text);
        }
    }

    fn handle_page_break(&mut self) {
        let has_text = self
            .paragraph
            .as_ref()
            .is_some_and(|p| !p.text.trim().is_empty());
        if has_text {
            // Text before the break stays on the current page
            self.pending_page_break = true;
        } else {
            self.page += 1;
        }
    }

    fn handle_paragraph_end(&mut self) {
        let Some(paragraph) = self.paragraph.take() else {
            return;
        };

        if let Some(cell) = self.table_cell.as_mut() {
            let text = paragraph.text.trim();
            if !text.is_empty() {
                if !cell.is_empty() {
                    cell.push('\n');
                }
                cell.push_str(text);
            }
        } else {
            let role = paragraph.style_id.as_deref().and_then(|id| {
                self.styles
                    .get(id)
                    .copied()
                    .or_else(|| classify_style_name(id))
            });
            let page = Some(self.page);
            match role {
                Some(HeadingStyle::Title) => {
                    self.sink
                        .push_heading(ContentLabel::Title, &paragraph.text, 1, page);
                }
                Some(HeadingStyle::Heading(level)) => {
                    self.sink
                        .push_heading(ContentLabel::SectionHeader, &paragraph.text, level, page);
                }
                None if paragraph.numbered => {
                    self.sink
                        .push_text(ContentLabel::ListItem, &paragraph.text, page);
                }
                None => self.sink.push_text(ContentLabel::Text, &paragraph.text, page),
            }
        }

        if self.pending_page_break {
            self.pending_page_break = false;
            self.page += 1;
        }
    }

    fn handle_table_end(&mut self) {
        let rows = std::mem::take(&mut self.table_rows);
        if rows.is_empty() {
            return;
        }
        let data = TableData::from_rows(rows, true);
        if !data.is_empty() {
            self.sink
                .push(DocItem::table(String::new(), data), Some(self.page));
        }
    }
}

/// Walk `word/document.xml`, returning items and the page count
fn parse_document_xml(
    xml: &str,
    styles: &HashMap<String, HeadingStyle>,
) -> Result<(Vec<DocItem>, usize), PagewiseError> {
    let mut reader = Reader::from_str(xml);
    // Preserve spaces in w:t runs ("Hello" + " world")
    reader.trim_text(false);

    let mut state = WalkBodyState::new(styles);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => state.handle_open(&e, &reader, false),
            Ok(Event::Empty(e)) => state.handle_open(&e, &reader, true),
            Ok(Event::End(e)) => state.handle_close(e.name().as_ref()),
            Ok(Event::Text(e)) => {
                if let Ok(text) = e.unescape() {
                    state.handle_text(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(DOCUMENT_XML, &reader, &e)),
            _ => {}
        }
        buf.clear();
    }

    let pages = state.page;
    Ok((state.sink.into_items(), pages))
}

/// Backend for Word documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocxBackend;

impl DocxBackend {
    /// Create a new DOCX backend
    #[inline]
    #[must_use = "creates a DOCX backend"]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentBackend for DocxBackend {
    #[inline]
    fn format(&self) -> InputFormat {
        InputFormat::Docx
    }

    fn parse_bytes(&self, data: &[u8], _options: &BackendOptions) -> Result<Document, PagewiseError> {
        let mut archive = open_archive(Cursor::new(data), "DOCX")?;

        let styles = match read_zip_entry(&mut archive, STYLES_XML)? {
            Some(xml) => parse_styles(&xml)?,
            None => HashMap::new(),
        };
        let title = read_zip_entry(&mut archive, CORE_XML)?
            .as_deref()
            .and_then(parse_core_title);
        let document_xml = require_zip_entry(&mut archive, DOCUMENT_XML)?;

        let (items, num_pages) = parse_document_xml(&document_xml, &styles)?;
        log::debug!("DOCX: {} items over {num_pages} page(s)", items.len());

        Ok(Document::from_items(
            InputFormat::Docx,
            items,
            DocumentMetadata {
                num_pages: Some(num_pages),
                title,
                ..DocumentMetadata::default()
            },
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pagewise_core::is_heading;
    use std::io::Write;

    /// Build a DOCX archive in memory from `(entry, xml)` pairs
    pub(crate) fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            for (name, content) in entries {
                zip.start_file(*name, zip::write::SimpleFileOptions::default())
                    .unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn para(style: Option<&str>, text: &str) -> String {
        let ppr = style
            .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#))
            .unwrap_or_default();
        format!(r#"<w:p>{ppr}<w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
    }

    const STYLES: &str = r#"<?xml version="1.0"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Titre"><w:name w:val="Title"/></w:style>
  <w:style w:type="paragraph" w:styleId="berschrift2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="Custom"><w:name w:val="My Outline"/><w:pPr><w:outlineLvl w:val="0"/></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
</w:styles>"#;

    #[test]
    fn test_classify_style_name() {
        assert_eq!(classify_style_name("Title"), Some(HeadingStyle::Title));
        assert_eq!(classify_style_name("heading 3"), Some(HeadingStyle::Heading(3)));
        assert_eq!(classify_style_name("Heading1"), Some(HeadingStyle::Heading(1)));
        assert_eq!(classify_style_name("Heading"), Some(HeadingStyle::Heading(1)));
        assert_eq!(classify_style_name("Normal"), None);
        assert_eq!(classify_style_name("Heading Char"), None);
    }

    #[test]
    fn test_parse_styles() {
        let styles = parse_styles(STYLES).unwrap();
        assert_eq!(styles.get("Titre"), Some(&HeadingStyle::Title));
        assert_eq!(styles.get("berschrift2"), Some(&HeadingStyle::Heading(2)));
        assert_eq!(styles.get("Custom"), Some(&HeadingStyle::Heading(1)));
        assert_eq!(styles.get("Normal"), None);
    }

    #[test]
    fn test_parse_docx_headings_lists_and_pages() {
        let body = [
            para(Some("Titre"), "Annual Report"),
            para(Some("berschrift2"), "1. Scope"),
            para(None, "Hello "),
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>first point</w:t></w:r></w:p>"#.to_string(),
            r#"<w:p><w:r><w:t>end of page one</w:t><w:br w:type="page"/></w:r></w:p>"#.to_string(),
            para(Some("Heading1"), "Appendix"),
            para(None, "   "),
        ]
        .concat();
        let data = build_zip(&[
            (DOCUMENT_XML, &document_xml(&body)),
            (STYLES_XML, STYLES),
            (
                CORE_XML,
                r#"<cp:coreProperties xmlns:cp="x" xmlns:dc="y"><dc:title>Report 2024</dc:title></cp:coreProperties>"#,
            ),
        ]);

        let doc = DocxBackend::new()
            .parse_bytes(&data, &BackendOptions::default())
            .unwrap();

        assert_eq!(doc.format, InputFormat::Docx);
        assert_eq!(doc.metadata.title.as_deref(), Some("Report 2024"));
        assert_eq!(doc.metadata.num_pages, Some(2));

        let items = &doc.items;
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].label, ContentLabel::Title);
        assert!(is_heading(&items[0]));
        assert_eq!(items[1].label, ContentLabel::SectionHeader);
        assert_eq!(items[1].level, Some(2));
        assert_eq!(items[2].text, "Hello");
        assert_eq!(items[3].label, ContentLabel::ListItem);
        assert_eq!(items[4].text, "end of page one");
        assert_eq!(items[4].page_no(), Some(1));
        assert_eq!(items[5].text, "Appendix");
        assert_eq!(items[5].page_no(), Some(2));

        assert!(doc.markdown.starts_with("# Annual Report\n\n### 1. Scope"));
    }

    #[test]
    fn test_parse_docx_table() {
        let body = r#"<w:tbl>
            <w:tr><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Qty</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:p><w:r><w:t>Apples</w:t></w:r></w:p><w:p><w:r><w:t>green</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>3</w:t></w:r></w:p></w:tc></w:tr>
        </w:tbl>"#;
        let data = build_zip(&[(DOCUMENT_XML, &document_xml(body))]);

        let doc = DocxBackend::new()
            .parse_bytes(&data, &BackendOptions::default())
            .unwrap();

        assert_eq!(doc.items.len(), 1);
        let table = doc.items[0].data.as_ref().unwrap();
        assert_eq!(table.num_rows, 2);
        assert_eq!(table.num_cols, 2);
        assert_eq!(table.grid[1][0].text, "Apples\ngreen");
        assert_eq!(doc.items[0].self_ref, "#/tables/0");
        assert_eq!(doc.items[0].page_no(), Some(1));
    }

    #[test]
    fn test_missing_document_xml() {
        let data = build_zip(&[(STYLES_XML, STYLES)]);
        let err = DocxBackend::new()
            .parse_bytes(&data, &BackendOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_not_a_zip() {
        let err = DocxBackend::new()
            .parse_bytes(b"plain text", &BackendOptions::default())
            .unwrap_err();
        assert!(matches!(err, PagewiseError::BackendError(_)));
    }
}
