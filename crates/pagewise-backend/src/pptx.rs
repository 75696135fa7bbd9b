//! PPTX (Microsoft `PowerPoint`) presentation parser
//!
//! Each slide is reported as one page: slide N carries page number N in its
//! provenance. Slide order comes from `p:sldIdLst` in `ppt/presentation.xml`
//! resolved through `ppt/_rels/presentation.xml.rels`; archives without those
//! parts fall back to the numeric order of `ppt/slides/slideN.xml` entries.

use crate::traits::{BackendOptions, DocumentBackend};
use crate::utils::{attr_value, open_archive, read_zip_entry, require_zip_entry, xml_error, ItemSink};
use pagewise_core::{ContentLabel, DocItem, Document, DocumentMetadata, InputFormat, PagewiseError, TableData};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

const PRESENTATION_XML: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Parse relationship ids → targets from a `.rels` part
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, PagewiseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (
                    attr_value(&e, &reader, b"Id"),
                    attr_value(&e, &reader, b"Target"),
                ) {
                    rels.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(PRESENTATION_RELS, &reader, &e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Relationship ids of the slides in presentation order
fn parse_slide_ids(xml: &str) -> Result<Vec<String>, PagewiseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"p:sldId" => {
                if let Some(id) = attr_value(&e, &reader, b"r:id") {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(PRESENTATION_XML, &reader, &e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

/// Resolve a relationship target relative to `ppt/`
fn resolve_target(target: &str) -> String {
    target
        .strip_prefix('/')
        .map_or_else(|| format!("ppt/{target}"), str::to_string)
}

/// Slide number of a `ppt/slides/slideN.xml` entry name
fn slide_number(name: &str) -> Option<usize> {
    name.strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Slide part names in presentation order
fn slide_paths<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>, PagewiseError> {
    let presentation = read_zip_entry(archive, PRESENTATION_XML)?;
    let rels = read_zip_entry(archive, PRESENTATION_RELS)?;

    if let (Some(presentation), Some(rels)) = (presentation, rels) {
        let rels = parse_relationships(&rels)?;
        let paths: Vec<String> = parse_slide_ids(&presentation)?
            .iter()
            .filter_map(|id| rels.get(id))
            .map(|target| resolve_target(target))
            .collect();
        if !paths.is_empty() {
            return Ok(paths);
        }
    }

    let mut numbered: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    numbered.sort_unstable();
    Ok(numbered.into_iter().map(|(_, name)| name).collect())
}

#[derive(Debug, Default)]
struct Shape {
    title: Option<ContentLabel>,
    paragraphs: Vec<(String, bool)>,
}

#[derive(Debug, Default)]
struct Paragraph {
    text: String,
    bullet: bool,
}

/// State for walking one slide's XML
struct SlideState<'a> {
    sink: &'a mut ItemSink,
    page: usize,
    shape: Option<Shape>,
    paragraph: Option<Paragraph>,
    in_text: bool,
    in_table: bool,
    table_rows: Vec<Vec<String>>,
    table_row: Vec<String>,
    table_cell: Option<String>,
}

impl<'a> SlideState<'a> {
    fn new(sink: &'a mut ItemSink, page: usize) -> Self {
        Self {
            sink,
            page,
            shape: None,
            paragraph: None,
            in_text: false,
            in_table: false,
            table_rows: Vec::new(),
            table_row: Vec::new(),
            table_cell: None,
        }
    }

    fn handle_open(&mut self, e: &BytesStart<'_>, reader: &Reader<&[u8]>, is_empty: bool) {
        match e.name().as_ref() {
            b"p:sp" if !is_empty => self.shape = Some(Shape::default()),
            b"p:ph" => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.title = match attr_value(e, reader, b"type").as_deref() {
                        Some("ctrTitle") => Some(ContentLabel::Title),
                        Some("title") => Some(ContentLabel::SectionHeader),
                        _ => None,
                    };
                }
            }
            b"a:p" if !is_empty => self.paragraph = Some(Paragraph::default()),
            b"a:buChar" | b"a:buAutoNum" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.bullet = true;
                }
            }
            b"a:buNone" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.bullet = false;
                }
            }
            b"a:t" if !is_empty => self.in_text = true,
            b"a:br" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.text.push('\n');
                }
            }
            b"a:tbl" if !is_empty => {
                self.in_table = true;
                self.table_rows.clear();
            }
            b"a:tr" if self.in_table && !is_empty => self.table_row.clear(),
            b"a:tc" if self.in_table => {
                self.table_cell = Some(String::new());
                if is_empty {
                    self.close_cell();
                }
            }
            _ => {}
        }
    }

    fn handle_close(&mut self, name: &[u8]) {
        match name {
            b"a:t" => self.in_text = false,
            b"a:p" => self.handle_paragraph_end(),
            b"p:sp" => self.handle_shape_end(),
            b"a:tc" if self.in_table => self.close_cell(),
            b"a:tr" if self.in_table => {
                let row = std::mem::take(&mut self.table_row);
                self.table_rows.push(row);
            }
            b"a:tbl" => self.handle_table_end(),
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.in_text {
            if let Some(paragraph) = self.paragraph.as_mut() {
                paragraph.text.push_str(text);
            }
        }
    }

    fn close_cell(&mut self) {
        let cell = self.table_cell.take().unwrap_or_default();
        self.table_row.push(cell);
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
        } else if let Some(shape) = self.shape.as_mut() {
            shape.paragraphs.push((paragraph.text, paragraph.bullet));
        } else {
            self.sink
                .push_text(ContentLabel::Text, &paragraph.text, Some(self.page));
        }
    }

    fn handle_shape_end(&mut self) {
        let Some(shape) = self.shape.take() else {
            return;
        };
        let page = Some(self.page);

        if let Some(label) = shape.title {
            let title = shape
                .paragraphs
                .iter()
                .map(|(text, _)| text.trim())
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            self.sink.push_heading(label, &title, 1, page);
            return;
        }

        for (text, bullet) in shape.paragraphs {
            let label = if bullet {
                ContentLabel::ListItem
            } else {
                ContentLabel::Text
            };
            self.sink.push_text(label, &text, page);
        }
    }

    fn handle_table_end(&mut self) {
        self.in_table = false;
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

/// Walk one slide, appending its items to `sink`
fn parse_slide_xml(
    xml: &str,
    entry: &str,
    page: usize,
    sink: &mut ItemSink,
) -> Result<(), PagewiseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut state = SlideState::new(sink, page);
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
            Err(e) => return Err(xml_error(entry, &reader, &e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Backend for `PowerPoint` presentations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PptxBackend;

impl PptxBackend {
    /// Create a new PPTX backend
    #[inline]
    #[must_use = "creates a PPTX backend"]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentBackend for PptxBackend {
    #[inline]
    fn format(&self) -> InputFormat {
        InputFormat::Pptx
    }

    fn parse_bytes(&self, data: &[u8], options: &BackendOptions) -> Result<Document, PagewiseError> {
        let mut archive = open_archive(Cursor::new(data), "PPTX")?;
        let paths = slide_paths(&mut archive)?;
        if paths.is_empty() {
            return Err(PagewiseError::BackendError(
                "No slides found in PPTX".to_string(),
            ));
        }

        let mut sink = ItemSink::new();
        let mut num_slides = 0;
        for (idx, path) in paths.iter().enumerate() {
            let slide_no = idx + 1;
            if !options.allows_page(slide_no) {
                log::debug!("PPTX: stopping at slide limit {slide_no}");
                break;
            }
            let xml = require_zip_entry(&mut archive, path)?;
            parse_slide_xml(&xml, path, slide_no, &mut sink)?;
            num_slides = slide_no;
        }
        log::debug!("PPTX: {} items from {num_slides} slide(s)", sink.len());

        Ok(Document::from_items(
            InputFormat::Pptx,
            sink.into_items(),
            DocumentMetadata {
                num_pages: Some(num_slides),
                ..DocumentMetadata::default()
            },
        ))
    }
}
