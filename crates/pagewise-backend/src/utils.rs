//! Shared utility functions for backend implementations.

use pagewise_core::{ContentLabel, DocItem, PagewiseError};
use quick_xml::events::BytesStart;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Collects items in reading order and assigns their `self_ref`s.
///
/// Tables are numbered `#/tables/N`, everything else `#/texts/N`.
#[derive(Debug, Default)]
pub struct ItemSink {
    items: Vec<DocItem>,
    text_count: usize,
    table_count: usize,
}

impl ItemSink {
    /// Create an empty sink
    #[inline]
    #[must_use = "creates an empty item sink"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, numbering it and attaching `page` as provenance
    pub fn push(&mut self, mut item: DocItem, page: Option<usize>) {
        item.self_ref = if item.label == ContentLabel::Table {
            self.table_count += 1;
            format!("#/tables/{}", self.table_count - 1)
        } else {
            self.text_count += 1;
            format!("#/texts/{}", self.text_count - 1)
        };
        if let Some(page) = page {
            item = item.on_page(page);
        }
        self.items.push(item);
    }

    /// Append a text-like item unless its text is blank
    pub fn push_text(&mut self, label: ContentLabel, text: &str, page: Option<usize>) {
        let text = text.trim();
        if !text.is_empty() {
            self.push(DocItem::new(String::new(), label, text), page);
        }
    }

    /// Append a heading item unless its text is blank
    pub fn push_heading(&mut self, label: ContentLabel, text: &str, level: usize, page: Option<usize>) {
        let text = text.trim();
        if !text.is_empty() {
            self.push(DocItem::heading(String::new(), label, text, level), page);
        }
    }

    /// Number of items collected so far
    #[inline]
    #[must_use = "returns the number of collected items"]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were collected
    #[inline]
    #[must_use = "returns whether the sink is empty"]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the sink and return the items
    #[inline]
    #[must_use = "returns the collected items"]
    pub fn into_items(self) -> Vec<DocItem> {
        self.items
    }
}

/// Open a ZIP container (DOCX, PPTX)
///
/// # Errors
///
/// Returns a backend error naming `kind` if the data is not a ZIP archive.
pub fn open_archive<R: Read + Seek>(reader: R, kind: &str) -> Result<ZipArchive<R>, PagewiseError> {
    ZipArchive::new(reader)
        .map_err(|e| PagewiseError::BackendError(format!("Failed to open {kind} as ZIP: {e}")))
}

/// Read a UTF-8 entry from a ZIP archive; `Ok(None)` when the entry is absent.
///
/// # Errors
///
/// Returns a backend error if the entry exists but cannot be read.
pub fn read_zip_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, PagewiseError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(PagewiseError::BackendError(format!(
                "Failed to read {name}: {e}"
            )))
        }
    };
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| PagewiseError::BackendError(format!("Failed to read {name}: {e}")))?;
    Ok(Some(content))
}

/// Read a required UTF-8 entry from a ZIP archive
///
/// # Errors
///
/// Returns a backend error if the entry is missing or unreadable.
pub fn require_zip_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, PagewiseError> {
    read_zip_entry(archive, name)?
        .ok_or_else(|| PagewiseError::BackendError(format!("Missing {name} in archive")))
}

/// Get an attribute value from an XML start tag by qualified name
#[must_use = "returns the attribute value if present"]
pub fn attr_value(e: &BytesStart<'_>, reader: &Reader<&[u8]>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.decode_and_unescape_value(reader).ok())
        .map(std::borrow::Cow::into_owned)
}

/// Collapse runs of whitespace to single spaces and trim
#[must_use = "returns the normalized text"]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap a quick-xml error with the entry it came from
#[must_use = "returns the wrapped error"]
pub fn xml_error(entry: &str, reader: &Reader<&[u8]>, err: &quick_xml::Error) -> PagewiseError {
    PagewiseError::BackendError(format!(
        "XML error in {entry} at position {}: {err}",
        reader.buffer_position()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewise_core::is_heading;
    use std::io::{Cursor, Write};

    #[test]
    fn test_item_sink_numbers_texts_and_tables() {
        let mut sink = ItemSink::new();
        sink.push_text(ContentLabel::Text, " a ", Some(1));
        sink.push_text(ContentLabel::Text, "   ", Some(1));
        sink.push(
            DocItem::table(String::new(), pagewise_core::TableData::default()),
            None,
        );
        sink.push_heading(ContentLabel::SectionHeader, "b", 2, Some(2));
        assert_eq!(sink.len(), 3);

        let items = sink.into_items();
        assert_eq!(items[0].self_ref, "#/texts/0");
        assert_eq!(items[0].text, "a");
        assert_eq!(items[0].page_no(), Some(1));
        assert_eq!(items[1].self_ref, "#/tables/0");
        assert_eq!(items[1].page_no(), None);
        assert_eq!(items[2].self_ref, "#/texts/1");
        assert!(is_heading(&items[2]));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_read_zip_entry() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("a.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<a/>").unwrap();
            zip.finish().unwrap();
        }
        buf.set_position(0);
        let mut archive = open_archive(buf, "TEST").unwrap();
        assert_eq!(read_zip_entry(&mut archive, "a.xml").unwrap().as_deref(), Some("<a/>"));
        assert_eq!(read_zip_entry(&mut archive, "b.xml").unwrap(), None);
        assert!(require_zip_entry(&mut archive, "b.xml").is_err());
    }

    #[test]
    fn test_open_archive_rejects_garbage() {
        let err = open_archive(Cursor::new(b"not a zip".to_vec()), "DOCX").unwrap_err();
        assert!(err.to_string().contains("Failed to open DOCX as ZIP"));
    }

    #[test]
    fn test_attr_value() {
        let xml = r#"<w:pStyle w:val="Heading1"/>"#;
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        match reader.read_event_into(&mut buf).unwrap() {
            quick_xml::events::Event::Empty(e) => {
                assert_eq!(attr_value(&e, &reader, b"w:val").as_deref(), Some("Heading1"));
                assert_eq!(attr_value(&e, &reader, b"w:other"), None);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
