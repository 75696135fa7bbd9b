//! Converted document representation

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::content::DocItem;
use crate::format::InputFormat;
use crate::serializer::MarkdownSerializer;

/// A converted document: flat item list plus its markdown export.
///
/// # Examples
///
/// ```
/// use pagewise_core::{ContentLabel, DocItem, Document, DocumentMetadata, InputFormat};
///
/// let items = vec![
///     DocItem::new("#/texts/0", ContentLabel::Title, "Guide"),
///     DocItem::heading("#/texts/1", ContentLabel::SectionHeader, "1. Setup", 1),
///     DocItem::new("#/texts/2", ContentLabel::Text, "Unzip it."),
/// ];
/// let doc = Document::from_items(InputFormat::Html, items, DocumentMetadata::default());
///
/// assert_eq!(doc.markdown, "# Guide\n\n## 1. Setup\n\nUnzip it.");
/// assert_eq!(doc.metadata.num_characters, doc.markdown.chars().count());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Markdown representation of the document
    pub markdown: String,

    /// Input format of the source file
    pub format: InputFormat,

    /// Document metadata
    pub metadata: DocumentMetadata,

    /// Content items in reading order
    pub items: Vec<DocItem>,
}

/// Document metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Number of pages (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_pages: Option<usize>,

    /// Total character count of the markdown export
    #[serde(default)]
    pub num_characters: usize,

    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Document {
    /// Build a document from items, rendering the markdown export.
    ///
    /// `metadata.num_characters` is recomputed from the export.
    #[must_use = "creates a document from content items"]
    pub fn from_items(format: InputFormat, items: Vec<DocItem>, metadata: DocumentMetadata) -> Self {
        let markdown = MarkdownSerializer::new().serialize(&items);
        let num_characters = markdown.chars().count();
        Self {
            markdown,
            format,
            metadata: DocumentMetadata {
                num_characters,
                ..metadata
            },
            items,
        }
    }
}

/// Result of converting one input file
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// The converted document
    pub document: Document,
    /// Wall-clock time spent in the backend
    pub latency: Duration,
}
