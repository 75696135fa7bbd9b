//! Content item types for structured document representation
//!
//! Backends emit a flat, reading-order list of [`DocItem`]s. Each item carries a
//! structural [`ContentLabel`], optional classification labels, provenance
//! (page numbers) and, for tables, a [`TableData`] grid.

use serde::{Deserialize, Serialize};

use crate::serializer::markdown::render_table;

/// Classification label backends attach to heading-like items.
pub const HEADING_LABEL: &str = "heading";

/// Structural label for content items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentLabel {
    /// Regular paragraph text
    Paragraph,
    /// Section header/heading
    SectionHeader,
    /// Title (document or slide)
    Title,
    /// Table
    Table,
    /// List item
    ListItem,
    /// Code block
    Code,
    /// Caption (for tables, figures)
    Caption,
    /// Generic text (default)
    #[default]
    Text,
}

impl std::fmt::Display for ContentLabel {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Paragraph => "paragraph",
            Self::SectionHeader => "section_header",
            Self::Title => "title",
            Self::Table => "table",
            Self::ListItem => "list_item",
            Self::Code => "code",
            Self::Caption => "caption",
            Self::Text => "text",
        };
        write!(f, "{s}")
    }
}

/// Where an item came from in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceItem {
    /// Page number (1-based)
    pub page_no: usize,
}

/// Heading metadata an engine may attach instead of (or in addition to) text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Heading strings that apply to the item, outermost first
    #[serde(default)]
    pub headings: Vec<String>,
}

/// A single table cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text
    pub text: String,
    /// Whether the cell belongs to the header row
    #[serde(default)]
    pub column_header: bool,
}

/// Table grid with a fixed column count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    /// Number of rows
    pub num_rows: usize,
    /// Number of columns
    pub num_cols: usize,
    /// Row-major grid; every row has `num_cols` cells
    pub grid: Vec<Vec<TableCell>>,
}

impl TableData {
    /// Build a rectangular grid from ragged rows of cell text.
    ///
    /// Short rows are padded with empty cells. When `first_row_header` is set the
    /// cells of the first row are flagged as column headers.
    #[must_use = "builds a table grid from rows"]
    pub fn from_rows(rows: Vec<Vec<String>>, first_row_header: bool) -> Self {
        let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let grid: Vec<Vec<TableCell>> = rows
            .into_iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let mut cells: Vec<TableCell> = row
                    .into_iter()
                    .map(|text| TableCell {
                        text,
                        column_header: first_row_header && row_idx == 0,
                    })
                    .collect();
                cells.resize_with(num_cols, TableCell::default);
                cells
            })
            .collect();

        Self {
            num_rows: grid.len(),
            num_cols,
            grid,
        }
    }

    /// True when the grid has no cells with text
    #[inline]
    #[must_use = "returns whether the table has any content"]
    pub fn is_empty(&self) -> bool {
        self.grid
            .iter()
            .flatten()
            .all(|cell| cell.text.trim().is_empty())
    }
}

/// A content item produced by a backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocItem {
    /// JSON-pointer style reference (`#/texts/3`, `#/tables/0`)
    pub self_ref: String,
    /// Structural label
    pub label: ContentLabel,
    /// Classification labels, e.g. [`HEADING_LABEL`]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Provenance; the first entry decides the item's page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prov: Vec<ProvenanceItem>,
    /// Item text (empty for tables)
    #[serde(default)]
    pub text: String,
    /// Heading level (1 = top level)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
    /// Table grid for [`ContentLabel::Table`] items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TableData>,
    /// Engine-supplied heading metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ItemMeta>,
}

impl DocItem {
    /// Create a text-like item
    #[must_use = "creates a new content item"]
    pub fn new(self_ref: impl Into<String>, label: ContentLabel, text: impl Into<String>) -> Self {
        Self {
            self_ref: self_ref.into(),
            label,
            text: text.into(),
            ..Self::default()
        }
    }

    /// Create a heading item tagged with [`HEADING_LABEL`]
    #[must_use = "creates a new heading item"]
    pub fn heading(
        self_ref: impl Into<String>,
        label: ContentLabel,
        text: impl Into<String>,
        level: usize,
    ) -> Self {
        Self {
            labels: vec![HEADING_LABEL.to_string()],
            level: Some(level),
            ..Self::new(self_ref, label, text)
        }
    }

    /// Create a table item
    #[must_use = "creates a new table item"]
    pub fn table(self_ref: impl Into<String>, data: TableData) -> Self {
        Self {
            data: Some(data),
            ..Self::new(self_ref, ContentLabel::Table, String::new())
        }
    }

    /// Attach a page number
    #[must_use = "returns the item with provenance attached"]
    pub fn on_page(mut self, page_no: usize) -> Self {
        self.prov.push(ProvenanceItem { page_no });
        self
    }

    /// Attach heading metadata
    #[must_use = "returns the item with heading metadata attached"]
    pub fn with_meta_headings(mut self, headings: Vec<String>) -> Self {
        self.meta = Some(ItemMeta { headings });
        self
    }

    /// Page of the first provenance entry, if any
    #[inline]
    #[must_use = "returns the item's page number"]
    pub fn page_no(&self) -> Option<usize> {
        self.prov.first().map(|prov| prov.page_no)
    }

    /// Render a table item as a markdown pipe table.
    ///
    /// Returns `None` for non-table items and for tables without content.
    #[must_use = "returns the markdown export of a table item"]
    pub fn export_to_markdown(&self) -> Option<String> {
        let data = self.data.as_ref()?;
        if data.is_empty() {
            return None;
        }
        let md = render_table(data);
        (!md.trim().is_empty()).then_some(md)
    }
}
