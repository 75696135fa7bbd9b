//! Markdown serializer for flat item lists

use crate::content::{ContentLabel, DocItem, TableData};

/// Serializes a reading-order list of [`DocItem`]s to markdown.
///
/// Titles become `#`, section headers `#` repeated `level + 1` times (capped at
/// six), list items `- ` bullets, code blocks fenced blocks and tables pipe
/// tables. Consecutive list items are kept on adjacent lines; every other block
/// is separated by a blank line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkdownSerializer;

impl MarkdownSerializer {
    /// Create a new markdown serializer
    #[inline]
    #[must_use = "creates a markdown serializer"]
    pub const fn new() -> Self {
        Self
    }

    /// Serialize items to markdown
    #[must_use = "returns the markdown representation of the items"]
    pub fn serialize(&self, items: &[DocItem]) -> String {
        let mut parts: Vec<(String, bool)> = Vec::new(); // (content, is_list_item)

        for item in items {
            if let Some(block) = Self::serialize_item(item) {
                parts.push((block, item.label == ContentLabel::ListItem));
            }
        }

        let mut result = String::new();
        for (idx, (content, is_list_item)) in parts.iter().enumerate() {
            if idx > 0 {
                let prev_is_list = parts[idx - 1].1;
                result.push_str(if prev_is_list && *is_list_item {
                    "\n"
                } else {
                    "\n\n"
                });
            }
            result.push_str(content);
        }
        result
    }

    fn serialize_item(item: &DocItem) -> Option<String> {
        if item.label == ContentLabel::Table {
            return item
                .data
                .as_ref()
                .filter(|data| !data.is_empty())
                .map(|data| render_table(data).trim_end().to_string());
        }

        let text = item.text.trim();
        if text.is_empty() {
            return None;
        }

        let block = match item.label {
            ContentLabel::Title => format!("# {text}"),
            ContentLabel::SectionHeader => {
                let hashes = item.level.unwrap_or(1).saturating_add(1).clamp(2, 6);
                format!("{} {text}", "#".repeat(hashes))
            }
            ContentLabel::ListItem => format!("- {text}"),
            ContentLabel::Code => format!("```\n{}\n```", item.text.trim_end()),
            ContentLabel::Caption => format!("*{text}*"),
            ContentLabel::Paragraph | ContentLabel::Text | ContentLabel::Table => text.to_string(),
        };
        Some(block)
    }
}

/// Render table as markdown
///
/// Column widths follow the tabulate convention: text columns are
/// `max(header + 2, data)` wide and left-aligned, numeric columns (every data
/// cell parses as a number) are `max(header, data) + 2` wide and right-aligned.
#[must_use = "returns the markdown representation of the table"]
pub fn render_table(data: &TableData) -> String {
    use std::fmt::Write;

    if data.grid.is_empty() || data.num_cols == 0 {
        return String::new();
    }

    let num_cols = data.num_cols;

    let mut col_is_numeric = vec![false; num_cols];
    if data.grid.len() > 1 {
        for (col_idx, is_numeric) in col_is_numeric.iter_mut().enumerate() {
            *is_numeric = data.grid[1..].iter().all(|row| {
                row.get(col_idx).is_some_and(|cell| {
                    let text = cell.text.trim();
                    !text.is_empty() && text.parse::<f64>().is_ok()
                })
            });
        }
    }

    let mut col_widths = vec![0_usize; num_cols];
    for row in &data.grid {
        for (col_idx, cell) in row.iter().take(num_cols).enumerate() {
            col_widths[col_idx] = col_widths[col_idx].max(cell.text.chars().count());
        }
    }
    for (col_idx, cell) in data.grid[0].iter().take(num_cols).enumerate() {
        let header_len = cell.text.chars().count();
        col_widths[col_idx] = if col_is_numeric[col_idx] {
            col_widths[col_idx].max(header_len) + 2
        } else {
            col_widths[col_idx].max(header_len + 2)
        };
    }

    let mut result = String::new();
    for (row_idx, row) in data.grid.iter().enumerate() {
        result.push('|');
        for (col_idx, cell) in row.iter().take(num_cols).enumerate() {
            let width = col_widths[col_idx];
            // Cell text must stay on one line inside a pipe table
            let text = cell.text.replace('\n', " ");
            if col_is_numeric[col_idx] {
                let _ = write!(result, " {text:>width$} |");
            } else {
                let _ = write!(result, " {text:<width$} |");
            }
        }
        result.push('\n');

        if row_idx == 0 {
            result.push('|');
            for width in &col_widths {
                result.push_str(&"-".repeat(width + 2));
                result.push('|');
            }
            result.push('\n');
        }
    }

    result
}
