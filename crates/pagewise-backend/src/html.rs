//! HTML document parser
//!
//! Walks `<body>` in document order. Headings, paragraphs, lists, tables and
//! `<pre>` blocks become items; loose inline text inside container elements is
//! gathered into paragraphs. HTML has no pages, so items carry no provenance.

use crate::traits::{BackendOptions, DocumentBackend};
use crate::utils::{normalize_whitespace, ItemSink};
use pagewise_core::{ContentLabel, DocItem, Document, DocumentMetadata, InputFormat, PagewiseError, TableData};
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose content never reaches the output
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "head", "noscript", "template", "title", "meta", "link", "svg", "iframe",
];

/// Elements treated as inline text
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "del", "dfn", "em", "font", "i",
    "ins", "kbd", "label", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup",
    "time", "u", "var", "wbr", "br", "img",
];

/// Heading level of `h1`..`h6`
fn heading_level(name: &str) -> Option<usize> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Text of an element with `<br>` as line breaks and skipped elements removed
fn inline_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_inline_text(el, &mut out);
    out
}

fn collect_inline_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                let name = element.name();
                if name == "br" {
                    out.push('\n');
                } else if !SKIPPED_ELEMENTS.contains(&name) {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        collect_inline_text(child_el, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Alternative heading text for headings without text (image `alt`, `title`)
fn heading_fallback(el: ElementRef<'_>) -> Option<String> {
    let title = el.value().attr("title").map(str::to_string);
    let alt = el
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|d| d.value().name() == "img")
        .find_map(|img| img.value().attr("alt").map(str::to_string));
    alt.or(title)
        .map(|t| normalize_whitespace(&t))
        .filter(|t| !t.is_empty())
}

/// Walks the DOM and feeds an [`ItemSink`]
struct HtmlWalker {
    sink: ItemSink,
    pending: String,
}

impl HtmlWalker {
    fn new() -> Self {
        Self {
            sink: ItemSink::new(),
            pending: String::new(),
        }
    }

    fn flush_pending(&mut self) {
        let text = normalize_whitespace(&self.pending);
        self.pending.clear();
        self.sink.push_text(ContentLabel::Text, &text, None);
    }

    fn walk_container(&mut self, el: ElementRef<'_>) {
        for child in el.children() {
            match child.value() {
                Node::Text(text) => self.pending.push_str(text),
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        self.visit_element(child_el);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_element(&mut self, el: ElementRef<'_>) {
        let name = el.value().name();

        if SKIPPED_ELEMENTS.contains(&name) {
            return;
        }
        if INLINE_ELEMENTS.contains(&name) {
            if name == "br" {
                self.pending.push('\n');
            } else {
                self.pending.push_str(&inline_text(el));
            }
            return;
        }

        self.flush_pending();

        if let Some(rank) = heading_level(name) {
            self.visit_heading(el, rank);
            return;
        }

        match name {
            "p" | "address" | "dt" | "dd" | "figcaption" | "summary" => {
                let label = if name == "figcaption" {
                    ContentLabel::Caption
                } else {
                    ContentLabel::Paragraph
                };
                self.sink
                    .push_text(label, &normalize_whitespace(&inline_text(el)), None);
            }
            "ul" | "ol" => self.visit_list(el),
            "table" => self.visit_table(el),
            "pre" => {
                let code = inline_text(el);
                if !code.trim().is_empty() {
                    self.sink.push(
                        DocItem::new(String::new(), ContentLabel::Code, code.trim_end()),
                        None,
                    );
                }
            }
            _ => {
                self.walk_container(el);
                self.flush_pending();
            }
        }
    }

    /// `h1` is the title; `h2`..`h6` are section headers of level 1..5
    fn visit_heading(&mut self, el: ElementRef<'_>, rank: usize) {
        let (label, level) = if rank == 1 {
            (ContentLabel::Title, 1)
        } else {
            (ContentLabel::SectionHeader, rank - 1)
        };
        let text = normalize_whitespace(&inline_text(el));
        if !text.is_empty() {
            self.sink.push_heading(label, &text, level, None);
        } else if let Some(fallback) = heading_fallback(el) {
            let mut item =
                DocItem::new(String::new(), label, String::new()).with_meta_headings(vec![fallback]);
            item.level = Some(level);
            self.sink.push(item, None);
        }
    }

    fn visit_list(&mut self, list: ElementRef<'_>) {
        for item in list.children().filter_map(ElementRef::wrap) {
            if item.value().name() != "li" {
                continue;
            }
            let mut own = String::new();
            let mut nested = Vec::new();
            for child in item.children() {
                match child.value() {
                    Node::Text(text) => own.push_str(text),
                    Node::Element(element) => {
                        if let Some(child_el) = ElementRef::wrap(child) {
                            if matches!(element.name(), "ul" | "ol") {
                                nested.push(child_el);
                            } else if element.name() == "br" {
                                own.push('\n');
                            } else if !SKIPPED_ELEMENTS.contains(&element.name()) {
                                own.push_str(&inline_text(child_el));
                                own.push(' ');
                            }
                        }
                    }
                    _ => {}
                }
            }
            self.sink
                .push_text(ContentLabel::ListItem, &normalize_whitespace(&own), None);
            for nested_list in nested {
                self.visit_list(nested_list);
            }
        }
    }

    fn visit_table(&mut self, table: ElementRef<'_>) {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut header = false;
        let mut caption = None;
        collect_rows(table, &mut rows, &mut header, &mut caption);

        if let Some(caption) = caption {
            self.sink.push_text(ContentLabel::Caption, &caption, None);
        }
        if rows.is_empty() {
            return;
        }
        let data = TableData::from_rows(rows, header);
        if !data.is_empty() {
            self.sink.push(DocItem::table(String::new(), data), None);
        }
    }

    fn into_items(mut self) -> Vec<DocItem> {
        self.flush_pending();
        self.sink.into_items()
    }
}

/// Maximum `colspan` honoured when expanding cells
const MAX_COLSPAN: usize = 64;

fn collect_rows(
    el: ElementRef<'_>,
    rows: &mut Vec<Vec<String>>,
    header: &mut bool,
    caption: &mut Option<String>,
) {
    for child in el.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "thead" | "tbody" | "tfoot" => collect_rows(child, rows, header, caption),
            "caption" => {
                let text = normalize_whitespace(&inline_text(child));
                if !text.is_empty() {
                    *caption = Some(text);
                }
            }
            "tr" => {
                let mut row = Vec::new();
                for cell in child.children().filter_map(ElementRef::wrap) {
                    let cell_name = cell.value().name();
                    if cell_name != "td" && cell_name != "th" {
                        continue;
                    }
                    if rows.is_empty() && cell_name == "th" {
                        *header = true;
                    }
                    let text = normalize_whitespace(&inline_text(cell));
                    let span = cell
                        .value()
                        .attr("colspan")
                        .and_then(|s| s.trim().parse::<usize>().ok())
                        .unwrap_or(1)
                        .clamp(1, MAX_COLSPAN);
                    for _ in 0..span {
                        row.push(text.clone());
                    }
                }
                if !row.is_empty() {
                    rows.push(row);
                }
            }
            _ => {}
        }
    }
}

/// Backend for HTML pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlBackend;

impl HtmlBackend {
    /// Create a new HTML backend
    #[inline]
    #[must_use = "creates an HTML backend"]
    pub const fn new() -> Self {
        Self
    }

    fn extract_title(document: &Html) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        document
            .select(&selector)
            .next()
            .map(|title| normalize_whitespace(&title.text().collect::<String>()))
            .filter(|title| !title.is_empty())
    }
}

impl DocumentBackend for HtmlBackend {
    #[inline]
    fn format(&self) -> InputFormat {
        InputFormat::Html
    }

    fn parse_bytes(&self, data: &[u8], _options: &BackendOptions) -> Result<Document, PagewiseError> {
        let content = match std::str::from_utf8(data) {
            Ok(content) => content.to_string(),
            Err(e) => {
                log::warn!("HTML is not valid UTF-8 ({e}); decoding lossily");
                String::from_utf8_lossy(data).into_owned()
            }
        };

        let document = Html::parse_document(&content);
        let body_selector = Selector::parse("body")
            .map_err(|e| PagewiseError::BackendError(format!("Invalid selector: {e}")))?;

        let mut walker = HtmlWalker::new();
        if let Some(body) = document.select(&body_selector).next() {
            walker.walk_container(body);
        }
        let items = walker.into_items();
        log::debug!("HTML: {} items", items.len());

        Ok(Document::from_items(
            InputFormat::Html,
            items,
            DocumentMetadata {
                title: Self::extract_title(&document),
                ..DocumentMetadata::default()
            },
        ))
    }
}
