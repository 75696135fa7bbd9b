//! # Pagewise Core
//!
//! Content model and page-wise aggregation for the pagewise ingest pipeline.
//!
//! Backends (see the `pagewise-backend` crate) turn PDF, DOCX, PPTX and HTML
//! files into a flat list of [`DocItem`]s. This crate groups those items by page
//! and by heading, and renders the combined text report.
//!
//! ## Quick Start
//!
//! ```rust
//! use pagewise_core::{aggregate, ContentLabel, DocItem, IngestResult, ReportBuilder};
//!
//! let items = vec![
//!     DocItem::heading("#/texts/0", ContentLabel::SectionHeader, "1. Scope", 1).on_page(1),
//!     DocItem::new("#/texts/1", ContentLabel::Text, "This document covers...").on_page(1),
//! ];
//!
//! let (sections, pages) = aggregate("manual.pdf", &items);
//! let result = IngestResult { markdown: String::new(), sections, pages };
//!
//! let mut report = ReportBuilder::new(1);
//! report.add_file("manual.pdf", &result);
//! let text = report.finish(0);
//! assert!(text.contains("Headings: H2: 1. Scope"));
//! ```

pub mod aggregate;
pub mod content;
pub mod document;
pub mod error;
pub mod format;
pub mod fs;
pub mod heading;
pub mod report;
pub mod serializer;

pub use aggregate::*;
pub use content::*;
pub use document::*;
pub use error::*;
pub use format::*;
pub use heading::*;
pub use report::*;
pub use serializer::*;
