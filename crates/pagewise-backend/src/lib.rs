//! Document format backends for `pagewise`
//!
//! Parses PDF, DOCX, PPTX and HTML files into [`pagewise_core::Document`]s with
//! a flat, reading-order item list, and adapts a conversion into the page and
//! section records the report is built from.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              convert_to_sections             │
//! │   (never fails: error becomes a string)      │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │              DocumentConverter               │
//! │   (extension -> backend, latency timing)     │
//! └──────────────────────────────────────────────┘
//!                        │
//!     ┌─────────────┬────┴────────┬─────────────┐
//!     ▼             ▼             ▼             ▼
//! ┌─────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐
//! │   PDF   │  │   DOCX   │  │   PPTX   │  │   HTML   │
//! │ (lopdf) │  │(zip+xml) │  │(zip+xml) │  │(scraper) │
//! └─────────┘  └──────────┘  └──────────┘  └──────────┘
//! ```
//!
//! # Page numbers
//!
//! | Format | Page source |
//! |--------|-------------|
//! | PDF | physical page |
//! | DOCX | explicit page breaks (`w:br w:type="page"`) |
//! | PPTX | slide number |
//! | HTML | none (everything lands on page 1) |
//!
//! # Usage
//!
//! ```no_run
//! use pagewise_backend::{convert_to_sections, DocumentConverter};
//! use std::path::Path;
//!
//! let converter = DocumentConverter::new();
//! let (result, error) = convert_to_sections(&converter, Path::new("report.pdf"));
//! match error {
//!     Some(message) => eprintln!("{message}"),
//!     None => println!("{} pages", result.pages.len()),
//! }
//! ```

pub mod adapter;
pub mod converter;
pub mod docx;
pub mod html;
pub mod pdf;
pub mod pptx;
pub mod traits;
pub mod utils;

pub use adapter::{convert_to_sections, doc_name};
pub use converter::DocumentConverter;
pub use docx::DocxBackend;
pub use html::HtmlBackend;
pub use pdf::PdfBackend;
pub use pptx::PptxBackend;
pub use traits::{BackendOptions, DocumentBackend};
