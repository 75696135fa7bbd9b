//! Command-line interface for `pagewise` document ingest
//!
//! This crate provides the `pagewise` tool: it converts a list of PDF, DOCX,
//! PPTX and HTML files and writes one combined, page-wise text report with the
//! headings found on each page.
//!
//! # Quick Start
//!
//! ```bash
//! # Convert a few files into ./out_txt
//! pagewise --files report.pdf slides.pptx notes.docx
//!
//! # Choose the output directory and also write combined.json
//! pagewise --files *.pdf -o exports --json
//!
//! # Read the file list from stdin
//! find docs -name "*.docx" | pagewise --stdin
//! ```
//!
//! # Outputs
//!
//! - `combined.txt`: the page-wise report
//! - `_errors.txt`: one line per file that failed, or `No errors.`
//! - `combined.json`: with `--json`, sections and pages per converted file
//!
//! Both text files are written atomically. A failed conversion never changes
//! the exit code; only output directory or write failures do.
//!
//! # Configuration
//!
//! `~/.pagewise.toml` and `./.pagewise.toml` (or `--config <FILE>`):
//!
//! ```toml
//! [ingest]
//! out = "out_txt"
//! cpu_only = false
//! json = false
//! max_pages = 50
//! ```
//!
//! # Global Options
//!
//! - `-q, --quiet` - Hide the progress bar and warnings
//! - `-v, --verbose` - Debug logging
//! - `-h, --help` - Show help information
//! - `-V, --version` - Show version information

pub mod config;
pub mod ingest;

pub use config::{Config, IngestConfig, CONFIG_FILE_NAME, DEFAULT_OUT_DIR};
pub use ingest::{run_ingest, select_candidates, IngestOptions, IngestOutcome, COMBINED_JSON_FILE};
