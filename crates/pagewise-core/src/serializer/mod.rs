//! Document serialization module
//!
//! This module provides serializers for converting `DocItem`s to text formats.

pub mod markdown;

pub use markdown::{render_table, MarkdownSerializer};
