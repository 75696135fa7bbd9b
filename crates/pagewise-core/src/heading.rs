//! Heading level heuristics
//!
//! The level is a display tag only (`H1`/`H2`/`H3` in the report); it never
//! affects how content is grouped.

use serde::{Deserialize, Serialize};

/// Longest text that can still count as an all-caps `H1` banner
pub const MAX_H1_CHARS: usize = 40;

/// Coarse heading level derived from heading text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Short all-caps banner
    H1,
    /// Numbered or ordinary heading
    H2,
    /// Heading glued to a leading digit (`2Test`)
    H3,
}

impl std::fmt::Display for HeadingLevel {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
        };
        write!(f, "{s}")
    }
}

/// Guess a heading level from its text.
///
/// Rules, first match wins:
/// 1. blank text → `H2`
/// 2. at most [`MAX_H1_CHARS`] characters, unchanged by upper-casing and
///    containing a letter → `H1`
/// 3. first whitespace-delimited token, with trailing dots removed, is all
///    digits (`1.`, `12`, `3...`) → `H2`
/// 4. first character is a digit → `H3`
/// 5. otherwise → `H2`
///
/// # Examples
///
/// ```
/// use pagewise_core::{guess_heading_level, HeadingLevel};
///
/// assert_eq!(guess_heading_level("EXECUTIVE SUMMARY"), HeadingLevel::H1);
/// assert_eq!(guess_heading_level("1. Scope"), HeadingLevel::H2);
/// assert_eq!(guess_heading_level("2Test"), HeadingLevel::H3);
/// assert_eq!(guess_heading_level(""), HeadingLevel::H2);
/// ```
#[must_use = "returns the guessed heading level"]
pub fn guess_heading_level(text: &str) -> HeadingLevel {
    let t = text.trim();
    if t.is_empty() {
        return HeadingLevel::H2;
    }

    if t.chars().count() <= MAX_H1_CHARS
        && t.to_uppercase() == t
        && t.chars().any(char::is_alphabetic)
    {
        return HeadingLevel::H1;
    }

    if t.split_whitespace()
        .next()
        .map(|token| token.trim_end_matches('.'))
        .is_some_and(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
    {
        return HeadingLevel::H2;
    }

    if t.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return HeadingLevel::H3;
    }

    HeadingLevel::H2
}

/// Format the per-page heading entry, e.g. `"H2: 1. Scope"`.
#[inline]
#[must_use = "returns the formatted heading entry"]
pub fn format_heading(text: &str) -> String {
    format!("{}: {text}", guess_heading_level(text))
}
