//! Marker line grammar.
//!
//! A marker is the single line that opens a Material block:
//!
//! - `!!! type "title"`: admonition
//! - `??? type "title"`: collapsible admonition, initially collapsed
//! - `???+ type "title"`: collapsible admonition, initially expanded
//! - `=== "label"`: content tab
//!
//! Detection is line-exact: the whole trimmed text must match.

use std::sync::LazyLock;

use regex::Regex;

static ADMONITION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\?\?\?\+?|!!!)\s+([A-Za-z0-9_]+)(?:\s+"([^"]*)")?$"#)
        .expect("invalid admonition regex")
});

static TAB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^===\s+"([^"]*)"$"#).expect("invalid tab regex"));

/// Opening syntax of an admonition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmonitionSyntax {
    /// `!!!`
    Standard,
    /// `???`
    Collapsed,
    /// `???+`
    Expanded,
}

impl AdmonitionSyntax {
    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "???" => Self::Collapsed,
            "???+" => Self::Expanded,
            _ => Self::Standard,
        }
    }

    /// Whether the block was written with the question-mark syntax.
    #[must_use]
    pub fn is_collapsible(self) -> bool {
        matches!(self, Self::Collapsed | Self::Expanded)
    }
}

/// Parsed admonition marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdmonitionMarker {
    pub syntax: AdmonitionSyntax,
    /// Source type keyword (`note`, `warning`, ...), unmapped.
    pub kind: String,
    /// Quoted title; an empty `""` title is treated as absent.
    pub title: Option<String>,
}

/// Parsed tab marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabMarker {
    pub label: String,
}

/// A recognized marker line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Marker {
    Admonition(AdmonitionMarker),
    Tab(TabMarker),
}

/// Parse the text content of a paragraph as a marker.
///
/// Returns `None` unless the entire trimmed text is a marker.
///
/// # Example
///
/// ```
/// use mkstar_transform::{AdmonitionSyntax, Marker, parse_marker};
///
/// let Some(Marker::Admonition(marker)) = parse_marker(r#"??? tip "Hint""#) else {
///     panic!("expected an admonition marker");
/// };
/// assert_eq!(marker.syntax, AdmonitionSyntax::Collapsed);
/// assert_eq!(marker.kind, "tip");
/// assert_eq!(marker.title.as_deref(), Some("Hint"));
///
/// assert!(parse_marker("!!! note and more words").is_none());
/// ```
#[must_use]
pub fn parse_marker(text: &str) -> Option<Marker> {
    let trimmed = text.trim();

    if let Some(caps) = ADMONITION_PATTERN.captures(trimmed) {
        return Some(Marker::Admonition(AdmonitionMarker {
            syntax: AdmonitionSyntax::from_prefix(&caps[1]),
            kind: caps[2].to_owned(),
            title: caps
                .get(3)
                .map(|m| m.as_str())
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
        }));
    }

    TAB_PATTERN.captures(trimmed).map(|caps| {
        Marker::Tab(TabMarker {
            label: caps[1].to_owned(),
        })
    })
}
