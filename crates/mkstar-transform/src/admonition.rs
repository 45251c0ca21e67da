//! Material admonitions to Starlight asides.
//!
//! ```markdown
//! !!! warning "Careful"
//!
//!     Body
//! ```
//!
//! becomes
//!
//! ```markdown
//! :::caution[Careful]
//!
//!     Body
//! :::
//! ```

use std::fmt;

use crate::marker::{AdmonitionMarker, AdmonitionSyntax, Marker, parse_marker};
use crate::{Document, Node, Transform};

/// Starlight aside type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AsideKind {
    Note,
    Tip,
    Caution,
    Danger,
}

impl AsideKind {
    /// Map a Material admonition type keyword to an aside type.
    ///
    /// Matching is case-sensitive. Unknown keywords map to [`AsideKind::Note`].
    #[must_use]
    pub fn from_admonition_type(kind: &str) -> Self {
        match kind {
            "tip" | "success" => Self::Tip,
            "warning" => Self::Caution,
            "danger" | "failure" | "bug" => Self::Danger,
            // note, info, question, abstract, example, quote and anything else
            _ => Self::Note,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Caution => "caution",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for AsideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrites admonition and collapsible blocks into fenced asides.
///
/// A marker paragraph claims the next sibling when it is an indented code
/// block; otherwise the aside is rendered with no body.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdmonitionTransform;

impl AdmonitionTransform {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// One detected admonition, recorded before any mutation.
#[derive(Debug)]
struct AdmonitionMatch {
    marker_index: usize,
    content_index: Option<usize>,
    marker: AdmonitionMarker,
}

impl Transform for AdmonitionTransform {
    fn name(&self) -> &'static str {
        "admonitions"
    }

    fn apply(&self, doc: &mut Document) -> usize {
        let matches = collect_matches(doc);

        for m in matches.iter().rev() {
            let content = m
                .content_index
                .and_then(|i| doc.children()[i].as_code())
                .map(|code| code.value.as_str());
            let rendered = render_aside(&m.marker, content);
            let end = m.content_index.unwrap_or(m.marker_index);
            doc.replace_span(m.marker_index..end + 1, rendered);
        }

        matches.len()
    }
}

fn collect_matches(doc: &Document) -> Vec<AdmonitionMatch> {
    let children = doc.children();
    let mut matches = Vec::new();
    let mut i = 0;

    while i < children.len() {
        let marker = children[i]
            .as_paragraph()
            .and_then(|p| parse_marker(doc.paragraph_text(p)));

        let Some(Marker::Admonition(marker)) = marker else {
            i += 1;
            continue;
        };

        let content_index = children
            .get(i + 1)
            .and_then(Node::as_indented_code)
            .filter(|_| doc.followed_directly(i))
            .map(|_| i + 1);

        tracing::trace!(
            index = i,
            kind = %marker.kind,
            has_body = content_index.is_some(),
            "Found admonition"
        );

        matches.push(AdmonitionMatch {
            marker_index: i,
            content_index,
            marker,
        });
        i = content_index.map_or(i + 1, |c| c + 1);
    }

    matches
}

/// Render an aside, including the collapsible notice when needed.
///
/// Content lines are indented by four spaces; blank lines stay empty.
fn render_aside(marker: &AdmonitionMarker, content: Option<&str>) -> String {
    let mut out = String::new();

    match marker.syntax {
        AdmonitionSyntax::Collapsed => out.push_str(&collapsible_notice("collapsed")),
        AdmonitionSyntax::Expanded => out.push_str(&collapsible_notice("expanded")),
        AdmonitionSyntax::Standard => {}
    }

    out.push_str(":::");
    out.push_str(AsideKind::from_admonition_type(&marker.kind).as_str());
    if let Some(title) = &marker.title {
        out.push('[');
        out.push_str(title);
        out.push(']');
    }
    out.push('\n');

    if let Some(content) = content.filter(|c| !c.is_empty()) {
        out.push('\n');
        for line in content.lines() {
            if !line.trim().is_empty() {
                out.push_str("    ");
                out.push_str(line);
            }
            out.push('\n');
        }
    }

    out.push_str(":::");
    out
}

/// Starlight has no collapsible aside; say so instead of dropping the state.
fn collapsible_notice(state: &str) -> String {
    format!(
        "<!-- Material MkDocs collapsible block (initially {state}) converted to regular aside -->\n"
    )
}
