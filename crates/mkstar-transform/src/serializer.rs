//! Markdown serializer for [`Document`] trees.
//!
//! Nodes that still map to source text are written back verbatim, so the
//! serializer never introduces escapes or character references into content
//! it did not touch. Spacing rules:
//!
//! - between two untouched nodes the original source gap is kept as is;
//! - a literal (rendered) node is separated from its neighbours by exactly one
//!   blank line, keeping any non-whitespace text (link reference definitions)
//!   that sat in the gap;
//! - the output ends with a newline if and only if the input did.
//!
//! Indented code blocks are written as backtick fences, since MDX has no
//! indented code. The exception is the indented body of an aside written by
//! an earlier run (`:::note`, blank line, indented body, `:::`), which is
//! kept as is so that converted output converts to itself.

use std::borrow::Cow;

use crate::{CodeBlock, CodeKind, Document, Node};

/// Serialize a [`Document`] back to markdown text.
#[derive(Clone, Copy, Debug, Default)]
pub struct Serializer;

impl Serializer {
    /// Create a new serializer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the document.
    #[must_use]
    pub fn serialize(&self, doc: &Document) -> String {
        let source = doc.source();
        let children = doc.children();

        let (Some(first), Some(last)) = (children.first(), children.last()) else {
            // Nothing parsed into blocks: keep stray text such as reference
            // definitions, drop pure whitespace.
            return if source.trim().is_empty() {
                String::new()
            } else {
                source.to_owned()
            };
        };

        let mut out = String::with_capacity(source.len() + 64);

        if let Some(span) = first.span() {
            let lead = source.get(..span.start).unwrap_or_default();
            if !lead.trim().is_empty() {
                if first.is_literal() {
                    out.push_str(lead.trim());
                    out.push_str("\n\n");
                } else {
                    out.push_str(lead);
                }
            }
        }

        let mut open_asides = 0;
        for (index, node) in children.iter().enumerate() {
            if index > 0 {
                write_separator(source, &children[index - 1], node, &mut out);
            }
            write_node(doc, node, open_asides > 0, &mut out);
            if let Node::Paragraph(p) = node {
                open_asides = track_asides(doc.paragraph_text(p), open_asides);
            }
        }

        let tail = last
            .span()
            .and_then(|span| source.get(span.end..))
            .unwrap_or_default();
        if tail.trim().is_empty() {
            if source.ends_with('\n') {
                out.push('\n');
            }
        } else if last.is_literal() {
            out.push_str("\n\n");
            out.push_str(tail.trim_start());
        } else {
            out.push_str(tail);
        }

        out
    }
}

fn write_separator(source: &str, prev: &Node, next: &Node, out: &mut String) {
    let gap = match (prev.span(), next.span()) {
        (Some(a), Some(b)) => source.get(a.end..b.start),
        _ => None,
    };

    match gap {
        Some(gap) if !prev.is_literal() && !next.is_literal() => out.push_str(gap),
        Some(gap) if !gap.trim().is_empty() => {
            out.push_str("\n\n");
            out.push_str(gap.trim());
            out.push_str("\n\n");
        }
        _ => out.push_str("\n\n"),
    }
}

fn write_node(doc: &Document, node: &Node, in_aside: bool, out: &mut String) {
    match node {
        Node::Literal(literal) => out.push_str(&literal.value),
        Node::Paragraph(p) => match &p.span {
            Some(span) => out.push_str(doc.slice(span)),
            None => out.push_str(&restore_literal_text(&p.text)),
        },
        Node::Code(code) => match &code.span {
            Some(span) if code.kind == CodeKind::Fenced || in_aside => {
                out.push_str(doc.slice(span));
            }
            _ => write_fenced_code(code, out),
        },
        Node::Opaque(opaque) => out.push_str(doc.slice(&opaque.span)),
    }
}

/// Update the count of asides left open after a paragraph.
///
/// A line `:::type` or `:::type[title]` opens an aside, a bare `:::` closes one.
fn track_asides(text: &str, open: usize) -> usize {
    text.lines().map(str::trim).fold(open, |open, line| {
        if line == ":::" {
            open.saturating_sub(1)
        } else if line.len() > 3 && line.starts_with(":::") {
            open + 1
        } else {
            open
        }
    })
}

/// Write a code block as a backtick fence longer than any backtick run inside it.
fn write_fenced_code(code: &CodeBlock, out: &mut String) {
    let longest_run = code
        .value
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);

    out.push_str(&fence);
    if let Some(lang) = &code.lang {
        out.push_str(lang);
    }
    out.push('\n');
    if !code.value.is_empty() {
        out.push_str(&code.value);
        out.push('\n');
    }
    out.push_str(&fence);
}

/// Revert escapes a generic markdown writer would add to inline text.
///
/// Text is written exactly as stored: bracket escapes and encoded spaces are
/// turned back into their literal characters.
fn restore_literal_text(text: &str) -> Cow<'_, str> {
    if !text.contains("&#x20;") && !text.contains("\\[") && !text.contains("\\]") {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("&#x20;", " ")
            .replace("\\[", "[")
            .replace("\\]", "]"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CodeKind, Paragraph};
    use pretty_assertions::assert_eq;

    fn round_trip(input: &str) -> String {
        Serializer::new().serialize(&Document::parse(input))
    }

    #[test]
    fn test_round_trip_is_verbatim() {
        let input = "---\ntitle: Guide\n---\n\n# Title\n\nRegular paragraph with **bold** and *italic*.\n\n* List item 1\n* List item 2\n\n```javascript\nconst code = 'preserved';\n```\n\n> Blockquote is preserved too.\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn test_round_trip_keeps_escapes_and_entities() {
        let input = "Text with \\[brackets\\] and &amp; entity\n";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn test_round_trip_keeps_reference_definitions() {
        let input = "[ref]: https://example.com\n\nSee [ref].\n\n[other]: https://example.org\n";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn test_trailing_newline_follows_input() {
        assert_eq!(round_trip("Text"), "Text");
        assert_eq!(round_trip("Text\n"), "Text\n");
        assert_eq!(round_trip("Text\n\n\n"), "Text\n");
    }

    #[test]
    fn test_whitespace_only_input() {
        assert_eq!(round_trip(""), "");
        assert_eq!(round_trip("\n\n   \n\n"), "");
    }

    #[test]
    fn test_literal_spacing() {
        let mut doc = Document::parse("before\n!!! note\n\nafter\n");
        // "before\n!!! note" is a single paragraph; replace it.
        doc.replace_span(0..1, ":::note\n:::".to_owned());

        assert_eq!(Serializer::new().serialize(&doc), ":::note\n:::\n\nafter\n");
    }

    #[test]
    fn test_synthesized_nodes() {
        let doc = Document::from_nodes(vec![
            Node::Paragraph(Paragraph {
                text: "Escaped \\[link\\]&#x20;text".to_owned(),
                span: None,
            }),
            Node::Code(CodeBlock {
                value: "let s = \"```\";".to_owned(),
                lang: Some("rust".to_owned()),
                kind: CodeKind::Fenced,
                span: None,
            }),
        ]);

        assert_eq!(
            Serializer::new().serialize(&doc),
            "Escaped [link] text\n\n````rust\nlet s = \"```\";\n````"
        );
    }

    #[test]
    fn test_indented_code_becomes_fenced() {
        assert_eq!(round_trip("Intro\n\n    let x = 1;\n"), "Intro\n\n```\nlet x = 1;\n```\n");
        assert_eq!(
            round_trip("    a\n\n    b\nafter\n"),
            "```\na\n\nb\n```\nafter\n"
        );
    }

    #[test]
    fn test_fenced_output_is_stable() {
        let once = round_trip("Intro\n\n    let s = \"```\";\n");
        assert_eq!(once, "Intro\n\n````\nlet s = \"```\";\n````\n");
        assert_eq!(round_trip(&once), once);
    }

    #[test]
    fn test_aside_body_stays_indented() {
        let input = ":::caution[Careful]\n\n    Body\n:::\n\n    code\n";
        assert_eq!(
            round_trip(input),
            ":::caution[Careful]\n\n    Body\n:::\n\n```\ncode\n```\n"
        );
    }

    #[test]
    fn test_track_asides() {
        assert_eq!(track_asides(":::note", 0), 1);
        assert_eq!(track_asides(":::tip[X]\n:::", 0), 0);
        assert_eq!(track_asides(":::", 1), 0);
        assert_eq!(track_asides(":::", 0), 0);
        assert_eq!(track_asides("plain text", 2), 2);
    }

    #[test]
    fn test_restore_literal_text_borrows_when_clean() {
        assert!(matches!(restore_literal_text("plain"), Cow::Borrowed("plain")));
    }
}
