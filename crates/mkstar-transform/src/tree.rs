//! Document tree built from pulldown-cmark events.
//!
//! Only top-level blocks are materialized. Paragraphs and code blocks are
//! inspected by the transforms; every other block is kept as an opaque span
//! of the source and moved around untouched.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

/// A paragraph with its inline content flattened to text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paragraph {
    /// Concatenated inline text (soft and hard breaks become `\n`).
    pub text: String,
    /// Source span, `None` for synthesized nodes.
    pub span: Option<Range<usize>>,
}

/// How a code block was written in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeKind {
    /// Four-space (or tab) indented block.
    Indented,
    /// Backtick or tilde fence.
    Fenced,
}

/// A code block holding a literal multi-line value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    /// Literal content without the indentation or fences, and without the
    /// final line break.
    pub value: String,
    /// Language tag from the fence info string.
    pub lang: Option<String>,
    pub kind: CodeKind,
    /// Source span, `None` for synthesized nodes.
    pub span: Option<Range<usize>>,
}

/// Rendered target-dialect text that replaced one or more source nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    pub value: String,
    /// Union of the spans of the replaced nodes.
    pub span: Option<Range<usize>>,
}

/// Any block the transforms do not inspect (headings, lists, quotes, HTML, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opaque {
    pub span: Range<usize>,
}

/// Top-level block of a [`Document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Paragraph(Paragraph),
    Code(CodeBlock),
    Literal(Literal),
    Opaque(Opaque),
}

impl Node {
    /// Source span of the node, if it came from (or replaced) source text.
    #[must_use]
    pub fn span(&self) -> Option<&Range<usize>> {
        match self {
            Self::Paragraph(p) => p.span.as_ref(),
            Self::Code(c) => c.span.as_ref(),
            Self::Literal(l) => l.span.as_ref(),
            Self::Opaque(o) => Some(&o.span),
        }
    }

    #[must_use]
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Self::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_code(&self) -> Option<&CodeBlock> {
        match self {
            Self::Code(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the block if it is an indented code block.
    ///
    /// Material block content is delimited by indentation, so only indented
    /// code blocks can carry the body of a marker.
    #[must_use]
    pub fn as_indented_code(&self) -> Option<&CodeBlock> {
        self.as_code().filter(|c| c.kind == CodeKind::Indented)
    }

    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// Parsed markdown document: the source text plus its top-level blocks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    source: String,
    children: Vec<Node>,
}

impl Document {
    /// Parse markdown into a document tree.
    ///
    /// Parsing never fails; anything pulldown-cmark accepts becomes a node.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut children = Vec::new();
        let mut depth = 0usize;
        let mut block: Option<BlockBuilder> = None;

        for (event, range) in Parser::new_ext(source, parser_options()).into_offset_iter() {
            match event {
                Event::Start(tag) => {
                    if depth == 0 {
                        block = Some(BlockBuilder::new(&tag, range));
                    }
                    depth += 1;
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0
                        && let Some(builder) = block.take()
                    {
                        children.push(builder.finish(source));
                    }
                }
                // Block-level events without a container (thematic breaks).
                _ if depth == 0 => {
                    children.push(Node::Opaque(Opaque {
                        span: block_span(source, range),
                    }));
                }
                event => {
                    if let Some(builder) = block.as_mut() {
                        builder.push(&event);
                    }
                }
            }
        }

        Self {
            source: source.to_owned(),
            children,
        }
    }

    /// Build a document from synthesized nodes with no backing source.
    #[must_use]
    pub fn from_nodes(children: Vec<Node>) -> Self {
        Self {
            source: String::new(),
            children,
        }
    }

    /// Original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Top-level blocks in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Source text covered by a span.
    #[must_use]
    pub fn slice(&self, span: &Range<usize>) -> &str {
        self.source.get(span.clone()).unwrap_or_default()
    }

    /// Text of a paragraph as written: its trimmed source slice, or the
    /// stored inline text for synthesized paragraphs.
    ///
    /// Marker lines are matched against this, so titles and labels keep
    /// their inline markup and character references.
    #[must_use]
    pub fn paragraph_text<'a>(&'a self, paragraph: &'a Paragraph) -> &'a str {
        match &paragraph.span {
            Some(span) => self.slice(span).trim(),
            None => &paragraph.text,
        }
    }

    /// Whether the child at `index` is followed directly by the next child,
    /// with nothing but whitespace between them in the source.
    ///
    /// Link reference definitions produce no node; a gap holding one is not
    /// adjacent, so a transform never swallows it.
    #[must_use]
    pub fn followed_directly(&self, index: usize) -> bool {
        let (Some(current), Some(next)) = (self.children.get(index), self.children.get(index + 1))
        else {
            return false;
        };
        match (current.span(), next.span()) {
            (Some(a), Some(b)) => self
                .source
                .get(a.end..b.start)
                .is_some_and(|gap| gap.trim().is_empty()),
            _ => true,
        }
    }

    /// Replace the children in `range` with a single literal node.
    ///
    /// The literal records the union of the replaced spans so the serializer
    /// can still see the source text around it. Children outside `range` keep
    /// their relative order.
    pub fn replace_span(&mut self, range: Range<usize>, value: String) {
        let replaced = &self.children[range.clone()];
        let start = replaced.iter().find_map(|n| n.span().map(|s| s.start));
        let end = replaced.iter().rev().find_map(|n| n.span().map(|s| s.end));
        let span = start.zip(end).map(|(start, end)| start..end);

        self.children
            .splice(range, [Node::Literal(Literal { value, span })]);
    }
}

/// Parser options: GFM plus the block extensions common in MkDocs sources.
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_GFM
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Normalize a block range: widen the start to the beginning of its line when
/// only indentation precedes it, and drop trailing whitespace.
fn block_span(source: &str, range: Range<usize>) -> Range<usize> {
    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let start = if source[line_start..range.start].trim().is_empty() {
        line_start
    } else {
        range.start
    };
    let end = range.start + source[range.clone()].trim_end().len();
    start..end.max(start)
}

/// Accumulates one top-level block while its events stream past.
enum BlockBuilder {
    Paragraph {
        text: String,
        range: Range<usize>,
    },
    Code {
        value: String,
        lang: Option<String>,
        kind: CodeKind,
        range: Range<usize>,
    },
    Opaque {
        range: Range<usize>,
    },
}

impl BlockBuilder {
    fn new(tag: &Tag<'_>, range: Range<usize>) -> Self {
        match tag {
            Tag::Paragraph => Self::Paragraph {
                text: String::new(),
                range,
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => Self::Code {
                value: String::new(),
                lang: None,
                kind: CodeKind::Indented,
                range,
            },
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => Self::Code {
                value: String::new(),
                lang: info.split_whitespace().next().map(str::to_owned),
                kind: CodeKind::Fenced,
                range,
            },
            _ => Self::Opaque { range },
        }
    }

    fn push(&mut self, event: &Event<'_>) {
        match (self, event) {
            (
                Self::Paragraph { text, .. },
                Event::Text(s)
                | Event::Code(s)
                | Event::InlineHtml(s)
                | Event::Html(s)
                | Event::InlineMath(s)
                | Event::DisplayMath(s),
            ) => text.push_str(s),
            (Self::Paragraph { text, .. }, Event::SoftBreak | Event::HardBreak) => {
                text.push('\n');
            }
            (Self::Code { value, .. }, Event::Text(s)) => value.push_str(s),
            _ => {}
        }
    }

    fn finish(self, source: &str) -> Node {
        match self {
            Self::Paragraph { text, range } => Node::Paragraph(Paragraph {
                text,
                span: Some(block_span(source, range)),
            }),
            Self::Code {
                mut value,
                lang,
                kind,
                range,
            } => {
                if value.ends_with('\n') {
                    value.pop();
                }
                Node::Code(CodeBlock {
                    value,
                    lang,
                    kind,
                    span: Some(block_span(source, range)),
                })
            }
            Self::Opaque { range } => Node::Opaque(Opaque {
                span: block_span(source, range),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_paragraph_and_indented_code() {
        let doc = Document::parse("!!! note\n\n    Hello\n    World\n");

        assert_eq!(doc.children().len(), 2);
        let para = doc.children()[0].as_paragraph().unwrap();
        assert_eq!(para.text, "!!! note");
        let code = doc.children()[1].as_indented_code().unwrap();
        assert_eq!(code.value, "Hello\nWorld");
        assert_eq!(code.lang, None);
    }

    #[test]
    fn test_indented_code_span_includes_indentation() {
        let source = "!!! note\n\n    Hello";
        let doc = Document::parse(source);

        let span = doc.children()[1].span().unwrap();
        assert_eq!(doc.slice(span), "    Hello");
    }

    #[test]
    fn test_indented_code_keeps_inner_blank_lines() {
        let doc = Document::parse("=== \"A\"\n\n    one\n\n    two\n\nafter");

        let code = doc.children()[1].as_code().unwrap();
        assert_eq!(code.value, "one\n\ntwo");
        assert_eq!(doc.children().len(), 3);
    }

    #[test]
    fn test_fenced_code_language() {
        let doc = Document::parse("```rust title=\"x\"\nfn main() {}\n```\n");

        let code = doc.children()[0].as_code().unwrap();
        assert_eq!(code.kind, CodeKind::Fenced);
        assert_eq!(code.lang.as_deref(), Some("rust"));
        assert_eq!(code.value, "fn main() {}");
        assert!(doc.children()[0].as_indented_code().is_none());
    }

    #[test]
    fn test_other_blocks_are_opaque() {
        let source = "# Title\n\n- a\n- b\n\n> quote\n\n---\n";
        let doc = Document::parse(source);

        assert_eq!(doc.children().len(), 4);
        assert!(
            doc.children()
                .iter()
                .all(|n| matches!(n, Node::Opaque(_)))
        );
        let list = doc.children()[1].span().unwrap();
        assert_eq!(doc.slice(list), "- a\n- b");
    }

    #[test]
    fn test_paragraph_text_flattens_inlines() {
        let doc = Document::parse("Some *emphasis* and `code`\nnext line");

        let para = doc.children()[0].as_paragraph().unwrap();
        assert_eq!(para.text, "Some emphasis and code\nnext line");
    }

    #[test]
    fn test_paragraph_text_is_source_slice() {
        let doc = Document::parse("  === \"Say &quot;hi&quot; *now*\"  \n\nnext");

        let para = doc.children()[0].as_paragraph().unwrap();
        assert_eq!(doc.paragraph_text(para), "=== \"Say &quot;hi&quot; *now*\"");

        let synthesized = Paragraph {
            text: "plain".to_owned(),
            span: None,
        };
        assert_eq!(doc.paragraph_text(&synthesized), "plain");
    }

    #[test]
    fn test_followed_directly() {
        let doc = Document::parse("!!! note\n\n    body\n\n[ref]: https://example.com\n\nText");

        assert!(doc.followed_directly(0));
        // Link reference definition sits between the code block and the paragraph.
        assert!(!doc.followed_directly(1));
        assert!(!doc.followed_directly(2));
    }

    #[test]
    fn test_replace_span_keeps_neighbours() {
        let mut doc = Document::parse("before\n\n!!! note\n\n    body\n\nafter");
        assert_eq!(doc.children().len(), 4);

        doc.replace_span(1..3, ":::note".to_owned());

        assert_eq!(doc.children().len(), 3);
        assert_eq!(doc.children()[0].as_paragraph().unwrap().text, "before");
        assert!(doc.children()[1].is_literal());
        assert_eq!(doc.children()[2].as_paragraph().unwrap().text, "after");

        let span = doc.children()[1].span().unwrap();
        assert_eq!(doc.slice(span), "!!! note\n\n    body");
    }

    #[test]
    fn test_empty_input() {
        let doc = Document::parse("");
        assert!(doc.children().is_empty());

        let doc = Document::parse("\n\n   \n\n");
        assert!(doc.children().is_empty());
    }

    #[test]
    fn test_front_matter_is_opaque() {
        let doc = Document::parse("---\ntitle: Guide\n---\n\nText\n");

        assert_eq!(doc.children().len(), 2);
        assert!(matches!(doc.children()[0], Node::Opaque(_)));
        let span = doc.children()[0].span().unwrap();
        assert!(doc.slice(span).starts_with("---\ntitle: Guide"));
        assert_eq!(doc.children()[1].as_paragraph().unwrap().text, "Text");
    }
}
