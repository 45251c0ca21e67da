//! Material content tabs to Starlight `<Tabs>`.
//!
//! A tab group is a maximal run of `=== "label"` paragraphs, each optionally
//! followed by an indented code block holding the tab body:
//!
//! ```markdown
//! === "Python"
//!
//!     print("hi")
//!
//! === "Rust"
//!
//!     println!("hi");
//! ```
//!
//! becomes
//!
//! ```markdown
//! <Tabs>
//!   <TabItem label="Python">
//! print("hi")
//!   </TabItem>
//!   <TabItem label="Rust">
//! println!("hi");
//!   </TabItem>
//! </Tabs>
//! ```

use std::ops::Range;

use crate::marker::{Marker, parse_marker};
use crate::{Document, Node, Transform};

/// Rewrites runs of content tabs into `<Tabs>` containers.
///
/// Runs separated by any other block are separate groups.
#[derive(Clone, Copy, Debug, Default)]
pub struct TabsTransform;

impl TabsTransform {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// A single tab within a group.
#[derive(Clone, Debug, PartialEq, Eq)]
struct TabItem {
    label: String,
    /// Verbatim code block value, empty when the marker had no body.
    content: String,
}

/// One detected group: the child range it claims and its tabs in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
struct TabGroup {
    range: Range<usize>,
    tabs: Vec<TabItem>,
}

impl Transform for TabsTransform {
    fn name(&self) -> &'static str {
        "tabs"
    }

    fn apply(&self, doc: &mut Document) -> usize {
        let groups = collect_groups(doc);

        for group in groups.iter().rev() {
            doc.replace_span(group.range.clone(), render_tabs(&group.tabs));
        }

        groups.len()
    }
}

fn tab_label(doc: &Document, node: &Node) -> Option<String> {
    match parse_marker(doc.paragraph_text(node.as_paragraph()?))? {
        Marker::Tab(tab) => Some(tab.label),
        Marker::Admonition(_) => None,
    }
}

fn collect_groups(doc: &Document) -> Vec<TabGroup> {
    let children = doc.children();
    let mut groups = Vec::new();
    let mut i = 0;

    while i < children.len() {
        if tab_label(doc, &children[i]).is_none() {
            i += 1;
            continue;
        }

        let start = i;
        let mut tabs = Vec::new();

        while let Some(label) = children.get(i).and_then(|node| tab_label(doc, node)) {
            // Something between the previous tab and this marker (a link
            // reference definition) ends the group.
            if i > start && !doc.followed_directly(i - 1) {
                break;
            }

            let body = children
                .get(i + 1)
                .and_then(Node::as_indented_code)
                .filter(|_| doc.followed_directly(i));

            let content = match body {
                Some(code) => {
                    i += 2;
                    code.value.clone()
                }
                None => {
                    i += 1;
                    String::new()
                }
            };
            tabs.push(TabItem { label, content });
        }

        tracing::trace!(start, end = i, tabs = tabs.len(), "Found tab group");
        groups.push(TabGroup {
            range: start..i,
            tabs,
        });
    }

    groups
}

fn render_tabs(tabs: &[TabItem]) -> String {
    let mut out = String::from("<Tabs>\n");

    for tab in tabs {
        out.push_str("  <TabItem label=\"");
        out.push_str(&tab.label);
        out.push_str("\">\n");
        if !tab.content.is_empty() {
            out.push_str(&tab.content);
            out.push('\n');
        }
        out.push_str("  </TabItem>\n");
    }

    out.push_str("</Tabs>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Serializer;
    use pretty_assertions::assert_eq;

    fn convert(input: &str) -> String {
        let mut doc = Document::parse(input);
        TabsTransform::new().apply(&mut doc);
        Serializer::new().serialize(&doc)
    }

    #[test]
    fn test_two_tabs() {
        let input = "=== \"A\"\n\n    Content A\n\n=== \"B\"\n\n    Content B";
        let expected = "<Tabs>\n  <TabItem label=\"A\">\nContent A\n  </TabItem>\n  <TabItem label=\"B\">\nContent B\n  </TabItem>\n</Tabs>";
        assert_eq!(convert(input), expected);
    }

    #[test]
    fn test_single_tab() {
        let input = "=== \"Only Tab\"\n\n    Single tab content\n";
        let expected = "<Tabs>\n  <TabItem label=\"Only Tab\">\nSingle tab content\n  </TabItem>\n</Tabs>\n";
        assert_eq!(convert(input), expected);
    }

    #[test]
    fn test_tab_content_keeps_code_fences() {
        let input = "=== \"Python\"\n\n    ```python\n    def hello():\n        print(\"hi\")\n    ```\n\n=== \"JavaScript\"\n\n    ```javascript\n    console.log(\"hi\");\n    ```\n";
        let expected = "<Tabs>\n  <TabItem label=\"Python\">\n```python\ndef hello():\n    print(\"hi\")\n```\n  </TabItem>\n  <TabItem label=\"JavaScript\">\n```javascript\nconsole.log(\"hi\");\n```\n  </TabItem>\n</Tabs>\n";
        assert_eq!(convert(input), expected);
    }

    #[test]
    fn test_dangling_marker_is_empty_tab() {
        assert_eq!(
            convert("=== \"Lonely\""),
            "<Tabs>\n  <TabItem label=\"Lonely\">\n  </TabItem>\n</Tabs>"
        );
    }

    #[test]
    fn test_marker_without_body_inside_group() {
        let input = "=== \"Empty\"\n\n=== \"Full\"\n\n    body";
        let expected = "<Tabs>\n  <TabItem label=\"Empty\">\n  </TabItem>\n  <TabItem label=\"Full\">\nbody\n  </TabItem>\n</Tabs>";
        assert_eq!(convert(input), expected);
    }

    #[test]
    fn test_groups_separated_by_paragraph_are_not_merged() {
        let input = "=== \"A\"\n\n    a\n\nBetween.\n\n=== \"B\"\n\n    b\n";
        let output = convert(input);

        assert_eq!(output.matches("<Tabs>").count(), 2);
        assert_eq!(output.matches("</Tabs>").count(), 2);
        assert_eq!(
            output,
            "<Tabs>\n  <TabItem label=\"A\">\na\n  </TabItem>\n</Tabs>\n\nBetween.\n\n<Tabs>\n  <TabItem label=\"B\">\nb\n  </TabItem>\n</Tabs>\n"
        );
    }

    #[test]
    fn test_group_ends_at_non_tab_block() {
        let input = "=== \"A\"\n\n    a\n\n# Heading\n\n=== \"B\"";
        let mut doc = Document::parse(input);

        assert_eq!(TabsTransform::new().apply(&mut doc), 2);
        assert_eq!(doc.children().len(), 3);
    }

    #[test]
    fn test_labels_keep_source_order() {
        let input = "=== \"3\"\n\n    c\n\n=== \"1\"\n\n    a\n\n=== \"2\"\n\n    b";
        let output = convert(input);

        let first = output.find("label=\"3\"").unwrap();
        let second = output.find("label=\"1\"").unwrap();
        let third = output.find("label=\"2\"").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_admonition_marker_is_not_a_tab() {
        let mut doc = Document::parse("!!! note\n\n    body");
        assert_eq!(TabsTransform::new().apply(&mut doc), 0);
    }

    #[test]
    fn test_label_keeps_character_references() {
        let input = "=== \"Say &quot;hi&quot;\"\n\n    a\n\n=== \"`cargo` *fast*\"\n\n    b";
        let output = convert(input);

        assert!(output.contains("<TabItem label=\"Say &quot;hi&quot;\">"), "{output}");
        assert!(output.contains("<TabItem label=\"`cargo` *fast*\">"), "{output}");
        assert_eq!(output.matches("<Tabs>").count(), 1);
    }

    #[test]
    fn test_link_definition_splits_group() {
        let input = "=== \"A\"\n\n    a\n\n[x]: https://example.com\n\n=== \"B\"\n\n    b";
        let output = convert(input);

        assert_eq!(output.matches("<Tabs>").count(), 2);
        assert!(output.contains("[x]: https://example.com"));
    }

    #[test]
    fn test_collect_groups_ranges() {
        let doc = Document::parse("intro\n\n=== \"A\"\n\n    a\n\n=== \"B\"\n\noutro");
        let groups = collect_groups(&doc);

        assert_eq!(
            groups,
            vec![TabGroup {
                range: 1..4,
                tabs: vec![
                    TabItem {
                        label: "A".to_owned(),
                        content: "a".to_owned(),
                    },
                    TabItem {
                        label: "B".to_owned(),
                        content: String::new(),
                    },
                ],
            }]
        );
    }
}
