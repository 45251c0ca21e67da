//! Material MkDocs to Starlight markdown transformation engine.
//!
//! Converts the two Material block constructs that have Starlight
//! equivalents:
//!
//! - admonitions (`!!!`, `???`, `???+`) become asides (`:::type[title]` ... `:::`);
//! - content tabs (`=== "label"`) become `<Tabs>` / `<TabItem>` containers.
//!
//! Everything else in the document is written back unchanged.
//!
//! # Architecture
//!
//! The source is parsed once into a [`Document`]: a flat list of top-level
//! [`Node`]s built from pulldown-cmark events. Each [`Transform`] finds its
//! block units (a marker paragraph plus the indented code block carrying its
//! body) and replaces them with a single [`Node::Literal`] holding the
//! rendered target syntax. The [`Serializer`] then writes the tree back,
//! copying untouched nodes from the source verbatim.
//!
//! The engine is total: malformed or partial markers are left as ordinary
//! text, and no function in this crate returns an error.
//!
//! # Example
//!
//! ```
//! use mkstar_transform::pipeline;
//!
//! let output = pipeline("!!! warning \"Careful\"\n\n    Body");
//! assert_eq!(output, ":::caution[Careful]\n\n    Body\n:::");
//! ```

mod admonition;
mod marker;
mod pipeline;
mod serializer;
mod tabs;
mod transform;
mod tree;

pub use admonition::{AdmonitionTransform, AsideKind};
pub use marker::{AdmonitionMarker, AdmonitionSyntax, Marker, TabMarker, parse_marker};
pub use pipeline::{Conversion, ConversionStats, Pipeline, pipeline};
pub use serializer::Serializer;
pub use tabs::TabsTransform;
pub use transform::Transform;
pub use tree::{CodeBlock, CodeKind, Document, Literal, Node, Opaque, Paragraph};
