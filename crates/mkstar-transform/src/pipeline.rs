//! Parse once, transform, serialize once.

use crate::{AdmonitionTransform, Document, Serializer, TabsTransform, Transform};

/// Counts of block units rewritten in one document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub admonitions: usize,
    pub tab_groups: usize,
}

impl ConversionStats {
    /// Whether the document contained anything to convert.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.admonitions == 0 && self.tab_groups == 0
    }
}

impl std::ops::AddAssign for ConversionStats {
    fn add_assign(&mut self, other: Self) {
        self.admonitions += other.admonitions;
        self.tab_groups += other.tab_groups;
    }
}

/// Result of running the pipeline on one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    /// Converted markdown.
    pub output: String,
    pub stats: ConversionStats,
}

/// Conversion pipeline from Material MkDocs markdown to Starlight MDX.
///
/// Transforms run in a fixed order: admonitions first, then tabs, so that a
/// tab group never sees unresolved admonition markers. The pipeline holds no
/// per-document state and can be shared between threads.
///
/// # Example
///
/// ```
/// use mkstar_transform::Pipeline;
///
/// let conversion = Pipeline::new().run("!!! tip\n\n    Use tabs.\n");
///
/// assert_eq!(conversion.output, ":::tip\n\n    Use tabs.\n:::\n");
/// assert_eq!(conversion.stats.admonitions, 1);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Pipeline {
    admonitions: AdmonitionTransform,
    tabs: TabsTransform,
    serializer: Serializer,
}

impl Pipeline {
    /// Create a pipeline with the default transforms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert one document.
    #[must_use]
    pub fn run(&self, input: &str) -> Conversion {
        let mut doc = Document::parse(input);

        let stats = ConversionStats {
            admonitions: apply(&self.admonitions, &mut doc),
            tab_groups: apply(&self.tabs, &mut doc),
        };

        let output = self.serializer.serialize(&doc);
        tracing::debug!(
            admonitions = stats.admonitions,
            tab_groups = stats.tab_groups,
            bytes = output.len(),
            "Converted document"
        );

        Conversion { output, stats }
    }
}

fn apply(transform: &dyn Transform, doc: &mut Document) -> usize {
    let count = transform.apply(doc);
    tracing::trace!(transform = transform.name(), count, "Applied transform");
    count
}

/// Convert Material MkDocs markdown to Starlight MDX.
///
/// Shorthand for `Pipeline::new().run(input).output`.
#[must_use]
pub fn pipeline(input: &str) -> String {
    Pipeline::new().run(input).output
}
