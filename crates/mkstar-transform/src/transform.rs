//! Transform trait.

use crate::Document;

/// A structural rewrite applied to a parsed [`Document`].
///
/// Implementations detect their block units in a first pass, then replace
/// them from the highest index down so that indices collected earlier stay
/// valid while the children vector shrinks. Transforms keep no state between
/// calls; one value can serve any number of documents and threads.
pub trait Transform: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Rewrite the document in place.
    ///
    /// Returns the number of block units that were replaced.
    fn apply(&self, doc: &mut Document) -> usize;
}
