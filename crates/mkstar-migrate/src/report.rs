//! Per-section migration results.

use mkstar_transform::ConversionStats;

use crate::MigrateError;

/// Outcome of migrating one section.
#[derive(Debug)]
pub struct SectionReport {
    /// Slug of the migrated section.
    pub slug: String,
    /// Markdown and asset files found in the source tree.
    pub processed: usize,
    /// Markdown files converted and written.
    pub markdown_files: usize,
    /// Assets copied.
    pub asset_files: usize,
    /// Blocks rewritten across all markdown files.
    pub stats: ConversionStats,
    /// Failures, in the order they happened.
    pub errors: Vec<MigrateError>,
}

impl SectionReport {
    pub(crate) fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_owned(),
            processed: 0,
            markdown_files: 0,
            asset_files: 0,
            stats: ConversionStats::default(),
            errors: Vec::new(),
        }
    }

    /// Whether the section migrated without errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
