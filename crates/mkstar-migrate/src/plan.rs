//! Dry-run planning.

use std::path::PathBuf;

use mkstar_config::{Config, SectionConfig};

use crate::classify::{FileKind, classify};
use crate::walk::{normalize, walk};

/// What migrating a section would do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionPlan {
    pub slug: String,
    pub name: String,
    pub source_dir: PathBuf,
    pub content_dir: PathBuf,
    /// Markdown files that would be converted.
    pub markdown_files: usize,
    /// Assets that would be copied.
    pub asset_files: usize,
    /// Why the source tree could not be scanned, if it could not.
    pub error: Option<String>,
}

/// Describe a migration run without writing anything.
///
/// Source trees are scanned read-only to count the files each section
/// would migrate.
#[must_use]
pub fn plan(config: &Config) -> Vec<SectionPlan> {
    config.sections.iter().map(plan_section).collect()
}

fn plan_section(section: &SectionConfig) -> SectionPlan {
    let mut plan = SectionPlan {
        slug: section.slug.clone(),
        name: section.name.clone(),
        source_dir: section.source_dir.clone(),
        content_dir: section.content_dir.clone(),
        markdown_files: 0,
        asset_files: 0,
        error: None,
    };

    match walk(&normalize(&section.source_dir)) {
        Ok(files) => {
            for path in &files {
                match classify(path) {
                    FileKind::Markdown => plan.markdown_files += 1,
                    kind if kind.is_asset() => plan.asset_files += 1,
                    _ => {}
                }
            }
        }
        Err(err) => plan.error = Some(err.to_string()),
    }

    plan
}
