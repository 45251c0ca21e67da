//! Directory migration from Material MkDocs to Starlight.
//!
//! Each configured section is migrated independently:
//!
//! 1. walk the source tree, skipping hidden and build directories;
//! 2. copy assets (images under the assets directory, everything else under
//!    the public directory) and record their public URLs;
//! 3. run every markdown file through the conversion pipeline, rewrite local
//!    asset references and write it under the content directory.
//!
//! Sections run in parallel on the global rayon thread pool. Failures are
//! collected per section in a [`SectionReport`] rather than aborting the run.

mod classify;
mod error;
mod plan;
mod report;
mod section;
mod urls;
mod walk;

use mkstar_config::Config;
use rayon::prelude::*;

pub use classify::{FileKind, classify};
pub use error::MigrateError;
pub use plan::{SectionPlan, plan};
pub use report::SectionReport;
pub use section::convert_section;
pub use urls::{UrlMap, rewrite_urls};

/// Migrate all configured sections in parallel.
///
/// Reports are returned in section order.
#[must_use]
pub fn convert(config: &Config) -> Vec<SectionReport> {
    config.sections.par_iter().map(convert_section).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_convert_keeps_section_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut toml = String::new();
        for slug in ["alpha", "beta", "gamma"] {
            fs::create_dir_all(dir.path().join("in").join(slug)).unwrap();
            fs::write(
                dir.path().join("in").join(slug).join("index.md"),
                "!!! note\n\n    Hi\n",
            )
            .unwrap();
            toml.push_str(&format!(
                "[[sections]]\nslug = \"{slug}\"\nname = \"{slug}\"\nsource_dir = \"in/{slug}\"\ncontent_dir = \"out/{slug}\"\nassets_dir = \"assets/{slug}\"\npublic_path = \"/public/{slug}/\"\n\n"
            ));
        }
        let config = Config::parse(&toml, dir.path()).unwrap();

        let reports = convert(&config);

        let slugs: Vec<_> = reports.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alpha", "beta", "gamma"]);
        assert!(reports.iter().all(SectionReport::is_ok));
        assert_eq!(
            fs::read_to_string(dir.path().join("out/beta/index.md")).unwrap(),
            ":::note\n\n    Hi\n:::\n"
        );
    }
}
