//! Migration of a single section.

use std::fs;
use std::path::Path;

use mkstar_config::SectionConfig;
use mkstar_transform::{ConversionStats, Pipeline};

use crate::classify::{FileKind, classify};
use crate::urls::{UrlMap, rewrite_urls};
use crate::walk::{normalize, walk};
use crate::{MigrateError, SectionReport};

/// Migrate one section: copy its assets, then convert its markdown.
///
/// Never fails as a whole. Errors are recorded in the returned report;
/// a per-file error skips that file and processing continues.
#[must_use]
pub fn convert_section(section: &SectionConfig) -> SectionReport {
    let mut report = SectionReport::new(&section.slug);

    if let Err(err) = run(section, &mut report) {
        tracing::warn!(section = %section.slug, error = %err, "Section conversion failed");
        report.errors.push(err);
    }

    tracing::info!(
        section = %section.slug,
        markdown = report.markdown_files,
        assets = report.asset_files,
        errors = report.errors.len(),
        "Converted section"
    );
    report
}

fn run(section: &SectionConfig, report: &mut SectionReport) -> Result<(), MigrateError> {
    let source_root = normalize(&section.source_dir);

    for dir in [&section.content_dir, &section.assets_dir, &section.public_dir] {
        create_dir(dir)?;
    }

    let files = walk(&source_root)?;
    let (markdown, assets): (Vec<_>, Vec<_>) = files
        .into_iter()
        .map(|path| (classify(&path), path))
        .filter(|(kind, _)| *kind != FileKind::Ignored)
        .partition(|(kind, _)| *kind == FileKind::Markdown);
    report.processed = markdown.len() + assets.len();

    // Assets first: markdown rewriting needs the complete URL map.
    let mut urls = UrlMap::new();
    for (kind, path) in &assets {
        match copy_asset(section, &source_root, path, *kind, &mut urls) {
            Ok(()) => report.asset_files += 1,
            Err(err) => record(report, err),
        }
    }

    let pipeline = Pipeline::new();
    for (_, path) in &markdown {
        match convert_markdown(section, &source_root, path, &pipeline, &urls) {
            Ok(stats) => {
                report.markdown_files += 1;
                report.stats += stats;
            }
            Err(err) => record(report, err),
        }
    }

    Ok(())
}

fn record(report: &mut SectionReport, err: MigrateError) {
    tracing::warn!(section = %report.slug, error = %err, "Skipping file");
    report.errors.push(err);
}

fn copy_asset(
    section: &SectionConfig,
    source_root: &Path,
    path: &Path,
    kind: FileKind,
    urls: &mut UrlMap,
) -> Result<(), MigrateError> {
    let relative = relative_to(path, source_root)?;
    let target_root = if kind == FileKind::Image {
        &section.assets_dir
    } else {
        &section.public_dir
    };
    let destination = target_root.join(relative);

    let asset_err = |source| MigrateError::Asset {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(asset_err)?;
    }
    fs::copy(path, &destination).map_err(asset_err)?;

    let url = urls.register(path, relative, &section.public_path);
    tracing::debug!(asset = %relative.display(), %url, "Copied asset");
    Ok(())
}

fn convert_markdown(
    section: &SectionConfig,
    source_root: &Path,
    path: &Path,
    pipeline: &Pipeline,
    urls: &UrlMap,
) -> Result<ConversionStats, MigrateError> {
    let relative = relative_to(path, source_root)?;
    let markdown_err = |source| MigrateError::Markdown {
        path: path.to_path_buf(),
        source,
    };

    let input = fs::read_to_string(path).map_err(markdown_err)?;
    let conversion = pipeline.run(&input);
    let output = rewrite_urls(&conversion.output, path, source_root, urls);

    let destination = section.content_dir.join(relative);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(markdown_err)?;
    }
    fs::write(&destination, output).map_err(markdown_err)?;

    Ok(conversion.stats)
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> Result<&'a Path, MigrateError> {
    path.strip_prefix(root)
        .map_err(|_| MigrateError::OutsideSource {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
}

fn create_dir(path: &Path) -> Result<(), MigrateError> {
    fs::create_dir_all(path).map_err(|source| MigrateError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(base: &Path) -> SectionConfig {
        SectionConfig {
            slug: "docs".to_owned(),
            name: "Documentation".to_owned(),
            source_dir: base.join("input/docs"),
            content_dir: base.join("output/content/docs"),
            assets_dir: base.join("output/assets/docs"),
            public_path: "/assets/docs/".to_owned(),
            public_dir: base.join("public/assets/docs"),
        }
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_convert_section() {
        let dir = tempfile::tempdir().unwrap();
        let section = section(dir.path());
        let src = &section.source_dir;

        write(
            &src.join("index.md"),
            "# Home\n\n!!! warning \"Careful\"\n\n    Body\n\n![Logo](img/logo.png){:target=\"_blank\"}\n",
        );
        write(
            &src.join("guide/setup.md"),
            "=== \"A\"\n\n    a\n\n=== \"B\"\n\n    b\n\n[Manual](../files/manual.pdf)\n",
        );
        write(&src.join("img/logo.png"), "png");
        write(&src.join("files/manual.pdf"), "pdf");
        write(&src.join("mkdocs.py"), "ignored");

        let report = convert_section(&section);

        assert!(report.is_ok(), "{:?}", report.errors);
        assert_eq!(report.slug, "docs");
        assert_eq!(report.processed, 4);
        assert_eq!(report.markdown_files, 2);
        assert_eq!(report.asset_files, 2);
        assert_eq!(report.stats.admonitions, 1);
        assert_eq!(report.stats.tab_groups, 1);

        assert!(section.assets_dir.join("img/logo.png").is_file());
        assert!(section.public_dir.join("files/manual.pdf").is_file());
        assert!(!section.content_dir.join("mkdocs.py").exists());

        let index = fs::read_to_string(section.content_dir.join("index.md")).unwrap();
        assert_eq!(
            index,
            "# Home\n\n:::caution[Careful]\n\n    Body\n:::\n\n![Logo](/assets/docs/img/logo.png)\n"
        );

        let setup = fs::read_to_string(section.content_dir.join("guide/setup.md")).unwrap();
        assert!(setup.starts_with("<Tabs>\n"));
        assert!(setup.contains("[Manual](/assets/docs/files/manual.pdf)"));
    }

    #[test]
    fn test_missing_source_is_section_error() {
        let dir = tempfile::tempdir().unwrap();
        let report = convert_section(&section(dir.path()));

        assert_eq!(report.processed, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], MigrateError::ReadDir { .. }));
    }

    #[test]
    fn test_unreadable_markdown_is_recorded_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let section = section(dir.path());
        write(&section.source_dir.join("good.md"), "ok\n");
        // Invalid UTF-8 cannot be read as a string.
        fs::write(section.source_dir.join("bad.md"), [0xff, 0xfe, 0x00]).unwrap();

        let report = convert_section(&section);

        assert_eq!(report.processed, 2);
        assert_eq!(report.markdown_files, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(
            report.errors[0]
                .to_string()
                .starts_with("Failed to process markdown")
        );
        assert!(section.content_dir.join("good.md").is_file());
    }
}
