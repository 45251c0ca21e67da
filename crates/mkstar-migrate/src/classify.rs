//! File classification by extension.

use std::path::Path;

/// Extensions of markdown sources.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdx"];

/// Image extensions the site build can optimise.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Extensions of assets served as-is.
#[rustfmt::skip]
const ASSET_EXTENSIONS: &[&str] = &[
    "ico",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // Video
    "mp4", "webm", "mov", "avi",
    // Audio
    "mp3", "wav", "ogg",
    // Archives
    "zip", "tar", "gz", "7z",
    // Fonts
    "woff", "woff2", "ttf", "otf",
    // Data
    "json", "xml", "csv", "yaml", "yml",
];

/// What a source file is migrated as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// Converted through the pipeline.
    Markdown,
    /// Asset copied under the section's assets directory.
    Image,
    /// Asset copied under the section's public directory.
    Asset,
    /// Not migrated.
    Ignored,
}

impl FileKind {
    /// Whether files of this kind are copied and registered for URL rewriting.
    #[must_use]
    pub fn is_asset(self) -> bool {
        matches!(self, Self::Image | Self::Asset)
    }
}

/// Classify a file by its extension (case-insensitive).
///
/// ```
/// use std::path::Path;
/// use mkstar_migrate::{FileKind, classify};
///
/// assert_eq!(classify(Path::new("guide/index.MD")), FileKind::Markdown);
/// assert_eq!(classify(Path::new("img/logo.svg")), FileKind::Image);
/// assert_eq!(classify(Path::new("files/report.pdf")), FileKind::Asset);
/// assert_eq!(classify(Path::new("mkdocs.py")), FileKind::Ignored);
/// ```
#[must_use]
pub fn classify(path: &Path) -> FileKind {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileKind::Ignored;
    };
    let ext = ext.to_ascii_lowercase();
    let ext = ext.as_str();

    if MARKDOWN_EXTENSIONS.contains(&ext) {
        FileKind::Markdown
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        FileKind::Image
    } else if ASSET_EXTENSIONS.contains(&ext) {
        FileKind::Asset
    } else {
        FileKind::Ignored
    }
}
