//! Migration error type.

use std::path::PathBuf;

/// Error raised while migrating a section.
///
/// Per-file errors are collected in a [`SectionReport`](crate::SectionReport)
/// and do not stop the run; errors raised before any file is processed
/// (unreadable source tree, output directory creation) end the section.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to process asset {}: {source}", path.display())]
    Asset {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to process markdown {}: {source}", path.display())]
    Markdown {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is outside of source directory {}", path.display(), root.display())]
    OutsideSource { path: PathBuf, root: PathBuf },
}
