//! Source tree discovery.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::MigrateError;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build"];

/// Collect every migratable file under `root`, sorted by path.
///
/// Hidden entries, [`SKIPPED_DIRS`] and compiled Python files are skipped.
/// Fails if `root` or any directory below it cannot be read.
pub(crate) fn walk(root: &Path) -> Result<Vec<PathBuf>, MigrateError> {
    let mut files = Vec::new();
    walk_dir(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), MigrateError> {
    let read_err = |source| MigrateError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            if !SKIPPED_DIRS.contains(&name.as_ref()) {
                walk_dir(&path, files)?;
            }
        } else if path.is_file() && !name.ends_with(".pyc") {
            files.push(path);
        }
    }
    Ok(())
}

/// Lexically normalize a path: drop `.` components and fold `..` into
/// the preceding component. The filesystem is not consulted.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Render a relative path with forward slashes.
pub(crate) fn to_slash(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    parts.join("/")
}
