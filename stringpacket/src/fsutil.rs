//! Small filesystem helpers shared by the tree loader and the writers.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use tempfile::NamedTempFile;

use crate::error::Error;

/// Writes `bytes` to `path` through a temporary file in the same directory,
/// creating missing parent directories first.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), Error> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// Lists every regular, non-hidden file under `root`, sorted by path.
///
/// A missing root yields an empty list. `.gitignore` rules are not applied:
/// localization trees are walked as they are on disk.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, Error> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for dent in walker {
        let dent = dent.map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
        if dent.file_type().is_some_and(|ft| ft.is_file()) {
            files.push(dent.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// `/`-separated path of `path` relative to `root`.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Expands a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
