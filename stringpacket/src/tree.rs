//! Loading of the template-locale source tree.
//!
//! Layout: `<base>/<template_locale>/<Format>/<relative path>.<ext>`, where
//! `<Format>` is `JSON`, `Android` or `iOS`.

use std::{collections::BTreeMap, path::Path};

use crate::{
    config::JsonConfig,
    error::Error,
    formats::{Container, FileFormat},
    fsutil::{list_files, relative_path},
    types::StringEntry,
};

/// Every parsed file of the template locale, grouped by format and keyed by
/// its `/`-separated path relative to the format directory.
///
/// Files are kept in path order, which makes every derived packet
/// reproducible regardless of how the platform lists directories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTree {
    files: BTreeMap<FileFormat, BTreeMap<String, Container>>,
}

impl SourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every file under `root` (the template locale directory).
    /// A missing format directory contributes no files. Any file that fails
    /// to parse aborts the load.
    pub fn load<P: AsRef<Path>>(root: P, json_config: &JsonConfig) -> Result<Self, Error> {
        let root = root.as_ref();
        let mut tree = SourceTree::new();

        for format in FileFormat::ALL {
            let dir = root.join(format.directory_name());
            if !dir.is_dir() {
                tracing::debug!(dir = %dir.display(), "no source directory for format");
                continue;
            }
            for path in list_files(&dir)? {
                if FileFormat::from_path(&path) != Some(format) {
                    continue;
                }
                let Some(rel) = relative_path(&dir, &path) else {
                    continue;
                };
                let container = format.parse_file(&path, json_config)?;
                tracing::debug!(
                    %format,
                    path = %rel,
                    strings = container.entries().len(),
                    "parsed source file"
                );
                tree.insert(format, rel, container);
            }
        }
        Ok(tree)
    }

    pub fn insert(&mut self, format: FileFormat, path: impl Into<String>, container: Container) {
        self.files
            .entry(format)
            .or_default()
            .insert(path.into(), container);
    }

    /// Convenience for trees assembled in memory from plain entry lists.
    pub fn insert_entries(
        &mut self,
        format: FileFormat,
        path: impl Into<String>,
        entries: Vec<StringEntry>,
    ) {
        self.insert(format, path, Container::Entries(entries));
    }

    pub fn get(&self, format: FileFormat, path: &str) -> Option<&Container> {
        self.files.get(&format)?.get(path)
    }

    /// Files of one format in path order.
    pub fn files(&self, format: FileFormat) -> impl Iterator<Item = (&String, &Container)> {
        self.files.get(&format).into_iter().flat_map(|m| m.iter())
    }

    pub fn file_count(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }

    pub fn entry_count(&self) -> usize {
        self.files
            .values()
            .flat_map(BTreeMap::values)
            .map(|c| c.entries().len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }
}
