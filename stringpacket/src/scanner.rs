//! Collects user-facing strings from Swift sources into a `.strings` file.
//!
//! This is a line-based text search, not a Swift parser: for every keyword
//! `K`, the text between `K("` and the next `"` on the same line is taken as
//! a key. Interpolated keys (starting with `\(`) are skipped.

use std::path::{Path, PathBuf};

use crate::{
    cleaner,
    error::Error,
    formats::{FileFormat, StringsFormat},
    fsutil::{list_files, relative_path},
    traits::Parser,
    types::StringEntry,
};

const SWIFT_EXTENSION: &str = "swift";
const RESOURCES_DIR: &str = "Resources";
const STRINGS_FILE_NAME: &str = "Localizable.strings";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceScanner {
    keywords: Vec<String>,
}

impl SourceScanner {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    /// Adds the keys found in `text` to `found`, skipping names already
    /// present.
    pub fn scan_text(&self, text: &str, found: &mut Vec<StringEntry>) {
        for line in text.lines() {
            for keyword in &self.keywords {
                let needle = format!("{keyword}(\"");
                let Some(start) = line.find(&needle).map(|i| i + needle.len()) else {
                    continue;
                };
                let Some(len) = line[start..].find('"') else {
                    continue;
                };
                let key = &line[start..start + len];
                if key.starts_with("\\(") || found.iter().any(|e| e.name == key) {
                    continue;
                }
                found.push(
                    StringEntry::new(key, cleaner::clean(key, FileFormat::Ios))
                        .with_comment(line.trim()),
                );
            }
        }
    }

    /// Scans every Swift file under `root`, outside any `Resources`
    /// directory, in path order.
    pub fn scan_dir<P: AsRef<Path>>(&self, root: P) -> Result<Vec<StringEntry>, Error> {
        let mut found = Vec::new();
        self.scan_dir_into(root.as_ref(), &mut found)?;
        Ok(found)
    }

    fn scan_dir_into(&self, root: &Path, found: &mut Vec<StringEntry>) -> Result<(), Error> {
        for path in list_files(root)? {
            let is_swift = path
                .extension()
                .is_some_and(|ext| ext == SWIFT_EXTENSION);
            let in_resources = relative_path(root, &path)
                .is_some_and(|rel| rel.split('/').any(|part| part == RESOURCES_DIR));
            if !is_swift || in_resources {
                continue;
            }
            let text = std::fs::read_to_string(&path)
                .map_err(|e| Error::Io(e).in_file(path.display().to_string()))?;
            let before = found.len();
            self.scan_text(&text, found);
            tracing::debug!(
                path = %path.display(),
                new = found.len() - before,
                "scanned swift source"
            );
        }
        Ok(())
    }

    /// Adds newly found keys to `Resources/<locale>.lproj/Localizable.strings`
    /// under `root`. Existing entries stay first and unchanged. Returns the
    /// path written and the number of keys added.
    pub fn scan_into_strings_file<P: AsRef<Path>>(
        &self,
        root: P,
        locale: &str,
    ) -> Result<(PathBuf, usize), Error> {
        let root = root.as_ref();
        let path = strings_file_path(root, locale);

        let mut entries = if path.is_file() {
            StringsFormat::read_from(&path)
                .map_err(|e| e.in_file(path.display().to_string()))?
                .into_entries()
        } else {
            Vec::new()
        };
        let existing = entries.len();
        self.scan_dir_into(root, &mut entries)?;
        let added = entries.len() - existing;

        StringsFormat::from_entries(entries)
            .write_to(&path)
            .map_err(|e| e.in_file(path.display().to_string()))?;
        tracing::info!(path = %path.display(), added, "wrote strings file");
        Ok((path, added))
    }
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new(crate::config::ScannerConfig::default().keywords)
    }
}

/// `<root>/Resources/<locale>.lproj/Localizable.strings`
pub fn strings_file_path(root: &Path, locale: &str) -> PathBuf {
    root.join(RESOURCES_DIR)
        .join(format!("{locale}.lproj"))
        .join(STRINGS_FILE_NAME)
}
