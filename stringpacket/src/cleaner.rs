//! Normalization of raw localized text before it enters the packet.
//!
//! Two rules are applied:
//! - Android only: inline tags such as `<b>` are written as `&lt;b>` so the
//!   XML parser keeps them as text. The app renders the tag literally and
//!   post-processes it.
//! - Every format: straight apostrophes (escaped `\'` or bare `'`) become the
//!   typographic `’`, which Android XML does not need escaped.
//!
//! Both rules are idempotent, so cleaning twice is the same as cleaning once.

use std::path::Path;

use crate::{
    config::CleanerConfig,
    error::Error,
    formats::FileFormat,
    fsutil::{list_files, write_atomic},
};

pub const TYPOGRAPHIC_APOSTROPHE: &str = "’";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cleaner {
    config: CleanerConfig,
}

/// Outcome of cleaning a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub scanned: usize,
    pub rewritten: usize,
}

impl Cleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    pub fn clean(&self, text: &str, format: FileFormat) -> String {
        let mut out = text.to_string();
        if format == FileFormat::Android {
            for tag in &self.config.html_tags {
                out = out.replace(&format!("<{tag}>"), &format!("&lt;{tag}>"));
                out = out.replace(&format!("</{tag}>"), &format!("&lt;/{tag}>"));
            }
        }
        replace_apostrophes(&out)
    }

    /// Cleans every file under `root` whose extension belongs to a known
    /// format. A file is rewritten only when cleaning changed it.
    pub fn clean_tree<P: AsRef<Path>>(&self, root: P) -> Result<CleanReport, Error> {
        let root = root.as_ref();
        let mut report = CleanReport::default();

        for path in list_files(root)? {
            let Some(format) = FileFormat::from_path(&path) else {
                continue;
            };
            report.scanned += 1;

            let original = std::fs::read_to_string(&path)
                .map_err(|e| Error::Io(e).in_file(path.display().to_string()))?;
            let cleaned = self.clean(&original, format);
            if cleaned != original {
                write_atomic(&path, cleaned.as_bytes())?;
                report.rewritten += 1;
                tracing::info!(path = %path.display(), %format, "cleaned");
            }
        }
        Ok(report)
    }
}

/// Cleans `text` with the default configuration.
pub fn clean(text: &str, format: FileFormat) -> String {
    Cleaner::default().clean(text, format)
}

/// Replaces `\'` and `'` with `’`.
pub fn replace_apostrophes(text: &str) -> String {
    text.replace("\\'", TYPOGRAPHIC_APOSTROPHE)
        .replace('\'', TYPOGRAPHIC_APOSTROPHE)
}
