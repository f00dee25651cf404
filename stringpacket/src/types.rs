//! Core, format-agnostic types for stringpacket.
//! Format adapters decode into these; encoders serialize these.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::formats::FileFormat;

/// The canonical source-language locale the packet is built from.
pub const TEMPLATE_LOCALE: &str = "en";

/// Marker value for an entry that has no real translation yet.
///
/// Consumers must treat it as a flag, never as content.
pub const NO_TRANSLATION: &str = "NO TRANSLATION FOUND";

/// File name of the worksheet written into the base directory.
pub const WORKSHEET_FILE_NAME: &str = "TranslationPacket.tsv";

/// A single translatable string as it appears in one file.
///
/// Entries are plain values: every collection owns its own copies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct StringEntry {
    /// The key of the string in its file. Unique within one file.
    pub name: String,

    /// The text shown to users. Only empty before translation.
    pub value: String,

    /// Optional comment for translators.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,
}

impl StringEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns the comment if it carries any text.
    pub fn non_empty_comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }

    /// Whether this entry still holds the untranslated marker.
    pub fn is_untranslated(&self) -> bool {
        self.value == NO_TRANSLATION
    }
}

impl Display for StringEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StringEntry {{ name: {}, value: {} }}", self.name, self.value)
    }
}

/// Identifies one output file produced by an import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileIdentifier {
    /// Path relative to `<base>/<locale>/<Format>/`.
    pub file_path: String,
    pub format: FileFormat,
    pub locale: String,
}

impl FileIdentifier {
    pub fn new(file_path: impl Into<String>, format: FileFormat, locale: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            format,
            locale: locale.into(),
        }
    }

    /// Path of the output file relative to the base directory.
    pub fn relative_output_path(&self) -> std::path::PathBuf {
        let mut path = std::path::PathBuf::from(&self.locale);
        path.push(self.format.directory_name());
        for segment in self.file_path.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }
}

impl Display for FileIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.locale, self.format, self.file_path)
    }
}
