//! All supported localization file formats for stringpacket.
//!
//! This module re-exports the main types for each format and provides
//! the [`FileFormat`] enum for generic format handling across the crate.

pub mod android_strings;
pub mod json;
pub mod strings;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use android_strings::{Format as AndroidStringsFormat, RawResource, StringResource};
pub use json::JsonFile;
pub use strings::Format as StringsFormat;

use crate::{Error, config::JsonConfig, traits::Parser, types::StringEntry};

/// The three file formats a packet reconciles.
///
/// The declaration order is the enumeration order used everywhere: packet
/// building, worksheet columns, and output writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileFormat {
    /// JSON documents with localized text embedded under known keys.
    Json,
    /// Android `strings.xml` resources.
    Android,
    /// iOS `.strings` files.
    Ios,
}

impl FileFormat {
    pub const ALL: [FileFormat; 3] = [FileFormat::Json, FileFormat::Android, FileFormat::Ios];

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Android => "xml",
            FileFormat::Ios => "strings",
        }
    }

    /// Directory under a locale that holds this format's files. Also used as
    /// the leading token of worksheet column headers.
    pub fn directory_name(&self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Android => "Android",
            FileFormat::Ios => "iOS",
        }
    }

    /// iOS files commonly use the source text as its own key.
    pub fn allows_name_as_value(&self) -> bool {
        matches!(self, FileFormat::Ios)
    }

    /// Finds the format whose file extension matches `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<FileFormat> {
        let ext = path.as_ref().extension()?.to_str()?;
        FileFormat::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }

    /// Resolves a worksheet header cell such as `"Android path"` by its
    /// leading token.
    pub fn from_header_cell(cell: &str) -> Option<FileFormat> {
        cell.split_whitespace().next()?.parse().ok()
    }

    /// Parses one file of this format.
    pub fn parse_file<P: AsRef<Path>>(
        &self,
        path: P,
        json_config: &JsonConfig,
    ) -> Result<Container, Error> {
        let path = path.as_ref();
        let parsed = match self {
            FileFormat::Json => JsonFile::read_from(path, json_config).map(Container::Json),
            FileFormat::Android => AndroidStringsFormat::read_from(path).map(|f| {
                let (entries, retained) = f.split_translatable();
                Container::Android { entries, retained }
            }),
            FileFormat::Ios => {
                StringsFormat::read_from(path).map(|f| Container::Entries(f.into_entries()))
            }
        };
        parsed.map_err(|e| e.in_file(path.display().to_string()))
    }
}

/// Implements [`std::fmt::Display`] for [`FileFormat`] using the directory
/// names `JSON`, `Android` and `iOS`.
impl Display for FileFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.directory_name())
    }
}

/// Accepts the following case-insensitive strings:
/// - `"json"` → `FileFormat::Json`
/// - `"android"`, `"xml"` → `FileFormat::Android`
/// - `"ios"`, `"strings"` → `FileFormat::Ios`
///
/// # Example
/// ```rust
/// use stringpacket::formats::FileFormat;
/// use std::str::FromStr;
/// assert_eq!(FileFormat::from_str("iOS").unwrap(), FileFormat::Ios);
/// assert!(FileFormat::from_str("po").is_err());
/// ```
impl FromStr for FileFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "json" => Ok(FileFormat::Json),
            "android" | "xml" => Ok(FileFormat::Android),
            "ios" | "strings" => Ok(FileFormat::Ios),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// The parsed contents of one localization file.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    /// A flat list of entries (Android and iOS).
    Entries(Vec<StringEntry>),
    /// Android strings. `retained` holds the `translatable="false"` strings
    /// and the non-string resources, which stay out of the packet but survive
    /// a rewrite of the file.
    Android {
        entries: Vec<StringEntry>,
        retained: AndroidStringsFormat,
    },
    /// A JSON document together with the strings extracted from it.
    Json(JsonFile),
}

impl Container {
    pub fn entries(&self) -> &[StringEntry] {
        match self {
            Container::Entries(entries) | Container::Android { entries, .. } => entries,
            Container::Json(file) => &file.strings,
        }
    }

    pub fn entries_mut(&mut self) -> &mut Vec<StringEntry> {
        match self {
            Container::Entries(entries) | Container::Android { entries, .. } => entries,
            Container::Json(file) => &mut file.strings,
        }
    }

    /// Drops content that belongs only in the template locale.
    pub fn into_translatable(self) -> Container {
        match self {
            Container::Android { entries, .. } => Container::Entries(entries),
            other => other,
        }
    }

    /// Serializes the container as `format`.
    ///
    /// A JSON file can only be produced from a JSON container, since the
    /// entries alone do not describe the rest of the document.
    pub fn encode(&self, format: FileFormat) -> Result<Vec<u8>, Error> {
        match (format, self) {
            (FileFormat::Json, Container::Json(file)) => file.to_bytes(),
            (FileFormat::Json, _) => Err(Error::UnsupportedFormat(
                "a JSON file can only be written from a JSON template".to_string(),
            )),
            (FileFormat::Android, Container::Android { entries, retained }) => {
                let mut format = AndroidStringsFormat::from_entries(entries.clone());
                format.extend(retained);
                format.to_bytes()
            }
            (FileFormat::Android, container) => {
                AndroidStringsFormat::from_entries(container.entries().to_vec()).to_bytes()
            }
            (FileFormat::Ios, container) => {
                StringsFormat::from_entries(container.entries().to_vec()).to_bytes()
            }
        }
    }
}
