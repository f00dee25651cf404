//! The translation packet: one row per distinct source text, across formats.
//!
//! Rows are reconciled by their English text, compared case-insensitively
//! and otherwise exactly. Strings that differ only by punctuation or
//! whitespace get separate rows.

use std::collections::{BTreeMap, HashMap};

use crate::{
    cleaner::replace_apostrophes,
    error::Error,
    formats::FileFormat,
    placeholder::ios_to_mobile,
    tree::SourceTree,
    types::StringEntry,
};

/// Where one format keeps a row's string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathName {
    pub path: String,
    /// Key inside the file. Empty for iOS strings keyed by their own text.
    pub name: String,
}

impl PathName {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// One reconciled translatable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketRow {
    /// Canonical source text; the merge key.
    pub english: String,
    pub keys: BTreeMap<FileFormat, PathName>,
    pub translation: Option<String>,
    pub comment: Option<String>,
}

impl PacketRow {
    pub fn new(english: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            keys: BTreeMap::new(),
            translation: None,
            comment: None,
        }
    }

    pub fn with_key(mut self, format: FileFormat, key: PathName) -> Self {
        self.keys.insert(format, key);
        self
    }
}

/// Ordered rows, first-seen order across formats then files then entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    rows: Vec<PacketRow>,
    index: HashMap<String, usize>,
}

fn fold_case(english: &str) -> String {
    english.to_lowercase()
}

impl Packet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a packet from prepared rows. Rows whose English text collides
    /// case-insensitively with an earlier row are rejected.
    pub fn from_rows(rows: Vec<PacketRow>) -> Result<Self, Error> {
        let mut packet = Packet::new();
        for row in rows {
            let key = fold_case(&row.english);
            if packet.index.contains_key(&key) {
                return Err(Error::DataMismatch(format!(
                    "duplicate packet row for {:?}",
                    row.english
                )));
            }
            packet.index.insert(key, packet.rows.len());
            packet.rows.push(row);
        }
        Ok(packet)
    }

    pub fn rows(&self) -> &[PacketRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds the row for `english`, ignoring case.
    pub fn find(&self, english: &str) -> Option<&PacketRow> {
        self.index.get(&fold_case(english)).map(|&i| &self.rows[i])
    }

    fn row_for(&mut self, english: &str) -> &mut PacketRow {
        let key = fold_case(english);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.rows.push(PacketRow::new(english));
                self.index.insert(key, self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx]
    }
}

/// Folds a [`SourceTree`] into a [`Packet`].
#[derive(Debug, Clone, Default)]
pub struct PacketBuilder;

impl PacketBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, tree: &SourceTree) -> Packet {
        let mut packet = Packet::new();
        for format in FileFormat::ALL {
            for (path, container) in tree.files(format) {
                for entry in container.entries() {
                    self.add_entry(&mut packet, format, path, entry);
                }
            }
        }
        tracing::debug!(
            rows = packet.len(),
            strings = tree.entry_count(),
            "built translation packet"
        );
        packet
    }

    /// Adds one entry of `format` found in the file at `path`.
    pub fn add_entry(&self, packet: &mut Packet, format: FileFormat, path: &str, entry: &StringEntry) {
        let english = english_text(format, &entry.value);
        let name = if format.allows_name_as_value() && entry.name == entry.value {
            String::new()
        } else {
            entry.name.clone()
        };

        let row = packet.row_for(&english);
        let key = PathName::new(path, name);
        if let Some(previous) = row.keys.get(&format).filter(|prev| **prev != key) {
            tracing::debug!(
                %format,
                english = %row.english,
                previous_path = %previous.path,
                previous_name = %previous.name,
                path = %key.path,
                name = %key.name,
                "string appears twice in one format; keeping the later location"
            );
        }
        row.keys.insert(format, key);

        if let Some(comment) = entry.non_empty_comment() {
            row.comment = Some(comment.to_string());
        }
    }
}

/// The packet's English text for a value found in a `format` file.
pub fn english_text(format: FileFormat, value: &str) -> String {
    match format {
        FileFormat::Android => replace_apostrophes(value),
        FileFormat::Ios => ios_to_mobile(value),
        FileFormat::Json => value.to_string(),
    }
}
