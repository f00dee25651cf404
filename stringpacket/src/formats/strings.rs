//! Support for the iOS `.strings` localization format.
//!
//! Provides parsing and serialization of `"key" = "value";` pairs with an
//! optional comment on the preceding line.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::Error, traits::Parser, types::StringEntry};

lazy_static! {
    // "key" = "value";  with backslash escapes allowed inside either side.
    static ref PAIR_REGEX: Regex =
        Regex::new(r#"^"((?:[^"\\]|\\.)*)"\s*=\s*"((?:[^"\\]|\\.)*)"\s*;"#).unwrap();
}

/// Represents an iOS `.strings` localization file.
///
/// The format consists of a set of key-value pairs, with optional comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    /// All key-value pairs (and optional comments) in the file.
    pub pairs: Vec<Pair>,
}

impl Format {
    pub fn from_entries(entries: Vec<StringEntry>) -> Self {
        Self {
            pairs: entries.into_iter().map(Pair::from).collect(),
        }
    }

    pub fn into_entries(self) -> Vec<StringEntry> {
        self.pairs.into_iter().map(StringEntry::from).collect()
    }

    /// Folds values that span several lines into one line, joining the
    /// lines with a `\n` escape and dropping their leading indentation.
    pub fn multiline_values_to_one_line(content: &mut String) {
        let orig = std::mem::take(content);
        let mut result = String::with_capacity(orig.len());

        let mut chars = orig.chars().peekable();
        let mut inside_value = false;
        let mut value_buf = String::new();

        while let Some(c) = chars.next() {
            if !inside_value {
                result.push(c);
                if c == '=' {
                    // Seek first quote after '='
                    while let Some(&d) = chars.peek() {
                        result.push(d);
                        chars.next();
                        if d == '"' {
                            inside_value = true;
                            value_buf.clear();
                            break;
                        }
                    }
                }
            } else if c == '"' {
                let prev_backslashes = value_buf.chars().rev().take_while(|&x| x == '\\').count();
                if prev_backslashes % 2 == 0 {
                    inside_value = false;
                    let value_one_line = value_buf
                        .lines()
                        .map(str::trim_start)
                        .collect::<Vec<_>>()
                        .join(r"\n");
                    result.push_str(&value_one_line);
                    result.push('"');
                    value_buf.clear();
                } else {
                    value_buf.push('"');
                }
            } else {
                value_buf.push(c);
            }
        }

        *content = result;
    }
}

impl Parser for Format {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let mut file_content = reader.lines().collect::<Result<Vec<_>, _>>()?.join("\n");

        Format::multiline_values_to_one_line(&mut file_content);

        let mut pairs = Vec::new();
        let mut last_comment: Option<String> = None;
        let mut open_block: Option<String> = None;

        for line in file_content.lines() {
            let trimmed = line.trim();

            if let Some(block) = open_block.as_mut() {
                block.push('\n');
                block.push_str(trimmed);
                if trimmed.ends_with("*/") {
                    last_comment = open_block.take().map(|b| strip_comment_markers(&b));
                }
                continue;
            }

            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with("/*") {
                if trimmed.ends_with("*/") && trimmed.len() >= 4 {
                    last_comment = Some(strip_comment_markers(trimmed));
                } else {
                    open_block = Some(trimmed.to_string());
                }
                continue;
            }
            if trimmed.starts_with("//") {
                last_comment = Some(strip_comment_markers(trimmed));
                continue;
            }

            let Some(caps) = PAIR_REGEX.captures(trimmed) else {
                tracing::debug!(line = trimmed, "ignoring malformed .strings line");
                last_comment = None;
                continue;
            };

            pairs.push(Pair {
                key: caps[1].to_string(),
                value: caps[2].to_string(),
                comment: last_comment.take(),
            });
        }

        Ok(Format { pairs })
    }

    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        let content = self
            .pairs
            .iter()
            .map(|pair| format!("{}\n", pair))
            .collect::<Vec<_>>()
            .join("\n");

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }

    /// Override default file reading to support BOM-aware decoding (e.g., UTF-16 .strings)
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        // Auto-detect BOM, decode to UTF-8; passthrough UTF-8
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}

/// A single key-value pair in a `.strings` file, possibly with an associated comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// The key for this localization entry. An empty key is written as the value.
    pub key: String,
    /// The value for this localization entry.
    pub value: String,
    /// Comment text without its `/* */` or `//` markers.
    ///
    /// Only comments that immediately precede a key-value pair are attached to it.
    pub comment: Option<String>,
}

impl From<StringEntry> for Pair {
    fn from(entry: StringEntry) -> Self {
        Pair {
            key: entry.name,
            value: entry.value,
            comment: entry.comment,
        }
    }
}

impl From<Pair> for StringEntry {
    fn from(pair: Pair) -> Self {
        StringEntry {
            name: pair.key,
            value: pair.value,
            comment: pair.comment,
        }
    }
}

fn strip_comment_markers(comment: &str) -> String {
    let comment = comment.trim();
    if let Some(inner) = comment
        .strip_prefix("/*")
        .and_then(|c| c.strip_suffix("*/"))
    {
        inner.trim().to_string()
    } else if let Some(inner) = comment.strip_prefix("//") {
        inner.trim().to_string()
    } else {
        comment.to_string()
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            writeln!(f, "/* {} */", comment.replace("*/", "* /"))?;
        }
        let key = if self.key.is_empty() {
            &self.value
        } else {
            &self.key
        };
        write!(f, "\"{}\" = \"{}\";", escape(key), escape(&self.value))
    }
}

/// Escapes bare double quotes and real newlines. Existing escapes are kept,
/// and a dangling backslash at the end is doubled so it cannot escape the
/// closing quote.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    let mut backslashes = 0usize;
    for c in text.chars() {
        match c {
            '"' if backslashes % 2 == 0 => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
    }
    if backslashes % 2 == 1 {
        out.push('\\');
    }
    out
}
