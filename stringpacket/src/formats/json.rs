//! Support for JSON documents with user-facing text embedded in them.
//!
//! Only string values stored under one of the configured localized keys are
//! extracted. Each extracted string is named by its key path, with path
//! segments (object keys and array indexes) joined by the configured
//! separator, e.g. `notices|0|text`. Writing puts the values back at those
//! paths and leaves the rest of the document untouched.

use std::path::Path;

use serde_json::{Map, Value};

use crate::{config::JsonConfig, error::Error, types::StringEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct JsonFile {
    /// The complete document, in its original key order.
    pub json: Value,
    /// The localized strings found in the document.
    pub strings: Vec<StringEntry>,
    separator: String,
}

impl JsonFile {
    pub fn from_value(json: Value, config: &JsonConfig) -> Self {
        let mut strings = Vec::new();
        if let Value::Object(map) = &json {
            flatten_object(map, "", config, &mut strings);
        }
        Self {
            json,
            strings,
            separator: config.separator.clone(),
        }
    }

    pub fn from_str(s: &str, config: &JsonConfig) -> Result<Self, Error> {
        let json: Value = serde_json::from_str(s)?;
        Ok(Self::from_value(json, config))
    }

    pub fn read_from<P: AsRef<Path>>(path: P, config: &JsonConfig) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_str(&text, config)
    }

    /// The document with the current `strings` written back into it.
    pub fn to_value(&self) -> Value {
        let mut json = self.json.clone();
        for entry in &self.strings {
            let path = entry.name.split(self.separator.as_str()).collect::<Vec<_>>();
            replace_at(&mut json, &path, &entry.value);
        }
        json
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut out = serde_json::to_vec_pretty(&self.to_value())?;
        out.push(b'\n');
        Ok(out)
    }
}

fn flatten_object(
    map: &Map<String, Value>,
    path: &str,
    config: &JsonConfig,
    out: &mut Vec<StringEntry>,
) {
    let sep = config.separator.as_str();
    for (key, value) in map {
        let level_key = format!("{path}{key}");
        match value {
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if let Value::Object(obj) = item {
                        flatten_object(obj, &format!("{level_key}{sep}{idx}{sep}"), config, out);
                    }
                }
            }
            Value::Object(obj) => flatten_object(obj, &format!("{level_key}{sep}"), config, out),
            Value::String(s) if config.is_localized_key(key) => {
                out.push(StringEntry::new(level_key, s.clone()));
            }
            _ => {}
        }
    }
}

/// Writes `value` at `path`. Paths that no longer resolve to a string are
/// left alone.
fn replace_at(node: &mut Value, path: &[&str], value: &str) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    let child = match node {
        Value::Object(map) => map.get_mut(*head),
        Value::Array(items) => head.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    };
    let Some(child) = child else {
        return;
    };
    if rest.is_empty() {
        if child.is_string() {
            *child = Value::String(value.replace("\\n", "\n"));
        }
    } else {
        replace_at(child, rest, value);
    }
}
