//! Run configuration.
//!
//! Everything that used to be a hard-coded lookup table (localized JSON keys,
//! inline HTML tags, source keywords) lives here and is handed to the
//! builders explicitly, so two configurations never interfere.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    types::{TEMPLATE_LOCALE, WORKSHEET_FILE_NAME},
};

/// Name of the optional configuration file looked up in the base directory.
pub const CONFIG_FILE_NAME: &str = "stringpacket.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Locale directory the packet is built from.
    pub template_locale: String,
    /// File name of the worksheet written into the base directory.
    pub worksheet_file_name: String,
    pub json: JsonConfig,
    pub cleaner: CleanerConfig,
    pub scanner: ScannerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_locale: TEMPLATE_LOCALE.to_string(),
            worksheet_file_name: WORKSHEET_FILE_NAME.to_string(),
            json: JsonConfig::default(),
            cleaner: CleanerConfig::default(),
            scanner: ScannerConfig::default(),
        }
    }
}

/// Which JSON keys hold user-facing text, and how nested key paths are joined.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JsonConfig {
    pub localized_keys: Vec<String>,
    pub separator: String,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            localized_keys: vec!["title".into(), "detail".into(), "text".into()],
            separator: "|".to_string(),
        }
    }
}

impl JsonConfig {
    pub fn is_localized_key(&self, key: &str) -> bool {
        self.localized_keys.iter().any(|k| k == key)
    }
}

/// Inline markup tags that must be escaped in Android resources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub html_tags: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            html_tags: vec!["b".into(), "u".into()],
        }
    }
}

/// Call sites the source scanner treats as carrying a localizable literal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub keywords: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            keywords: vec![
                "Text".into(),
                "Label".into(),
                "NSLocalizedString".into(),
                "Button".into(),
                "LocalizedStringKey".into(),
            ],
        }
    }
}

impl Config {
    /// Parses a TOML document. Missing fields fall back to the defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| e.in_file(path.display().to_string()))
    }

    /// Loads `<base>/stringpacket.toml` if it exists, otherwise the defaults.
    pub fn discover<P: AsRef<Path>>(base: P) -> Result<Self, Error> {
        let candidate = base.as_ref().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading configuration");
            Self::read_from(candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.template_locale.trim().is_empty() {
            return Err(Error::Config("template_locale must not be empty".into()));
        }
        if self.json.separator.is_empty() {
            return Err(Error::Config("json.separator must not be empty".into()));
        }
        if self.worksheet_file_name.trim().is_empty() {
            return Err(Error::Config("worksheet_file_name must not be empty".into()));
        }
        Ok(())
    }
}
