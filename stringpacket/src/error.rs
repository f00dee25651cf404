//! All error types for the stringpacket crate.
//!
//! These are returned from all fallible operations (tree loading, parsing,
//! worksheet import, merging and writing output files).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A worksheet or deliverable is missing required columns, or a row is
    /// shorter than the columns the header promised.
    #[error("malformed table: {0}")]
    Structure(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a new structural error for a deliverable or worksheet.
    pub fn structure(message: impl Into<String>) -> Self {
        Error::Structure(message.into())
    }

    /// Wraps an error with the file it came from.
    pub fn in_file(self, path: impl Into<String>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Config(value.to_string())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(value: tempfile::PersistError) -> Self {
        Error::Io(value.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unknown_format_error() {
        let error = Error::UnknownFormat("yaml".to_string());
        assert_eq!(error.to_string(), "unknown format `yaml`");
    }

    #[test]
    fn test_parse_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::Parse(json_error);
        assert!(error.to_string().contains("parse error"));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_structure_error() {
        let error = Error::structure("missing `English` column");
        assert_eq!(
            error.to_string(),
            "malformed table: missing `English` column"
        );
    }

    #[test]
    fn test_error_in_file_names_path() {
        let error = Error::InvalidResource("string tag missing 'name'".to_string())
            .in_file("en/Android/strings.xml");
        let display = error.to_string();
        assert!(display.starts_with("en/Android/strings.xml: "));
        assert!(display.contains("missing 'name'"));
    }

    #[test]
    fn test_config_error_from_toml() {
        let toml_error = toml::from_str::<toml::Value>("template_locale = ").unwrap_err();
        let error = Error::from(toml_error);
        assert!(error.to_string().starts_with("configuration error"));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnknownFormat("test".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnknownFormat"));
        assert!(debug.contains("test"));
    }
}
