#![forbid(unsafe_code)]
//! Translation packets for apps localized across JSON, Android and iOS.
//!
//! The same user-facing text usually lives in several places: an Android
//! `strings.xml`, an iOS `Localizable.strings` and a few JSON documents.
//! `stringpacket` reconciles those files into a single worksheet with one row
//! per distinct English string, and brings the translator's deliverable back
//! into per-locale files for every format.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stringpacket::{Config, Project};
//!
//! let mut project = Project::open("Localization", Config::default())?;
//!
//! // Writes Localization/TranslationPacket.tsv from Localization/en/…
//! let (worksheet, rows) = project.build_worksheet()?;
//! println!("{} rows in {}", rows, worksheet.display());
//!
//! // Reads Localization/es.html and writes Localization/es/… and Localization/en/…
//! let written = project.import_deliverable("Localization/es.html", None)?;
//! # Ok::<(), stringpacket::Error>(())
//! ```
//!
//! # Source layout
//!
//! `<base>/<template locale>/<Format>/<relative path>`, where `<Format>` is
//! `JSON`, `Android` or `iOS`. Imported files are written to the same layout
//! under each locale.
//!
//! # Untranslated strings
//!
//! Any string without a real translation is written with the value
//! [`NO_TRANSLATION`] (`"NO TRANSLATION FOUND"`), never with a guessed one.

pub mod cleaner;
pub mod config;
pub mod deliverable;
pub mod error;
pub mod formats;
pub mod fsutil;
pub mod merge;
pub mod packet;
pub mod placeholder;
pub mod project;
pub mod scanner;
pub mod traits;
pub mod tree;
pub mod types;
pub mod worksheet;

// Re-export most used types for easy consumption
pub use crate::{
    cleaner::{CleanReport, Cleaner, clean},
    config::Config,
    deliverable::{Deliverable, parse_html, parse_rows, parse_tsv},
    error::Error,
    formats::{Container, FileFormat},
    merge::{MergeReport, merge, merge_with_report},
    packet::{Packet, PacketBuilder, PacketRow, PathName},
    project::Project,
    scanner::SourceScanner,
    tree::SourceTree,
    types::{FileIdentifier, NO_TRANSLATION, StringEntry, TEMPLATE_LOCALE, WORKSHEET_FILE_NAME},
    worksheet::{serialize, write_worksheet},
};
