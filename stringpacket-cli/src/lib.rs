//! CLI library for testing purposes

pub mod commands;
pub mod validation;

pub use commands::{
    load_config, run_build_worksheet_command, run_clean_source_command,
    run_import_deliverable_command, run_scan_source_command,
};
