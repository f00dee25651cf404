use std::path::{Path, PathBuf};

use stringpacket::{Config, Project, SourceScanner, fsutil::expand_home};

use crate::validation::{resolve_base_dir, validate_file_path, validate_locale};

/// Loads `--config` when given, else `<base>/stringpacket.toml`, else the
/// defaults.
pub fn load_config(base: &Path, config: Option<&str>) -> Result<Config, String> {
    match config {
        Some(path) => {
            let path = expand_home(path);
            validate_file_path(&path)?;
            tracing::debug!(path = %path.display(), "using configuration file");
            Config::read_from(&path).map_err(|e| format!("Error reading configuration: {}", e))
        }
        None => Config::discover(base).map_err(|e| format!("Error reading configuration: {}", e)),
    }
}

pub fn run_build_worksheet_command(dir: Option<&str>, config: Option<&str>) -> Result<(), String> {
    let base = resolve_base_dir(dir)?;
    let config = load_config(&base, config)?;

    println!("Building translation packet from {}", base.join(&config.template_locale).display());
    let mut project = Project::open(&base, config)
        .map_err(|e| format!("Error reading source files: {}", e))?;
    let (path, rows) = project
        .build_worksheet()
        .map_err(|e| format!("Error writing worksheet: {}", e))?;

    println!("✅ Wrote {} rows to {}", rows, path.display());
    Ok(())
}

pub fn run_clean_source_command(dir: Option<&str>, config: Option<&str>) -> Result<(), String> {
    let base = resolve_base_dir(dir)?;
    let config = load_config(&base, config)?;

    let mut project = Project::new(&base, config);
    println!("Cleaning source strings in {}", project.template_dir().display());
    let report = project
        .clean_source()
        .map_err(|e| format!("Error cleaning source files: {}", e))?;

    println!(
        "✅ Cleaned {} of {} files",
        report.rewritten, report.scanned
    );
    Ok(())
}

pub fn run_import_deliverable_command(
    dir: Option<&str>,
    input: Option<&str>,
    locale: Option<&str>,
    config: Option<&str>,
) -> Result<(), String> {
    let base = resolve_base_dir(dir)?;
    let config = load_config(&base, config)?;
    if let Some(locale) = locale {
        validate_locale(locale)?;
    }

    let mut project = Project::open(&base, config)
        .map_err(|e| format!("Error reading source files: {}", e))?;

    let inputs: Vec<PathBuf> = match input {
        Some(input) => {
            let path = expand_home(input);
            validate_file_path(&path)?;
            vec![path]
        }
        None => {
            if locale.is_some() {
                return Err("--locale requires --input".to_string());
            }
            project
                .deliverable_files()
                .map_err(|e| format!("Error listing deliverables: {}", e))?
        }
    };
    if inputs.is_empty() {
        println!("No deliverables found in {}", base.display());
        return Ok(());
    }

    let mut total = 0;
    for input in &inputs {
        println!("Importing {}", input.display());
        let written = project
            .import_deliverable(input, locale)
            .map_err(|e| format!("Error importing {}: {}", input.display(), e))?;
        for path in &written {
            println!("  wrote {}", path.display());
        }
        total += written.len();
    }

    println!(
        "✅ Imported {} deliverable(s), wrote {} file(s)",
        inputs.len(),
        total
    );
    Ok(())
}

pub fn run_scan_source_command(
    dir: Option<&str>,
    locale: Option<&str>,
    config: Option<&str>,
) -> Result<(), String> {
    let base = resolve_base_dir(dir)?;
    let config = load_config(&base, config)?;
    let locale = locale.unwrap_or(&config.template_locale);
    validate_locale(locale)?;

    println!("Scanning Swift sources in {}", base.display());
    let scanner = SourceScanner::new(config.scanner.keywords.clone());
    let (path, added) = scanner
        .scan_into_strings_file(&base, locale)
        .map_err(|e| format!("Error scanning sources: {}", e))?;

    println!("✅ Added {} string(s) to {}", added, path.display());
    Ok(())
}
