use std::path::{Path, PathBuf};

use stringpacket::fsutil::expand_home;

/// Resolves the base directory argument, defaulting to the current directory.
pub fn resolve_base_dir(dir: Option<&str>) -> Result<PathBuf, String> {
    let path = expand_home(dir.unwrap_or("."));
    validate_directory(&path)?;
    Ok(path)
}

/// Validate directory exists
pub fn validate_directory(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", path.display()));
    }
    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Validate file path exists and is readable
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }
    Ok(())
}

/// Validate a locale code such as `es`, `pt-BR` or `zh_Hant`.
///
/// The code becomes a directory name, so only ASCII letters, digits, `-`
/// and `_` are accepted, starting with a letter.
pub fn validate_locale(locale: &str) -> Result<(), String> {
    if locale.is_empty() {
        return Err("Locale code cannot be empty".to_string());
    }
    let starts_with_letter = locale.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid_chars = locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !starts_with_letter || !valid_chars || locale.ends_with(['-', '_']) {
        return Err(format!(
            "Invalid locale code: {}. Expected something like `es` or `pt-BR`",
            locale
        ));
    }
    Ok(())
}
