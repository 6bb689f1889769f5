//! Path utilities: expand ~, validate absolute paths, photo files.

use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// A captured face photo: the file must exist and be non-empty.
/// Returns the path as it will be stored on the record.
pub fn require_photo(path: Option<&str>) -> AppResult<String> {
    let raw = path
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::invalid("face photo", "a face photo must be captured first"))?;

    let p = expand_tilde(raw);
    let meta = fs::metadata(&p)
        .map_err(|_| AppError::invalid("face photo", format!("{} not found", p.display())))?;

    if !meta.is_file() || meta.len() == 0 {
        return Err(AppError::invalid(
            "face photo",
            format!("{} is empty or not a file", p.display()),
        ));
    }

    Ok(p.to_string_lossy().to_string())
}
