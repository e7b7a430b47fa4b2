// Utility functions

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// =============================================================================
// Path Helpers
// =============================================================================

/// Name of the per-user data directory under the home directory
pub const APP_DIR_NAME: &str = ".diagnosis";

/// Get the ~/.diagnosis directory path.
///
/// Returns `None` when the home directory cannot be determined.
#[inline]
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR_NAME))
}

/// Get the ~/.diagnosis/config.toml path
#[inline]
pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("config.toml"))
}

/// Get the ~/.diagnosis/templates directory path
#[inline]
pub fn templates_dir() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("templates"))
}

/// Get the ~/.diagnosis/pending_diagnosis.json path
#[inline]
pub fn pending_diagnosis_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("pending_diagnosis.json"))
}

/// Create a directory and its parents if missing
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write a file atomically: write to a sibling temp file, then rename.
///
/// Readers never observe a half-written file.
pub fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&tmp_path, contents)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

// =============================================================================
// Error helpers
// =============================================================================

/// Extension trait for Result that provides convenient error context methods.
/// Converts any error to a String with a descriptive message prefix.
///
/// # Example
/// ```ignore
/// use crate::utils::ResultExt;
///
/// let file = std::fs::read_to_string("config.toml")
///     .with_context("Failed to read config file")?;
/// ```
pub trait ResultExt<T> {
    /// Converts the error to a String with context message.
    fn with_context(self, msg: &str) -> Result<T, String>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn with_context(self, msg: &str) -> Result<T, String> {
        self.map_err(|e| format!("{}: {}", msg, e))
    }
}

// =============================================================================
// Text helpers
// =============================================================================

/// Mask a secret for display: the first 8 characters followed by "...",
/// or "NOT SET" when there is no secret.
pub fn mask_secret(secret: Option<&str>) -> String {
    match secret.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => format!("{}...", s.chars().take(8).collect::<String>()),
        None => "NOT SET".to_string(),
    }
}

/// Lowercase, hyphen-separated form of a label ("Retail & Moda" -> "retail-moda")
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
