use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

// @module: File and directory utilities

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());
static SQUEEZE_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Write a string to a file atomically: serialize into a temp file in the
    /// same directory, then rename over the target. A crash mid-write never
    /// leaves a truncated file visible.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = path.parent().unwrap_or(Path::new("."));
        Self::ensure_dir(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

        use std::io::Write;
        tmp.write_all(content.as_bytes())
            .context("Failed to write temp file content")?;

        tmp.persist(path)
            .with_context(|| format!("Failed to replace file atomically: {}", path.display()))?;

        Ok(())
    }

    /// Turn a display name into a filesystem-safe folder name.
    /// Quotes and backticks are dropped entirely, any other non-alphanumeric
    /// run becomes a single underscore.
    pub fn sanitize_folder_name(name: &str) -> String {
        if name.is_empty() {
            return "Unknown".to_string();
        }

        let stripped: String = name
            .chars()
            .filter(|c| !matches!(c, '`' | '\'' | '\u{2019}'))
            .collect();

        let replaced = NON_ALNUM.replace_all(&stripped, "_");
        let squeezed = SQUEEZE_UNDERSCORE.replace_all(&replaced, "_");
        let trimmed = squeezed.trim_matches('_');

        if trimmed.is_empty() {
            "Unknown".to_string()
        } else {
            trimmed.to_string()
        }
    }
}
