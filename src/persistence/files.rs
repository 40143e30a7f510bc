use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Get the perch data directory - a per-user application-data location,
/// overridable through PERCH_DATA_DIR (used by tests and portable installs)
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("PERCH_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let base = dirs::data_dir().context("Could not determine user data directory")?;
    Ok(base.join("perch"))
}

/// Ensure the data directory exists
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = get_data_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Get path to the task tree file (tasks.json)
pub fn tasks_file() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("tasks.json"))
}

/// Get path to the plain-text notes file (notes.txt)
pub fn notes_file() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("notes.txt"))
}

/// Get path to the settings file (settings.json)
pub fn settings_file() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("settings.json"))
}

/// Get path to the single-instance lock file
pub fn lock_file() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("perch.lock"))
}

/// Get path to the rotating log directory
pub fn log_dir() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("logs"))
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    // Create temp file in the same directory
    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    // Write content
    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    // Sync to disk
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    // Atomically rename temp file to target
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
