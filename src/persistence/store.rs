use crate::domain::{Document, Task};
use crate::persistence::files::atomic_write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for document storage operations.
///
/// A missing file is never an error - it is the expected first-run state and
/// the load functions return an empty value for it. These variants cover the
/// genuinely broken cases, all of which are recoverable: the caller logs,
/// notifies, and falls back to an empty in-memory document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read task file {path}: {source}")]
    ReadTasks {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("task file {path} is not valid JSON: {source}")]
    CorruptTasks {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not read notes file {path}: {source}")]
    ReadNotes {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {reason}")]
    Write {
        path: PathBuf,
        reason: anyhow::Error,
    },
}

/// Serializes the document to two artifacts in the data directory: a JSON
/// tree file for the tasks and a plain text file for the notes. Both are
/// always written in full; there is no cross-file atomicity between them.
pub struct Store {
    tasks_path: PathBuf,
    notes_path: PathBuf,
}

impl Store {
    pub fn new(tasks_path: impl Into<PathBuf>, notes_path: impl Into<PathBuf>) -> Self {
        Self {
            tasks_path: tasks_path.into(),
            notes_path: notes_path.into(),
        }
    }

    pub fn tasks_path(&self) -> &Path {
        &self.tasks_path
    }

    pub fn notes_path(&self) -> &Path {
        &self.notes_path
    }

    /// Load the task forest. Absent file means first run: empty forest.
    pub fn load_tasks(&self) -> Result<Vec<Task>, StoreError> {
        if !self.tasks_path.exists() {
            return Ok(Vec::new());
        }

        let content =
            std::fs::read_to_string(&self.tasks_path).map_err(|source| StoreError::ReadTasks {
                path: self.tasks_path.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| StoreError::CorruptTasks {
            path: self.tasks_path.clone(),
            source,
        })
    }

    /// Load the notes text. Absent file means first run: empty string.
    pub fn load_notes(&self) -> Result<String, StoreError> {
        if !self.notes_path.exists() {
            return Ok(String::new());
        }

        std::fs::read_to_string(&self.notes_path).map_err(|source| StoreError::ReadNotes {
            path: self.notes_path.clone(),
            source,
        })
    }

    /// Load the whole document, or report the first failure
    pub fn load(&self) -> Result<Document, StoreError> {
        Ok(Document::new(self.load_tasks()?, self.load_notes()?))
    }

    /// Write both artifacts in full, overwriting prior contents. Each file is
    /// written atomically on its own (temp + rename); the pair is not.
    pub fn save(&self, document: &Document) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(&document.tasks).map_err(|err| StoreError::Write {
                path: self.tasks_path.clone(),
                reason: err.into(),
            })?;

        atomic_write(&self.tasks_path, &json).map_err(|reason| StoreError::Write {
            path: self.tasks_path.clone(),
            reason,
        })?;

        atomic_write(&self.notes_path, &document.notes).map_err(|reason| StoreError::Write {
            path: self.notes_path.clone(),
            reason,
        })?;

        Ok(())
    }
}
