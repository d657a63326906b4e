//! JSON export of entries written by the awards web application.
//!
//! The export is a JSON array of [`Entry`] objects. Loading validates the
//! slot limit so nothing downstream has to.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::entry::{Entry, MAX_ENTRANT_SLOTS};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("entry export not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read entry export: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("entry {entry_num} has {count} entrant slots (max 5)")]
    TooManySlots { entry_num: String, count: usize },
}

/// Entries loaded from one export file.
#[derive(Debug, Clone, Default)]
pub struct EntryExport {
    entries: Vec<Entry>,
}

impl EntryExport {
    /// Read and validate an export file.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        if !path.exists() {
            return Err(ExportError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let export = Self::from_json(&text)?;
        info!(count = export.entries.len(), path = %path.display(), "loaded entry export");
        Ok(export)
    }

    pub fn from_json(text: &str) -> Result<Self, ExportError> {
        let entries: Vec<Entry> = serde_json::from_str(text)?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, ExportError> {
        if let Some(bad) = entries.iter().find(|e| e.slots.len() > MAX_ENTRANT_SLOTS) {
            return Err(ExportError::TooManySlots {
                entry_num: bad.entry_num.clone(),
                count: bad.slots.len(),
            });
        }
        Ok(Self { entries })
    }

    /// Entry by local id.
    pub fn get(&self, id: i64) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
