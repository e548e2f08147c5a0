//! Durable persistence of the journal between sessions.
//!
//! The journal document is written after every committed mutation and read
//! once at session start. Persistence is best-effort: a failing store
//! degrades the session to in-memory-only operation, it never fails an
//! edit.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::WireModification;
use crate::journal::{ModificationJournal, ModificationRecord};

/// Persistence error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("journal store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The persisted journal document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalDocument {
    #[serde(default)]
    pub base_solution: Option<String>,
    #[serde(default)]
    pub modifications: Vec<WireModification>,
    pub last_updated: DateTime<Utc>,
}

impl JournalDocument {
    /// Captures the journal's active records for persistence.
    pub fn from_journal(journal: &ModificationJournal, base_solution: Option<&str>) -> Self {
        Self {
            base_solution: base_solution.map(str::to_owned),
            modifications: journal.records().iter().map(WireModification::from).collect(),
            last_updated: Utc::now(),
        }
    }

    /// Validates the persisted entries back into records, counting the ones
    /// that no longer parse.
    pub fn into_records(self) -> (Vec<ModificationRecord>, usize) {
        let mut records = Vec::with_capacity(self.modifications.len());
        let mut skipped = 0;
        for wire in self.modifications {
            match ModificationRecord::try_from(wire) {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }
        (records, skipped)
    }
}

/// Where the journal document lives between sessions.
pub trait JournalStore {
    /// Reads the persisted document. `Ok(None)` when nothing was persisted
    /// yet.
    fn load(&self) -> Result<Option<JournalDocument>, StoreError>;

    /// Writes the document, replacing any previous one.
    fn save(&mut self, doc: &JournalDocument) -> Result<(), StoreError>;
}

/// JSON file-backed store.
#[derive(Debug, Clone)]
pub struct FileJournalStore {
    path: PathBuf,
}

impl FileJournalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JournalStore for FileJournalStore {
    fn load(&self) -> Result<Option<JournalDocument>, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&mut self, doc: &JournalDocument) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryJournalStore {
    doc: Option<JournalDocument>,
    fail_saves: bool,
}

impl MemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, for exercising degraded
    /// persistence.
    pub fn failing() -> Self {
        Self {
            doc: None,
            fail_saves: true,
        }
    }

    pub fn with_document(doc: JournalDocument) -> Self {
        Self {
            doc: Some(doc),
            fail_saves: false,
        }
    }

    pub fn document(&self) -> Option<&JournalDocument> {
        self.doc.as_ref()
    }
}

impl JournalStore for MemoryJournalStore {
    fn load(&self) -> Result<Option<JournalDocument>, StoreError> {
        Ok(self.doc.clone())
    }

    fn save(&mut self, doc: &JournalDocument) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "writes disabled",
            )));
        }
        self.doc = Some(doc.clone());
        Ok(())
    }
}
