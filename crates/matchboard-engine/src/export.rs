//! Versioned export and import of the modification journal.
//!
//! The export document is the round-trip format for sharing edits between
//! sessions:
//!
//! ```text
//! { export_version: "1.0", exported_at, base_solution,
//!   modifications: [{ match_id, timestamp,
//!                     original: {semaine, horaire, gymnase} | null,
//!                     new:      {semaine, horaire, gymnase} | null,
//!                     reason, author }],
//!   statistics: { total_modifications, matches_modified } }
//! ```
//!
//! An unsupported version or a document without a `modifications` array
//! aborts the import wholesale; individually malformed entries inside a
//! valid document are skipped and counted instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use matchboard_core::{Assignment, AssignmentError, MatchId};

use crate::journal::{ModificationJournal, ModificationRecord};

/// Version written to, and required from, export documents.
pub const EXPORT_VERSION: &str = "1.0";

/// Error rejecting one wire modification entry.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("modification entry has no match_id")]
    MissingMatchId,

    #[error(transparent)]
    PartialSlot(#[from] AssignmentError),
}

/// Error aborting an import wholesale.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported export version '{0}' (expected '{EXPORT_VERSION}')")]
    UnsupportedVersion(String),

    #[error("malformed export document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Lenient wire form of a slot: fields are validated into an
/// [`Assignment`], never trusted individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireSlot {
    #[serde(rename = "semaine")]
    pub week: Option<u32>,
    #[serde(rename = "horaire")]
    pub time: Option<String>,
    #[serde(rename = "gymnase")]
    pub venue: Option<String>,
}

impl WireSlot {
    fn from_assignment(assignment: &Assignment) -> Option<Self> {
        assignment.slot().map(|slot| Self {
            week: Some(slot.week),
            time: Some(slot.time.clone()),
            venue: Some(slot.venue.to_string()),
        })
    }

    fn into_assignment(self) -> Result<Assignment, AssignmentError> {
        Assignment::from_parts(self.week, self.time, self.venue)
    }
}

/// Lenient wire form of one modification entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireModification {
    #[serde(default)]
    pub match_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub original: Option<WireSlot>,
    #[serde(default)]
    pub new: Option<WireSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl From<&ModificationRecord> for WireModification {
    fn from(record: &ModificationRecord) -> Self {
        Self {
            match_id: Some(record.match_id.to_string()),
            timestamp: Some(record.timestamp),
            original: WireSlot::from_assignment(&record.original),
            new: WireSlot::from_assignment(&record.new),
            reason: record.reason.clone(),
            author: Some(record.author.clone()),
        }
    }
}

impl TryFrom<WireModification> for ModificationRecord {
    type Error = RecordError;

    fn try_from(wire: WireModification) -> Result<Self, Self::Error> {
        let match_id = wire.match_id.ok_or(RecordError::MissingMatchId)?;
        let original = wire.original.unwrap_or_default().into_assignment()?;
        let new = wire.new.unwrap_or_default().into_assignment()?;
        Ok(ModificationRecord {
            match_id: MatchId::new(match_id),
            // Entries from older tools may omit the timestamp; stamping the
            // import time keeps the record usable.
            timestamp: wire.timestamp.unwrap_or_else(Utc::now),
            original,
            new,
            author: wire.author.unwrap_or_else(|| "unknown".to_owned()),
            reason: wire.reason,
        })
    }
}

/// Aggregate counters written into the export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStatistics {
    pub total_modifications: usize,
    pub matches_modified: usize,
}

/// The versioned round-trip document.
///
/// `modifications` is deliberately not defaulted: a document without the
/// array fails to parse, which is the wholesale-abort contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub export_version: String,
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub base_solution: Option<String>,
    pub modifications: Vec<WireModification>,
    pub statistics: ExportStatistics,
}

impl ExportDocument {
    pub fn from_json_str(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// How imported records combine with the journal's existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Drop the existing active records, then apply the imported ones.
    Replace,
    /// Keep existing records; imported ones replace per-match as usual.
    Merge,
}

/// Outcome of an import: which matches were applied, how many entries were
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub applied: Vec<MatchId>,
    pub skipped: usize,
}

impl ImportReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

/// Builds the export document for the journal's current active records.
pub fn export_document(
    journal: &ModificationJournal,
    base_solution: Option<&str>,
) -> ExportDocument {
    let modifications: Vec<WireModification> =
        journal.records().iter().map(WireModification::from).collect();
    ExportDocument {
        export_version: EXPORT_VERSION.to_owned(),
        exported_at: Utc::now(),
        base_solution: base_solution.map(str::to_owned),
        modifications,
        statistics: ExportStatistics {
            total_modifications: journal.len(),
            matches_modified: journal.matches_modified(),
        },
    }
}

/// Applies an export document to the journal.
///
/// The whole import is rejected on a version mismatch. Individually
/// malformed entries are skipped and counted in the report; valid entries
/// go through the journal's usual per-match replacement semantics.
pub fn import_document(
    journal: &mut ModificationJournal,
    doc: &ExportDocument,
    mode: ImportMode,
) -> Result<ImportReport, ImportError> {
    if doc.export_version != EXPORT_VERSION {
        return Err(ImportError::UnsupportedVersion(doc.export_version.clone()));
    }

    let mut records = Vec::with_capacity(doc.modifications.len());
    let mut skipped = 0;
    for wire in &doc.modifications {
        match ModificationRecord::try_from(wire.clone()) {
            Ok(record) => records.push(record),
            Err(err) => {
                debug!(error = %err, "skipping malformed modification entry");
                skipped += 1;
            }
        }
    }

    let applied: Vec<MatchId> = records.iter().map(|r| r.match_id.clone()).collect();
    match mode {
        ImportMode::Replace => journal.replace_all(records),
        ImportMode::Merge => journal.apply_batch(records),
    }

    info!(
        applied = applied.len(),
        skipped, "modification document imported"
    );
    Ok(ImportReport { applied, skipped })
}
