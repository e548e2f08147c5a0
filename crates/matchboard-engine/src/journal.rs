//! The ordered, per-match modification journal.
//!
//! The journal holds at most one active record per match: a second edit to
//! the same match replaces its record in place, keeping the original
//! insertion position. Undo/redo works on full-journal snapshots pushed
//! between two stacks, with a configurable depth cap so long sessions stay
//! bounded.

use chrono::{DateTime, Utc};
use tracing::debug;

use matchboard_core::{Assignment, MatchId};

/// Default number of undo frames kept when no depth is configured.
const DEFAULT_UNDO_DEPTH: usize = 100;

/// One slot change for one match.
///
/// Records are only built from validated parts: `original` and `new` are
/// [`Assignment`] values, so a partially-filled slot can never reach the
/// journal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationRecord {
    pub match_id: MatchId,
    pub timestamp: DateTime<Utc>,
    pub original: Assignment,
    pub new: Assignment,
    pub author: String,
    pub reason: Option<String>,
}

impl ModificationRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        match_id: MatchId,
        original: Assignment,
        new: Assignment,
        author: impl Into<String>,
    ) -> Self {
        Self {
            match_id,
            timestamp: Utc::now(),
            original,
            new,
            author: author.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Ordered log of active modifications with snapshot-based undo/redo.
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationJournal {
    records: Vec<ModificationRecord>,
    undo_stack: Vec<Vec<ModificationRecord>>,
    redo_stack: Vec<Vec<ModificationRecord>>,
    undo_depth: usize,
}

impl Default for ModificationJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl ModificationJournal {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_UNDO_DEPTH)
    }

    /// Creates a journal keeping at most `undo_depth` undo frames.
    pub fn with_depth(undo_depth: usize) -> Self {
        Self {
            records: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_depth: undo_depth.max(1),
        }
    }

    /// Applies one record: replaces the match's active record in place when
    /// one exists, appends otherwise. Clears the redo stack.
    pub fn apply(&mut self, record: ModificationRecord) {
        self.checkpoint();
        self.upsert(record);
    }

    /// Applies several records as one atomic group sharing a single undo
    /// frame. Used for swaps, where two matches change together.
    pub fn apply_batch(&mut self, records: Vec<ModificationRecord>) {
        if records.is_empty() {
            return;
        }
        self.checkpoint();
        for record in records {
            self.upsert(record);
        }
    }

    /// Replaces the whole active list in one undo frame.
    pub fn replace_all(&mut self, records: Vec<ModificationRecord>) {
        self.checkpoint();
        self.records = records;
    }

    /// Seeds the active list without creating an undo frame.
    ///
    /// Used when restoring a persisted journal at session start, which
    /// should not itself be undoable.
    pub fn seed(&mut self, records: Vec<ModificationRecord>) {
        self.records = records;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Removes the active record for a match, if any.
    pub fn remove(&mut self, match_id: &MatchId) -> Option<ModificationRecord> {
        let pos = self.records.iter().position(|r| &r.match_id == match_id)?;
        self.checkpoint();
        let record = self.records.remove(pos);
        debug!(match_id = %match_id, "modification removed");
        Some(record)
    }

    /// Reverts the most recent mutation. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.records, previous);
                self.redo_stack.push(current);
                debug!(active = self.records.len(), "journal undo");
                true
            }
            None => false,
        }
    }

    /// Re-applies the most recently undone mutation. Returns `false` when
    /// the redo stack is empty.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.records, next);
                self.undo_stack.push(current);
                debug!(active = self.records.len(), "journal redo");
                true
            }
            None => false,
        }
    }

    /// Empties the active records and both history stacks.
    pub fn clear_all(&mut self) {
        self.records.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        debug!("journal cleared");
    }

    pub fn get(&self, match_id: &MatchId) -> Option<&ModificationRecord> {
        self.records.iter().find(|r| &r.match_id == match_id)
    }

    /// Active records in journal order.
    pub fn records(&self) -> &[ModificationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of distinct matches touched by active records.
    pub fn matches_modified(&self) -> usize {
        let mut ids: Vec<&MatchId> = self.records.iter().map(|r| &r.match_id).collect();
        ids.sort();
        ids.dedup();
        ids.len()
    }

    fn upsert(&mut self, record: ModificationRecord) {
        debug!(
            match_id = %record.match_id,
            new = %record.new,
            "modification applied"
        );
        match self
            .records
            .iter()
            .position(|r| r.match_id == record.match_id)
        {
            Some(pos) => self.records[pos] = record,
            None => self.records.push(record),
        }
    }

    /// Pushes the current active list as an undo frame, dropping the oldest
    /// frame beyond the cap, and invalidates redo.
    fn checkpoint(&mut self) {
        self.undo_stack.push(self.records.clone());
        if self.undo_stack.len() > self.undo_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests;
