//! The edit session: one snapshot, one journal, one projected state.
//!
//! `EditSession` is an explicit context object; nothing in the engine is
//! process-global, so several independent sessions can coexist in one
//! process (and in tests). All mutation paths share the same tail: commit
//! to the journal, rebuild the projection, persist best-effort, then notify
//! listeners strictly post-commit.
//!
//! The session is single-threaded by contract; see the crate docs and
//! [`crate::event`] for the re-entrancy rules.

use std::sync::Arc;

use tracing::{debug, info, warn};

use matchboard_config::EngineConfig;
use matchboard_core::{
    Assignment, ConflictReport, IndexedEntities, MatchId, ScheduleSnapshot, SlotKey,
};

use crate::event::{EditEventListener, EditEventSupport, SubscriptionId};
use crate::export::{
    export_document, import_document, ExportDocument, ImportError, ImportMode, ImportReport,
};
use crate::journal::{ModificationJournal, ModificationRecord};
use crate::orchestrator::{team_conflict_in_period, DropOutcome, DropRejection};
use crate::projector::{project, ProjectedSchedule};
use crate::store::{JournalDocument, JournalStore};

/// One editing session over a frozen snapshot.
pub struct EditSession {
    base: ScheduleSnapshot,
    config: EngineConfig,
    journal: ModificationJournal,
    projected: ProjectedSchedule,
    events: EditEventSupport,
    store: Option<Box<dyn JournalStore>>,
}

impl EditSession {
    /// Creates a session without durable persistence.
    pub fn new(base: ScheduleSnapshot, config: EngineConfig) -> Self {
        let journal = ModificationJournal::with_depth(config.undo_depth);
        let projected = project(&base, &journal);
        Self {
            base,
            config,
            journal,
            projected,
            events: EditEventSupport::new(),
            store: None,
        }
    }

    /// Creates a session backed by a journal store.
    ///
    /// The store is read exactly once, here. Its document is adopted only
    /// when it belongs to the same solution as `base`; a load failure
    /// starts the session empty rather than failing it.
    pub fn with_store(
        base: ScheduleSnapshot,
        config: EngineConfig,
        store: Box<dyn JournalStore>,
    ) -> Self {
        let mut session = Self::new(base, config);
        match store.load() {
            Ok(Some(doc)) => {
                let matches_solution = doc.base_solution.is_some()
                    && doc.base_solution.as_deref() == session.base.solution_id();
                if matches_solution {
                    let (records, skipped) = doc.into_records();
                    if skipped > 0 {
                        debug!(skipped, "dropped unreadable persisted entries");
                    }
                    info!(restored = records.len(), "journal restored from store");
                    session.journal.seed(records);
                    session.projected = project(&session.base, &session.journal);
                } else {
                    info!("persisted journal belongs to a different solution, ignored");
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "failed to load persisted journal; starting empty");
            }
        }
        session.store = Some(store);
        session
    }

    pub fn base(&self) -> &ScheduleSnapshot {
        &self.base
    }

    /// The current view: base snapshot with the journal replayed on top.
    pub fn projected(&self) -> &ProjectedSchedule {
        &self.projected
    }

    pub fn journal(&self) -> &ModificationJournal {
        &self.journal
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn modification_count(&self) -> usize {
        self.journal.len()
    }

    pub fn can_undo(&self) -> bool {
        self.journal.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.journal.can_redo()
    }

    /// Registers an edit listener.
    pub fn subscribe(&mut self, listener: Arc<dyn EditEventListener>) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Moves a match to `target` after validating against the current
    /// projection. See [`DropOutcome`] for the possible results; rejections
    /// leave the journal untouched.
    pub fn move_match(&mut self, match_id: &MatchId, target: SlotKey) -> DropOutcome {
        let Some(m) = self.projected.match_by_id(match_id) else {
            return DropOutcome::Rejected(DropRejection::UnknownMatch(match_id.clone()));
        };
        if m.fixed {
            return DropOutcome::Rejected(DropRejection::FixedMatch(match_id.clone()));
        }
        if m.slot() == Some(&target) {
            return DropOutcome::Unchanged;
        }
        let original = m.assignment.clone();
        let home = m.home.clone();
        let away = m.away.clone();

        let Some(capacity) = self.projected.slot_capacity(&target) else {
            return DropOutcome::Rejected(DropRejection::UnknownVenue(target.venue.clone()));
        };
        let occupancy = self.projected.board().occupancy_of(&target);
        if occupancy >= capacity as usize {
            return DropOutcome::Rejected(DropRejection::SlotFull {
                slot: target,
                occupancy,
                capacity,
            });
        }
        if let Some(team) = team_conflict_in_period(
            &self.projected,
            target.week,
            &target.time,
            [&home, &away],
            &[match_id],
        ) {
            return DropOutcome::Rejected(DropRejection::TeamBusy {
                team,
                week: target.week,
                time: target.time.clone(),
            });
        }

        let record = ModificationRecord::new(
            match_id.clone(),
            original,
            Assignment::Assigned(target),
            self.config.default_author.clone(),
        );
        self.journal.apply(record.clone());
        self.after_mutation();
        self.events
            .notify_modification_applied(&record.match_id, &record);
        DropOutcome::Committed(record)
    }

    /// Swaps the slots of two matches as one atomic edit (a single undo
    /// frame covers both records).
    ///
    /// Each leg runs the same team-conflict check as a plain move, with
    /// both participants excluded from the scan. Capacity is preserved by
    /// the exchange itself, so it is not re-checked.
    pub fn swap_matches(&mut self, a_id: &MatchId, b_id: &MatchId) -> DropOutcome {
        if a_id == b_id {
            return DropOutcome::Unchanged;
        }
        let Some(a) = self.projected.match_by_id(a_id) else {
            return DropOutcome::Rejected(DropRejection::UnknownMatch(a_id.clone()));
        };
        let Some(b) = self.projected.match_by_id(b_id) else {
            return DropOutcome::Rejected(DropRejection::UnknownMatch(b_id.clone()));
        };
        if a.fixed {
            return DropOutcome::Rejected(DropRejection::FixedMatch(a_id.clone()));
        }
        if b.fixed {
            return DropOutcome::Rejected(DropRejection::FixedMatch(b_id.clone()));
        }
        let slot_a = a.assignment.clone();
        let slot_b = b.assignment.clone();
        if slot_a == slot_b {
            return DropOutcome::Unchanged;
        }
        let a_teams = [a.home.clone(), a.away.clone()];
        let b_teams = [b.home.clone(), b.away.clone()];

        let exclude = [a_id, b_id];
        if let Some(dest) = slot_b.slot() {
            if let Some(team) = team_conflict_in_period(
                &self.projected,
                dest.week,
                &dest.time,
                [&a_teams[0], &a_teams[1]],
                &exclude,
            ) {
                return DropOutcome::Rejected(DropRejection::TeamBusy {
                    team,
                    week: dest.week,
                    time: dest.time.clone(),
                });
            }
        }
        if let Some(dest) = slot_a.slot() {
            if let Some(team) = team_conflict_in_period(
                &self.projected,
                dest.week,
                &dest.time,
                [&b_teams[0], &b_teams[1]],
                &exclude,
            ) {
                return DropOutcome::Rejected(DropRejection::TeamBusy {
                    team,
                    week: dest.week,
                    time: dest.time.clone(),
                });
            }
        }

        let author = self.config.default_author.clone();
        let record_a =
            ModificationRecord::new(a_id.clone(), slot_a.clone(), slot_b.clone(), author.clone());
        let record_b = ModificationRecord::new(b_id.clone(), slot_b, slot_a, author);
        self.journal
            .apply_batch(vec![record_a.clone(), record_b.clone()]);
        self.after_mutation();
        self.events
            .notify_modification_applied(&record_a.match_id, &record_a);
        self.events
            .notify_modification_applied(&record_b.match_id, &record_b);
        DropOutcome::Swapped(record_a, record_b)
    }

    /// Commits a record without any validation.
    ///
    /// This is the direct journal path used by batch tooling and tests to
    /// reproduce externally-introduced states (e.g. a conflicting imported
    /// document). Conflicts admitted here surface as annotations, they are
    /// not blocked.
    pub fn apply_unchecked(&mut self, record: ModificationRecord) {
        self.journal.apply(record.clone());
        self.after_mutation();
        self.events
            .notify_modification_applied(&record.match_id, &record);
    }

    /// Removes the active modification for a match, reverting it to its
    /// base placement.
    pub fn remove_modification(&mut self, match_id: &MatchId) -> Option<ModificationRecord> {
        let record = self.journal.remove(match_id)?;
        self.after_mutation();
        Some(record)
    }

    /// Reverts the most recent mutation. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.journal.undo() {
            self.after_mutation();
            true
        } else {
            false
        }
    }

    /// Re-applies the most recently undone mutation.
    pub fn redo(&mut self) -> bool {
        if self.journal.redo() {
            self.after_mutation();
            true
        } else {
            false
        }
    }

    /// Drops every modification and the undo/redo history.
    pub fn clear_modifications(&mut self) {
        self.journal.clear_all();
        self.after_mutation();
        self.events.notify_all_modifications_reverted();
    }

    /// Builds the export document for the current journal.
    pub fn export(&self) -> ExportDocument {
        export_document(&self.journal, self.base.solution_id())
    }

    /// Imports an export document; see [`import_document`] for semantics.
    pub fn import(
        &mut self,
        doc: &ExportDocument,
        mode: ImportMode,
    ) -> Result<ImportReport, ImportError> {
        let report = import_document(&mut self.journal, doc, mode)?;
        self.after_mutation();
        for match_id in &report.applied {
            if let Some(record) = self.journal.get(match_id) {
                self.events.notify_modification_applied(match_id, record);
            }
        }
        Ok(report)
    }

    /// Adopts a fresh solver result as the new base snapshot.
    ///
    /// A re-solve replaces the base wholesale, never through a journal
    /// entry. The journal survives only when the incoming snapshot carries
    /// the same solution id; otherwise the edits no longer apply and are
    /// dropped.
    pub fn replace_base_snapshot(&mut self, base: ScheduleSnapshot) {
        let same_solution =
            base.solution_id().is_some() && base.solution_id() == self.base.solution_id();
        if !same_solution {
            self.journal.clear_all();
            info!("base snapshot replaced; journal cleared");
        } else {
            info!("base snapshot refreshed for the same solution");
        }
        self.base = base;
        self.after_mutation();
    }

    /// Conflict report for one slot of the current view, using the
    /// configured institution threshold.
    pub fn conflicts_for_slot(&self, slot: &SlotKey) -> ConflictReport {
        self.projected
            .conflicts_for_slot(slot, self.config.institution_overlap_threshold)
    }

    /// Conflicted slots of the current view, in slot order.
    pub fn conflict_summary(&self) -> Vec<(SlotKey, ConflictReport)> {
        self.projected
            .conflict_summary(self.config.institution_overlap_threshold)
    }

    /// Rebuilds the projection and persists the journal. Persistence
    /// failures degrade to a warning; the in-memory journal stays
    /// authoritative.
    fn after_mutation(&mut self) {
        self.projected = project(&self.base, &self.journal);
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let doc = JournalDocument::from_journal(&self.journal, self.base.solution_id());
        if let Err(err) = store.save(&doc) {
            warn!(error = %err, "journal persistence failed; continuing without durability");
        }
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("solution_id", &self.base.solution_id())
            .field("modifications", &self.journal.len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;
