use std::sync::Arc;

use super::*;
use matchboard_core::ConflictSeverity;

use crate::event::CountingEditListener;
use crate::store::MemoryJournalStore;
use crate::test_utils::{slot, SnapshotBuilder};

fn base() -> ScheduleSnapshot {
    SnapshotBuilder::new()
        .venue("g1", 2)
        .venue("g2", 1)
        .team("t1")
        .team("t2")
        .team("t3")
        .team("t4")
        .scheduled("m1", "t1", "t2", slot(1, "18:00", "g1"))
        .scheduled("m2", "t3", "t4", slot(1, "20:00", "g2"))
        .unscheduled("m3", "t1", "t3")
        .build()
}

fn record(match_id: &str, original: Assignment, new: SlotKey) -> ModificationRecord {
    ModificationRecord::new(
        MatchId::new(match_id),
        original,
        Assignment::Assigned(new),
        "tester",
    )
}

#[test]
fn listeners_are_notified_post_commit() {
    let mut session = EditSession::new(base(), EngineConfig::default());
    let counter = Arc::new(CountingEditListener::default());
    session.subscribe(counter.clone());

    assert!(session
        .move_match(&MatchId::new("m1"), slot(2, "18:00", "g1"))
        .is_committed());
    assert_eq!(counter.applied_count(), 1);

    session.clear_modifications();
    assert_eq!(counter.reverted_count(), 1);

    // A rejected move notifies nothing.
    session.move_match(&MatchId::new("ghost"), slot(2, "18:00", "g1"));
    assert_eq!(counter.applied_count(), 1);
}

#[test]
fn unsubscribed_listener_goes_quiet() {
    let mut session = EditSession::new(base(), EngineConfig::default());
    let counter = Arc::new(CountingEditListener::default());
    let subscription = session.subscribe(counter.clone());
    assert!(session.unsubscribe(subscription));

    session.move_match(&MatchId::new("m1"), slot(2, "18:00", "g1"));
    assert_eq!(counter.applied_count(), 0);
}

#[test]
fn mutations_persist_to_the_store() {
    let mut session = EditSession::with_store(
        base(),
        EngineConfig::default(),
        Box::new(MemoryJournalStore::new()),
    );
    session.move_match(&MatchId::new("m1"), slot(2, "18:00", "g1"));

    // Reload through a fresh session sharing the same document.
    let doc = session.export();
    assert_eq!(doc.statistics.total_modifications, 1);
}

#[test]
fn store_restore_adopts_matching_solution() {
    let mut first = EditSession::with_store(
        base(),
        EngineConfig::default(),
        Box::new(MemoryJournalStore::new()),
    );
    first.move_match(&MatchId::new("m1"), slot(2, "18:00", "g1"));

    // Capture what the first session persisted, hand it to a second one.
    let persisted = JournalDocument::from_journal(first.journal(), first.base().solution_id());
    let second = EditSession::with_store(
        base(),
        EngineConfig::default(),
        Box::new(MemoryJournalStore::with_document(persisted)),
    );

    assert_eq!(second.modification_count(), 1);
    assert_eq!(
        second
            .projected()
            .match_by_id(&MatchId::new("m1"))
            .unwrap()
            .slot(),
        Some(&slot(2, "18:00", "g1"))
    );
    // Restoring is not an undoable edit.
    assert!(!second.can_undo());
}

#[test]
fn store_restore_ignores_foreign_solution() {
    let mut journal = ModificationJournal::new();
    journal.apply(record("m1", Assignment::Unassigned, slot(2, "18:00", "g1")));
    let persisted = JournalDocument::from_journal(&journal, Some("some-other-solution"));

    let session = EditSession::with_store(
        base(),
        EngineConfig::default(),
        Box::new(MemoryJournalStore::with_document(persisted)),
    );
    assert_eq!(session.modification_count(), 0);
}

#[test]
fn failing_store_degrades_but_edits_survive() {
    let mut session = EditSession::with_store(
        base(),
        EngineConfig::default(),
        Box::new(MemoryJournalStore::failing()),
    );
    let outcome = session.move_match(&MatchId::new("m1"), slot(2, "18:00", "g1"));

    assert!(outcome.is_committed());
    assert_eq!(session.modification_count(), 1);
    assert_eq!(
        session
            .projected()
            .match_by_id(&MatchId::new("m1"))
            .unwrap()
            .slot(),
        Some(&slot(2, "18:00", "g1"))
    );
}

#[test]
fn import_notifies_applied_records() {
    let mut source = EditSession::new(base(), EngineConfig::default());
    source.move_match(&MatchId::new("m1"), slot(2, "18:00", "g1"));
    let doc = source.export();

    let mut target = EditSession::new(base(), EngineConfig::default());
    let counter = Arc::new(CountingEditListener::default());
    target.subscribe(counter.clone());

    let report = target.import(&doc, ImportMode::Replace).unwrap();
    assert_eq!(report.applied_count(), 1);
    assert_eq!(counter.applied_count(), 1);
    assert_eq!(target.modification_count(), 1);
}

#[test]
fn replace_base_with_new_solution_drops_the_journal() {
    let mut session = EditSession::new(base(), EngineConfig::default());
    session.move_match(&MatchId::new("m1"), slot(2, "18:00", "g1"));
    assert_eq!(session.modification_count(), 1);

    let fresh = SnapshotBuilder::new()
        .solution_id("resolved-v2")
        .venue("g1", 2)
        .team("t1")
        .team("t2")
        .scheduled("m1", "t1", "t2", slot(4, "18:00", "g1"))
        .build();
    session.replace_base_snapshot(fresh);

    assert_eq!(session.modification_count(), 0);
    assert_eq!(
        session
            .projected()
            .match_by_id(&MatchId::new("m1"))
            .unwrap()
            .slot(),
        Some(&slot(4, "18:00", "g1"))
    );
}

#[test]
fn replace_base_same_solution_keeps_the_journal() {
    let mut session = EditSession::new(base(), EngineConfig::default());
    session.move_match(&MatchId::new("m1"), slot(2, "18:00", "g1"));

    session.replace_base_snapshot(base());
    assert_eq!(session.modification_count(), 1);
    assert_eq!(
        session
            .projected()
            .match_by_id(&MatchId::new("m1"))
            .unwrap()
            .slot(),
        Some(&slot(2, "18:00", "g1"))
    );
}

#[test]
fn remove_modification_reverts_one_match() {
    let mut session = EditSession::new(base(), EngineConfig::default());
    session.move_match(&MatchId::new("m1"), slot(2, "18:00", "g1"));
    session.move_match(&MatchId::new("m3"), slot(3, "18:00", "g1"));

    let removed = session.remove_modification(&MatchId::new("m1")).unwrap();
    assert_eq!(removed.match_id, MatchId::new("m1"));
    assert_eq!(session.modification_count(), 1);
    assert_eq!(
        session
            .projected()
            .match_by_id(&MatchId::new("m1"))
            .unwrap()
            .slot(),
        Some(&slot(1, "18:00", "g1"))
    );
    assert!(session.remove_modification(&MatchId::new("m1")).is_none());
}

#[test]
fn conflict_accessors_use_configured_threshold() {
    let base = SnapshotBuilder::new()
        .venue("g1", 4)
        .team_at("t1", "North")
        .team_at("t2", "North")
        .team_at("t3", "North")
        .team_at("t4", "South")
        .scheduled("m1", "t1", "t2", slot(1, "18:00", "g1"))
        .scheduled("m2", "t3", "t4", slot(1, "18:00", "g1"))
        .build();

    let lenient = EngineConfig {
        institution_overlap_threshold: 3,
        ..EngineConfig::default()
    };
    let strict_session = EditSession::new(base.clone(), EngineConfig::default());
    let lenient_session = EditSession::new(base, lenient);

    let slot_key = slot(1, "18:00", "g1");
    assert_eq!(
        strict_session.conflicts_for_slot(&slot_key).severity,
        ConflictSeverity::Warning
    );
    assert!(!lenient_session.conflicts_for_slot(&slot_key).has_conflict());

    assert_eq!(strict_session.conflict_summary().len(), 1);
    assert!(lenient_session.conflict_summary().is_empty());
}
