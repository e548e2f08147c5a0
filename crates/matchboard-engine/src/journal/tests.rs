use super::*;
use matchboard_core::{Assignment, MatchId, SlotKey};

fn assigned(week: u32, time: &str, venue: &str) -> Assignment {
    Assignment::Assigned(SlotKey::new(week, time, venue))
}

fn record(match_id: &str, new: Assignment) -> ModificationRecord {
    ModificationRecord::new(
        MatchId::new(match_id),
        Assignment::Unassigned,
        new,
        "tester",
    )
}

#[test]
fn apply_appends_new_records_in_order() {
    let mut journal = ModificationJournal::new();
    journal.apply(record("m1", assigned(1, "18:00", "g1")));
    journal.apply(record("m2", assigned(1, "20:00", "g1")));

    assert_eq!(journal.len(), 2);
    assert_eq!(journal.records()[0].match_id, MatchId::new("m1"));
    assert_eq!(journal.records()[1].match_id, MatchId::new("m2"));
}

#[test]
fn second_edit_replaces_in_place() {
    let mut journal = ModificationJournal::new();
    journal.apply(record("m1", assigned(1, "18:00", "g1")));
    journal.apply(record("m2", assigned(1, "20:00", "g1")));
    journal.apply(record("m1", assigned(2, "18:00", "g2")));

    // Still two records, m1 keeps its original insertion position.
    assert_eq!(journal.len(), 2);
    assert_eq!(journal.records()[0].match_id, MatchId::new("m1"));
    assert_eq!(journal.records()[0].new, assigned(2, "18:00", "g2"));
    assert_eq!(journal.matches_modified(), 2);
}

#[test]
fn undo_then_redo_restores_pre_undo_state() {
    let mut journal = ModificationJournal::new();
    journal.apply(record("m1", assigned(1, "18:00", "g1")));
    journal.apply(record("m2", assigned(1, "20:00", "g1")));
    let before = journal.records().to_vec();

    assert!(journal.undo());
    assert_eq!(journal.len(), 1);
    assert!(journal.redo());
    assert_eq!(journal.records(), before.as_slice());
}

#[test]
fn undo_on_empty_history_is_a_noop() {
    let mut journal = ModificationJournal::new();
    assert!(!journal.undo());
    assert!(!journal.redo());
    assert!(journal.is_empty());
}

#[test]
fn new_edit_clears_redo() {
    let mut journal = ModificationJournal::new();
    journal.apply(record("m1", assigned(1, "18:00", "g1")));
    assert!(journal.undo());
    assert!(journal.can_redo());

    journal.apply(record("m2", assigned(1, "20:00", "g1")));
    assert!(!journal.can_redo());
    assert!(!journal.redo());
}

#[test]
fn remove_returns_the_active_record() {
    let mut journal = ModificationJournal::new();
    journal.apply(record("m1", assigned(1, "18:00", "g1")));

    let removed = journal.remove(&MatchId::new("m1")).unwrap();
    assert_eq!(removed.match_id, MatchId::new("m1"));
    assert!(journal.is_empty());
    assert!(journal.remove(&MatchId::new("m1")).is_none());

    // Removal is itself undoable.
    assert!(journal.undo());
    assert_eq!(journal.len(), 1);
}

#[test]
fn clear_all_empties_records_and_stacks() {
    let mut journal = ModificationJournal::new();
    journal.apply(record("m1", assigned(1, "18:00", "g1")));
    journal.undo();
    journal.redo();
    journal.clear_all();

    assert!(journal.is_empty());
    assert!(!journal.can_undo());
    assert!(!journal.can_redo());
}

#[test]
fn apply_batch_shares_one_undo_frame() {
    let mut journal = ModificationJournal::new();
    journal.apply_batch(vec![
        record("m1", assigned(1, "18:00", "g1")),
        record("m2", assigned(1, "18:00", "g2")),
    ]);
    assert_eq!(journal.len(), 2);

    // One undo reverts the whole batch.
    assert!(journal.undo());
    assert!(journal.is_empty());
}

#[test]
fn undo_depth_drops_oldest_frames() {
    let mut journal = ModificationJournal::with_depth(2);
    journal.apply(record("m1", assigned(1, "18:00", "g1")));
    journal.apply(record("m2", assigned(1, "19:00", "g1")));
    journal.apply(record("m3", assigned(1, "20:00", "g1")));

    // Only the two most recent frames survive.
    assert!(journal.undo());
    assert!(journal.undo());
    assert!(!journal.undo());
    assert_eq!(journal.len(), 1);
    assert_eq!(journal.records()[0].match_id, MatchId::new("m1"));
}

#[test]
fn replace_all_is_one_frame() {
    let mut journal = ModificationJournal::new();
    journal.apply(record("m1", assigned(1, "18:00", "g1")));
    journal.replace_all(vec![record("m9", assigned(3, "20:00", "g2"))]);

    assert_eq!(journal.len(), 1);
    assert_eq!(journal.records()[0].match_id, MatchId::new("m9"));
    assert!(journal.undo());
    assert_eq!(journal.records()[0].match_id, MatchId::new("m1"));
}

#[test]
fn reason_is_carried() {
    let record = record("m1", assigned(1, "18:00", "g1")).with_reason("venue closed");
    assert_eq!(record.reason.as_deref(), Some("venue closed"));
}
