use super::*;

fn slot(week: u32, time: &str, venue: &str) -> SlotKey {
    SlotKey::new(week, time, venue)
}

#[test]
fn assignment_from_complete_parts() {
    let a = Assignment::from_parts(Some(2), Some("20:30".into()), Some("gym-a".into())).unwrap();
    assert_eq!(a.slot(), Some(&slot(2, "20:30", "gym-a")));
}

#[test]
fn assignment_from_empty_parts_is_unassigned() {
    let a = Assignment::from_parts(None, None, None).unwrap();
    assert_eq!(a, Assignment::Unassigned);
    assert!(a.slot().is_none());
}

#[test]
fn assignment_rejects_partial_parts() {
    let err = Assignment::from_parts(Some(2), Some("20:30".into()), None).unwrap_err();
    assert!(err.week);
    assert!(err.time);
    assert!(!err.venue);

    assert!(Assignment::from_parts(None, None, Some("gym-a".into())).is_err());
}

#[test]
fn slot_same_period_ignores_venue() {
    let a = slot(1, "18:00", "gym-a");
    let b = slot(1, "18:00", "gym-b");
    let c = slot(1, "19:00", "gym-a");
    assert!(a.same_period(&b));
    assert!(!a.same_period(&c));
}

#[test]
fn slot_wire_names_are_french() {
    let json = serde_json::to_value(slot(4, "18:00", "gym-a")).unwrap();
    assert_eq!(json["semaine"], 4);
    assert_eq!(json["horaire"], "18:00");
    assert_eq!(json["gymnase"], "gym-a");
}

#[test]
fn penalty_total_sums_contributions() {
    let mut penalties = PenaltyBreakdown::default();
    penalties.contributions.insert("travel".into(), 2.5);
    penalties.contributions.insert("late_slot".into(), 1.0);
    assert_eq!(penalties.total(), 3.5);
}

#[test]
fn match_involves_both_teams() {
    let m = Match {
        id: MatchId::new("m1"),
        home: TeamId::new("t1"),
        away: TeamId::new("t2"),
        assignment: Assignment::Unassigned,
        fixed: false,
        external: false,
        entente: false,
        penalties: None,
    };
    assert!(m.involves(&TeamId::new("t1")));
    assert!(m.involves(&TeamId::new("t2")));
    assert!(!m.involves(&TeamId::new("t3")));
}
