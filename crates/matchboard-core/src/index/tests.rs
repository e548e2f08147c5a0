use super::*;
use crate::domain::{Assignment, Match, SlotKey};

fn team(id: &str, institution: &str, pool: Option<&str>) -> Team {
    Team {
        id: TeamId::new(id),
        name: id.to_uppercase(),
        institution: institution.to_owned(),
        gender: "F".to_owned(),
        pool: pool.map(PoolId::new),
        preferred_times: Vec::new(),
        preferred_venues: Vec::new(),
    }
}

fn venue(id: &str, capacity: u32) -> Venue {
    Venue {
        id: VenueId::new(id),
        name: id.to_uppercase(),
        capacity,
    }
}

fn pool(id: &str) -> Pool {
    Pool {
        id: PoolId::new(id),
        name: id.to_uppercase(),
        gender: "F".to_owned(),
        level: "1".to_owned(),
    }
}

fn scheduled(id: &str, home: &str, away: &str, week: u32, time: &str, venue: &str) -> Match {
    Match {
        id: MatchId::new(id),
        home: TeamId::new(home),
        away: TeamId::new(away),
        assignment: Assignment::Assigned(SlotKey::new(week, time, venue)),
        fixed: false,
        external: false,
        entente: false,
        penalties: None,
    }
}

fn fixture() -> (Vec<Match>, Vec<Team>, Vec<Venue>, Vec<Pool>) {
    let teams = vec![
        team("t1", "North HS", Some("p1")),
        team("t2", "South HS", Some("p1")),
        team("t3", "East HS", Some("p2")),
    ];
    let venues = vec![venue("g1", 2), venue("g2", 1)];
    let pools = vec![pool("p1"), pool("p2")];
    let matches = vec![
        scheduled("m1", "t1", "t2", 1, "18:00", "g1"),
        scheduled("m2", "t3", "t1", 2, "20:00", "g2"),
        Match {
            id: MatchId::new("m3"),
            home: TeamId::new("t2"),
            away: TeamId::new("t3"),
            assignment: Assignment::Unassigned,
            fixed: false,
            external: false,
            entente: false,
            penalties: None,
        },
    ];
    (matches, teams, venues, pools)
}

#[test]
fn positions_resolve_by_id() {
    let (matches, teams, venues, pools) = fixture();
    let index = EntityIndex::build_from_parts(&matches, &teams, &venues, &pools);

    assert_eq!(index.match_pos(&MatchId::new("m2")), Some(1));
    assert_eq!(index.team_pos(&TeamId::new("t3")), Some(2));
    assert_eq!(index.venue_pos(&VenueId::new("g2")), Some(1));
    assert_eq!(index.pool_pos(&PoolId::new("p1")), Some(0));
    assert_eq!(index.match_count(), 3);
}

#[test]
fn missing_ids_return_none() {
    let (matches, teams, venues, pools) = fixture();
    let index = EntityIndex::build_from_parts(&matches, &teams, &venues, &pools);

    assert_eq!(index.match_pos(&MatchId::new("nope")), None);
    assert_eq!(index.team_pos(&TeamId::new("nope")), None);
    assert!(index.matches_in_week(9).is_empty());
}

#[test]
fn dangling_references_are_retained() {
    let (mut matches, teams, venues, pools) = fixture();
    matches.push(scheduled("m4", "ghost", "t1", 1, "18:00", "g9"));
    let index = EntityIndex::build_from_parts(&matches, &teams, &venues, &pools);

    // The match is indexed even though its team and venue do not resolve.
    assert_eq!(index.match_pos(&MatchId::new("m4")), Some(3));
    assert_eq!(index.matches_at_venue(&VenueId::new("g9")).len(), 1);
    assert_eq!(index.team_pos(&TeamId::new("ghost")), None);
}

#[test]
fn groupings_preserve_insertion_order() {
    let (matches, teams, venues, pools) = fixture();
    let index = EntityIndex::build_from_parts(&matches, &teams, &venues, &pools);

    assert_eq!(index.matches_in_week(1), &[MatchId::new("m1")]);
    assert_eq!(index.weeks().collect::<Vec<_>>(), vec![1, 2]);
    // m1 and m3 both touch pool p1 through their teams; m2 touches both pools.
    assert_eq!(
        index.matches_in_pool(&PoolId::new("p1")),
        &[MatchId::new("m1"), MatchId::new("m2"), MatchId::new("m3")]
    );
}

#[test]
fn rebuild_is_deterministic() {
    let (matches, teams, venues, pools) = fixture();
    let a = EntityIndex::build_from_parts(&matches, &teams, &venues, &pools);
    let b = EntityIndex::build_from_parts(&matches, &teams, &venues, &pools);
    assert_eq!(a, b);
}

#[test]
fn indexed_entities_accessors() {
    struct Holder {
        matches: Vec<Match>,
        teams: Vec<Team>,
        venues: Vec<Venue>,
        pools: Vec<Pool>,
        index: EntityIndex,
    }

    impl IndexedEntities for Holder {
        fn entity_index(&self) -> &EntityIndex {
            &self.index
        }
        fn match_slice(&self) -> &[Match] {
            &self.matches
        }
        fn team_slice(&self) -> &[Team] {
            &self.teams
        }
        fn venue_slice(&self) -> &[Venue] {
            &self.venues
        }
        fn pool_slice(&self) -> &[Pool] {
            &self.pools
        }
    }

    let (matches, teams, venues, pools) = fixture();
    let index = EntityIndex::build_from_parts(&matches, &teams, &venues, &pools);
    let holder = Holder {
        matches,
        teams,
        venues,
        pools,
        index,
    };

    assert_eq!(holder.match_by_id(&MatchId::new("m1")).unwrap().home, TeamId::new("t1"));
    assert_eq!(holder.venue_by_id(&VenueId::new("g2")).unwrap().capacity, 1);
    assert_eq!(
        holder.slot_capacity(&SlotKey::new(1, "18:00", "g1")),
        Some(2)
    );
    assert_eq!(holder.slot_capacity(&SlotKey::new(1, "18:00", "g9")), None);
}
