//! Shared fixtures for engine tests.

use matchboard_core::{
    Assignment, Match, MatchId, PoolId, ScheduleSnapshot, SlotKey, SnapshotMetadata, Team, TeamId,
    Venue, VenueId,
};

pub fn slot(week: u32, time: &str, venue: &str) -> SlotKey {
    SlotKey::new(week, time, venue)
}

/// Builder for small in-memory snapshots.
///
/// Defaults every team to its own institution; use [`Self::team_at`] to
/// cluster several teams under one institution.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    teams: Vec<Team>,
    venues: Vec<Venue>,
    matches: Vec<Match>,
    solution_id: Option<String>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            solution_id: Some("test-solution".to_owned()),
            ..Self::default()
        }
    }

    pub fn solution_id(mut self, id: &str) -> Self {
        self.solution_id = Some(id.to_owned());
        self
    }

    pub fn venue(mut self, id: &str, capacity: u32) -> Self {
        self.venues.push(Venue {
            id: VenueId::new(id),
            name: id.to_uppercase(),
            capacity,
        });
        self
    }

    pub fn team(self, id: &str) -> Self {
        let institution = format!("inst-{id}");
        self.team_at(id, &institution)
    }

    pub fn team_at(mut self, id: &str, institution: &str) -> Self {
        self.teams.push(Team {
            id: TeamId::new(id),
            name: id.to_uppercase(),
            institution: institution.to_owned(),
            gender: "F".to_owned(),
            pool: Some(PoolId::new("p1")),
            preferred_times: Vec::new(),
            preferred_venues: Vec::new(),
        });
        self
    }

    pub fn scheduled(mut self, id: &str, home: &str, away: &str, at: SlotKey) -> Self {
        self.matches.push(base_match(id, home, away, Assignment::Assigned(at)));
        self
    }

    pub fn unscheduled(mut self, id: &str, home: &str, away: &str) -> Self {
        self.matches
            .push(base_match(id, home, away, Assignment::Unassigned));
        self
    }

    pub fn fixed(mut self, id: &str, home: &str, away: &str, at: SlotKey) -> Self {
        let mut m = base_match(id, home, away, Assignment::Assigned(at));
        m.fixed = true;
        self.matches.push(m);
        self
    }

    pub fn build(self) -> ScheduleSnapshot {
        ScheduleSnapshot {
            version: "1.0".to_owned(),
            metadata: SnapshotMetadata {
                solution_id: self.solution_id,
                ..Default::default()
            },
            config: serde_json::Value::Null,
            teams: self.teams,
            venues: self.venues,
            pools: Vec::new(),
            matches: self.matches,
            available_slots: Vec::new(),
            occupied_slots: Vec::new(),
            statistics: serde_json::Value::Null,
        }
    }
}

fn base_match(id: &str, home: &str, away: &str, assignment: Assignment) -> Match {
    Match {
        id: MatchId::new(id),
        home: TeamId::new(home),
        away: TeamId::new(away),
        assignment,
        fixed: false,
        external: false,
        entente: false,
        penalties: None,
    }
}
