//! Concrete entities of the timetable: matches, teams, venues and pools.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::assignment::{Assignment, SlotKey};
use super::ids::{MatchId, PoolId, TeamId, VenueId};

/// A match between two teams, with its effective placement.
///
/// Matches are created by the external solver and are immutable in the base
/// snapshot; the effective [`Assignment`] only changes through journal
/// replay, never in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub home: TeamId,
    pub away: TeamId,
    pub assignment: Assignment,
    /// Locked by the solver or an operator; never moved automatically.
    pub fixed: bool,
    /// Played against a team outside the managed league.
    pub external: bool,
    /// Joint team shared between institutions.
    pub entente: bool,
    pub penalties: Option<PenaltyBreakdown>,
}

impl Match {
    pub fn teams(&self) -> [&TeamId; 2] {
        [&self.home, &self.away]
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home == team || &self.away == team
    }

    pub fn slot(&self) -> Option<&SlotKey> {
        self.assignment.slot()
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_assigned()
    }
}

/// Named non-negative penalty contributions for one match.
///
/// Produced by the solver to explain a match's placement cost; the total is
/// the sum of all contributions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PenaltyBreakdown {
    pub contributions: BTreeMap<String, f64>,
}

impl PenaltyBreakdown {
    pub fn total(&self) -> f64 {
        self.contributions.values().sum()
    }
}

/// A team taking part in the timetable.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub institution: String,
    pub gender: String,
    pub pool: Option<PoolId>,
    /// Ordered preferences, used for annotation only, never enforced.
    pub preferred_times: Vec<String>,
    pub preferred_venues: Vec<VenueId>,
}

/// A venue with a maximum number of concurrent matches per time slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    /// Maximum concurrent matches in one time slot, always >= 1.
    pub capacity: u32,
}

/// A grouping of teams for standings.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    pub id: PoolId,
    pub name: String,
    pub gender: String,
    pub level: String,
}
