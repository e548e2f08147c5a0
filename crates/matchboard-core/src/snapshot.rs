//! The frozen solver snapshot and its wire document.
//!
//! A snapshot is loaded once per editing session and never mutated; every
//! derived structure (indexes, projected state) is rebuilt from it. The wire
//! shape follows the solver's output document:
//!
//! ```text
//! { version, metadata, config,
//!   entities: { equipes: [...], gymnases: [...], poules: [...] },
//!   matches:  { scheduled: [...], unscheduled: [...] },
//!   slots:    { available: [...], occupied: [...] },
//!   statistics }
//! ```
//!
//! Validation happens at this boundary: venue capacities must be >= 1 and a
//! match's slot fields must be all present or all absent. Dangling id
//! references are retained; lookups for them simply return `None`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Assignment, Match, MatchId, PenaltyBreakdown, Pool, PoolId, SlotKey, Team, TeamId, Venue,
    VenueId,
};
use crate::error::{Result, SnapshotError};

/// Document metadata attached by the solver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Identity of the solver run that produced this snapshot. Journal
    /// documents are only adopted when this id matches.
    #[serde(default)]
    pub solution_id: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The immutable base dataset for one editing session.
///
/// Scheduled and unscheduled matches are merged into one list, preserving
/// document order; `config` and `statistics` are carried through opaquely.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSnapshot {
    pub version: String,
    pub metadata: SnapshotMetadata,
    pub config: serde_json::Value,
    pub teams: Vec<Team>,
    pub venues: Vec<Venue>,
    pub pools: Vec<Pool>,
    pub matches: Vec<Match>,
    pub available_slots: Vec<SlotKey>,
    pub occupied_slots: Vec<SlotKey>,
    pub statistics: serde_json::Value,
}

impl ScheduleSnapshot {
    /// Parses and validates a snapshot from its JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: SnapshotDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Reads, parses and validates a snapshot file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Converts a parsed wire document into a validated snapshot.
    pub fn from_document(doc: SnapshotDocument) -> Result<Self> {
        let teams: Vec<Team> = doc.entities.teams.into_iter().map(Team::from).collect();
        let pools: Vec<Pool> = doc.entities.pools.into_iter().map(Pool::from).collect();

        let mut venues = Vec::with_capacity(doc.entities.venues.len());
        for wire in doc.entities.venues {
            if wire.capacity < 1 {
                return Err(SnapshotError::InvalidCapacity {
                    venue: wire.id,
                    capacity: wire.capacity,
                });
            }
            venues.push(Venue {
                id: VenueId::new(wire.id),
                name: wire.name,
                capacity: wire.capacity,
            });
        }

        let mut matches =
            Vec::with_capacity(doc.matches.scheduled.len() + doc.matches.unscheduled.len());
        for wire in doc
            .matches
            .scheduled
            .into_iter()
            .chain(doc.matches.unscheduled)
        {
            matches.push(wire.into_match()?);
        }

        Ok(Self {
            version: doc.version,
            metadata: doc.metadata,
            config: doc.config,
            teams,
            venues,
            pools,
            matches,
            available_slots: doc.slots.available,
            occupied_slots: doc.slots.occupied,
            statistics: doc.statistics,
        })
    }

    /// Identity of the solver run, when the document carries one.
    pub fn solution_id(&self) -> Option<&str> {
        self.metadata.solution_id.as_deref()
    }
}

/// Top-level wire shape of a snapshot document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: SnapshotMetadata,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub entities: EntitiesDocument,
    #[serde(default)]
    pub matches: MatchesDocument,
    #[serde(default)]
    pub slots: SlotsDocument,
    #[serde(default)]
    pub statistics: serde_json::Value,
}

fn default_version() -> String {
    "1.0".to_owned()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntitiesDocument {
    #[serde(rename = "equipes", default)]
    pub teams: Vec<TeamDocument>,
    #[serde(rename = "gymnases", default)]
    pub venues: Vec<VenueDocument>,
    #[serde(rename = "poules", default)]
    pub pools: Vec<PoolDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchesDocument {
    #[serde(default)]
    pub scheduled: Vec<MatchDocument>,
    #[serde(default)]
    pub unscheduled: Vec<MatchDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotsDocument {
    #[serde(default)]
    pub available: Vec<SlotKey>,
    #[serde(default)]
    pub occupied: Vec<SlotKey>,
}

/// Wire shape of one match, scheduled or not.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDocument {
    pub match_id: String,
    pub equipe1_id: String,
    pub equipe2_id: String,
    #[serde(rename = "semaine", default)]
    pub week: Option<u32>,
    #[serde(rename = "horaire", default)]
    pub time: Option<String>,
    #[serde(rename = "gymnase", default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub is_entente: bool,
    #[serde(default)]
    pub penalties: Option<PenaltyBreakdown>,
}

impl MatchDocument {
    fn into_match(self) -> Result<Match> {
        let assignment = Assignment::from_parts(self.week, self.time, self.venue).map_err(
            |source| SnapshotError::PartialAssignment {
                match_id: self.match_id.clone(),
                source,
            },
        )?;
        Ok(Match {
            id: MatchId::new(self.match_id),
            home: TeamId::new(self.equipe1_id),
            away: TeamId::new(self.equipe2_id),
            assignment,
            fixed: self.is_fixed,
            external: self.is_external,
            entente: self.is_entente,
            penalties: self.penalties,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamDocument {
    #[serde(rename = "equipe_id")]
    pub id: String,
    #[serde(rename = "nom", default)]
    pub name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(rename = "genre", default)]
    pub gender: String,
    #[serde(rename = "poule_id", default)]
    pub pool: Option<String>,
    #[serde(rename = "horaires_preferes", default)]
    pub preferred_times: Vec<String>,
    #[serde(rename = "gymnases_preferes", default)]
    pub preferred_venues: Vec<String>,
}

impl From<TeamDocument> for Team {
    fn from(wire: TeamDocument) -> Self {
        Team {
            id: TeamId::new(wire.id),
            name: wire.name,
            institution: wire.institution,
            gender: wire.gender,
            pool: wire.pool.map(PoolId::new),
            preferred_times: wire.preferred_times,
            preferred_venues: wire.preferred_venues.into_iter().map(VenueId::new).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueDocument {
    #[serde(rename = "gymnase_id")]
    pub id: String,
    #[serde(rename = "nom", default)]
    pub name: String,
    #[serde(rename = "capacite")]
    pub capacity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolDocument {
    #[serde(rename = "poule_id")]
    pub id: String,
    #[serde(rename = "nom", default)]
    pub name: String,
    #[serde(rename = "genre", default)]
    pub gender: String,
    #[serde(rename = "niveau", default)]
    pub level: String,
}

impl From<PoolDocument> for Pool {
    fn from(wire: PoolDocument) -> Self {
        Pool {
            id: PoolId::new(wire.id),
            name: wire.name,
            gender: wire.gender,
            level: wire.level,
        }
    }
}
