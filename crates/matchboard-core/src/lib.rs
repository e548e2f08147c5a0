//! Matchboard Core - domain model and conflict analysis for match timetables
//!
//! This crate provides the foundational types for the calendar engine:
//! - Typed domain entities (matches, teams, venues, pools) and their ids
//! - The frozen solver snapshot document and its boundary validation
//! - Lookup tables over a snapshot (by id, by week, by pool, by venue)
//! - Pure slot conflict detection with ordered severities

pub mod conflict;
pub mod domain;
pub mod error;
pub mod index;
pub mod snapshot;

pub use conflict::{
    detect_slot_conflicts, preference_notes, ConflictKind, ConflictReport, ConflictSeverity,
};
pub use domain::{
    Assignment, Match, MatchId, PenaltyBreakdown, Pool, PoolId, SlotKey, Team, TeamId, Venue,
    VenueId,
};
pub use error::{AssignmentError, Result, SnapshotError};
pub use index::{EntityIndex, IndexedEntities};
pub use snapshot::{ScheduleSnapshot, SnapshotMetadata};
