//! Domain model for match timetables.
//!
//! Entities mirror the solver's output: matches between two teams, venues
//! with a concurrent-match capacity, and pools grouping teams for standings.
//! A match's placement is a single [`Assignment`] sum type, never three
//! independently nullable fields.

mod assignment;
mod entities;
mod ids;

#[cfg(test)]
mod tests;

pub use assignment::{Assignment, SlotKey};
pub use entities::{Match, PenaltyBreakdown, Pool, Team, Venue};
pub use ids::{MatchId, PoolId, TeamId, VenueId};
