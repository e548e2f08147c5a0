//! Lookup tables over the base dataset.
//!
//! The index is rebuilt, never patched: building it twice over the same data
//! yields the same tables, and grouping vectors preserve insertion order so
//! iteration stays deterministic.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{Match, MatchId, Pool, PoolId, SlotKey, Team, TeamId, Venue, VenueId};
use crate::snapshot::ScheduleSnapshot;

/// Positional lookups and grouping maps for one set of entities.
///
/// Positions refer into the slices the index was built from; holders pair
/// the index with their own entity vectors. A match referencing a team or
/// venue that does not exist is retained in the groupings; lookups for the
/// dangling reference return `None` and callers handle absence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityIndex {
    match_pos: HashMap<MatchId, usize>,
    team_pos: HashMap<TeamId, usize>,
    venue_pos: HashMap<VenueId, usize>,
    pool_pos: HashMap<PoolId, usize>,
    matches_by_week: BTreeMap<u32, Vec<MatchId>>,
    matches_by_venue: HashMap<VenueId, Vec<MatchId>>,
    matches_by_pool: HashMap<PoolId, Vec<MatchId>>,
}

impl EntityIndex {
    /// Builds the index over a base snapshot.
    pub fn build(snapshot: &ScheduleSnapshot) -> Self {
        Self::build_from_parts(
            &snapshot.matches,
            &snapshot.teams,
            &snapshot.venues,
            &snapshot.pools,
        )
    }

    /// Builds the index over explicit entity slices.
    ///
    /// Used both for the base snapshot and for projected match lists, which
    /// share teams, venues and pools with the base.
    pub fn build_from_parts(
        matches: &[Match],
        teams: &[Team],
        venues: &[Venue],
        pools: &[Pool],
    ) -> Self {
        let mut index = Self::default();

        for (pos, team) in teams.iter().enumerate() {
            index.team_pos.insert(team.id.clone(), pos);
        }
        for (pos, venue) in venues.iter().enumerate() {
            index.venue_pos.insert(venue.id.clone(), pos);
        }
        for (pos, pool) in pools.iter().enumerate() {
            index.pool_pos.insert(pool.id.clone(), pos);
        }

        for (pos, m) in matches.iter().enumerate() {
            index.match_pos.insert(m.id.clone(), pos);

            if let Some(slot) = m.slot() {
                index
                    .matches_by_week
                    .entry(slot.week)
                    .or_default()
                    .push(m.id.clone());
                index
                    .matches_by_venue
                    .entry(slot.venue.clone())
                    .or_default()
                    .push(m.id.clone());
            }

            // A match belongs to the pools of its teams (deduplicated when
            // both teams share one).
            let mut seen: Option<&PoolId> = None;
            for team_id in m.teams() {
                let pool = index
                    .team_pos
                    .get(team_id)
                    .and_then(|&pos| teams.get(pos))
                    .and_then(|team| team.pool.as_ref());
                if let Some(pool) = pool {
                    if seen != Some(pool) {
                        index
                            .matches_by_pool
                            .entry(pool.clone())
                            .or_default()
                            .push(m.id.clone());
                        seen = Some(pool);
                    }
                }
            }
        }

        index
    }

    pub fn match_pos(&self, id: &MatchId) -> Option<usize> {
        self.match_pos.get(id).copied()
    }

    pub fn team_pos(&self, id: &TeamId) -> Option<usize> {
        self.team_pos.get(id).copied()
    }

    pub fn venue_pos(&self, id: &VenueId) -> Option<usize> {
        self.venue_pos.get(id).copied()
    }

    pub fn pool_pos(&self, id: &PoolId) -> Option<usize> {
        self.pool_pos.get(id).copied()
    }

    /// Assigned matches of one week, in document order.
    pub fn matches_in_week(&self, week: u32) -> &[MatchId] {
        self.matches_by_week
            .get(&week)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Weeks that have at least one assigned match, ascending.
    pub fn weeks(&self) -> impl Iterator<Item = u32> + '_ {
        self.matches_by_week.keys().copied()
    }

    pub fn matches_at_venue(&self, venue: &VenueId) -> &[MatchId] {
        self.matches_by_venue
            .get(venue)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn matches_in_pool(&self, pool: &PoolId) -> &[MatchId] {
        self.matches_by_pool
            .get(pool)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn match_count(&self) -> usize {
        self.match_pos.len()
    }
}

/// Convenience accessors pairing an index with its entity slices.
pub trait IndexedEntities {
    fn entity_index(&self) -> &EntityIndex;
    fn match_slice(&self) -> &[Match];
    fn team_slice(&self) -> &[Team];
    fn venue_slice(&self) -> &[Venue];
    fn pool_slice(&self) -> &[Pool];

    fn match_by_id(&self, id: &MatchId) -> Option<&Match> {
        self.entity_index()
            .match_pos(id)
            .and_then(|pos| self.match_slice().get(pos))
    }

    fn team_by_id(&self, id: &TeamId) -> Option<&Team> {
        self.entity_index()
            .team_pos(id)
            .and_then(|pos| self.team_slice().get(pos))
    }

    fn venue_by_id(&self, id: &VenueId) -> Option<&Venue> {
        self.entity_index()
            .venue_pos(id)
            .and_then(|pos| self.venue_slice().get(pos))
    }

    fn pool_by_id(&self, id: &PoolId) -> Option<&Pool> {
        self.entity_index()
            .pool_pos(id)
            .and_then(|pos| self.pool_slice().get(pos))
    }

    /// Capacity of a slot's venue, when the venue exists.
    fn slot_capacity(&self, slot: &SlotKey) -> Option<u32> {
        self.venue_by_id(&slot.venue).map(|venue| venue.capacity)
    }
}

#[cfg(test)]
mod tests;
