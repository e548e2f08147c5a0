//! Projection of the current state: base snapshot + journal replay.
//!
//! `project` never mutates the snapshot it reads. It deep-copies the base,
//! walks the journal in order, rewrites each touched match's assignment and
//! keeps the slot occupancy in step, then rebuilds the lookup tables. It is
//! cheap enough to re-run from scratch on every journal change, which is
//! exactly what the session does.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use tracing::warn;

use matchboard_core::{
    detect_slot_conflicts, preference_notes, ConflictReport, EntityIndex, IndexedEntities, Match,
    MatchId, Pool, ScheduleSnapshot, SlotKey, Team, Venue,
};

use crate::journal::ModificationJournal;

/// Occupancy of every used slot, keyed deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotBoard {
    occupancy: BTreeMap<SlotKey, SmallVec<[MatchId; 2]>>,
}

impl SlotBoard {
    fn from_matches(matches: &[Match]) -> Self {
        let mut board = Self::default();
        for m in matches {
            if let Some(slot) = m.slot() {
                board.occupy(slot.clone(), m.id.clone());
            }
        }
        board
    }

    fn occupy(&mut self, slot: SlotKey, id: MatchId) {
        let ids = self.occupancy.entry(slot).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    fn free(&mut self, slot: &SlotKey, id: &MatchId) {
        if let Some(ids) = self.occupancy.get_mut(slot) {
            ids.retain(|occupant| occupant != id);
            if ids.is_empty() {
                self.occupancy.remove(slot);
            }
        }
    }

    /// Matches occupying one slot, in placement order.
    pub fn matches_at(&self, slot: &SlotKey) -> &[MatchId] {
        self.occupancy
            .get(slot)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn occupancy_of(&self, slot: &SlotKey) -> usize {
        self.occupancy.get(slot).map(SmallVec::len).unwrap_or(0)
    }

    /// Every occupied slot with its occupants, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &[MatchId])> {
        self.occupancy
            .iter()
            .map(|(slot, ids)| (slot, ids.as_slice()))
    }

    /// Match ids across all venues of one `(week, time)` period.
    ///
    /// A team cannot play twice at the same time anywhere, so team-conflict
    /// scans read the whole period, not a single venue.
    pub fn matches_in_period<'a>(
        &'a self,
        week: u32,
        time: &'a str,
    ) -> impl Iterator<Item = &'a MatchId> {
        self.occupancy
            .iter()
            .filter(move |(slot, _)| slot.week == week && slot.time == time)
            .flat_map(|(_, ids)| ids.iter())
    }

    pub fn occupied_slot_count(&self) -> usize {
        self.occupancy.len()
    }
}

/// The current view of the timetable: a fully independent copy of the base
/// with the journal replayed on top.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedSchedule {
    matches: Vec<Match>,
    teams: Vec<Team>,
    venues: Vec<Venue>,
    pools: Vec<Pool>,
    index: EntityIndex,
    board: SlotBoard,
}

impl IndexedEntities for ProjectedSchedule {
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

impl ProjectedSchedule {
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    pub fn board(&self) -> &SlotBoard {
        &self.board
    }

    /// Matches occupying one slot, resolved.
    pub fn matches_in_slot(&self, slot: &SlotKey) -> Vec<&Match> {
        self.board
            .matches_at(slot)
            .iter()
            .filter_map(|id| self.match_by_id(id))
            .collect()
    }

    /// Conflict classification for one slot of the current view.
    ///
    /// An unknown venue leaves the capacity rule out rather than failing:
    /// dangling references are the caller's to surface.
    pub fn conflicts_for_slot(
        &self,
        slot: &SlotKey,
        institution_threshold: usize,
    ) -> ConflictReport {
        let matches = self.matches_in_slot(slot);
        let capacity = self.slot_capacity(slot).unwrap_or(u32::MAX);
        detect_slot_conflicts(&matches, capacity, institution_threshold, |id| {
            self.team_by_id(id)
        })
    }

    /// Advisory preference annotations for one slot.
    pub fn preference_notes_for_slot(&self, slot: &SlotKey) -> Vec<String> {
        let matches = self.matches_in_slot(slot);
        preference_notes(&matches, slot, |id| self.team_by_id(id))
    }

    /// Every occupied slot paired with its conflict report, conflicted
    /// slots only.
    pub fn conflict_summary(&self, institution_threshold: usize) -> Vec<(SlotKey, ConflictReport)> {
        self.board
            .iter()
            .map(|(slot, _)| {
                let report = self.conflicts_for_slot(slot, institution_threshold);
                (slot.clone(), report)
            })
            .filter(|(_, report)| report.has_conflict())
            .collect()
    }
}

/// Computes the current view from the base snapshot and the journal.
///
/// Guarantee: with an empty journal the projected matches, teams, venues,
/// pools and occupancy are structurally equal to the base snapshot's.
pub fn project(base: &ScheduleSnapshot, journal: &ModificationJournal) -> ProjectedSchedule {
    let mut matches = base.matches.clone();
    let positions = EntityIndex::build_from_parts(&matches, &base.teams, &base.venues, &base.pools);
    let mut board = SlotBoard::from_matches(&matches);

    for record in journal.records() {
        let Some(pos) = positions.match_pos(&record.match_id) else {
            warn!(match_id = %record.match_id, "journal names an unknown match, skipped");
            continue;
        };
        let m = &mut matches[pos];
        // The record's original slot is the match's effective slot at this
        // point of the replay; freeing the effective slot keeps occupancy
        // consistent even for imported records with a stale `original`.
        if let Some(slot) = m.slot() {
            let slot = slot.clone();
            board.free(&slot, &m.id);
        }
        if let Some(slot) = record.new.slot() {
            board.occupy(slot.clone(), m.id.clone());
        }
        m.assignment = record.new.clone();
    }

    let index = EntityIndex::build_from_parts(&matches, &base.teams, &base.venues, &base.pools);
    ProjectedSchedule {
        matches,
        teams: base.teams.clone(),
        venues: base.venues.clone(),
        pools: base.pools.clone(),
        index,
        board,
    }
}
