//! Drag gesture orchestration and pre-commit validation.
//!
//! A gesture runs `Idle -> Dragging -> (drop on slot | drop on match |
//! cancel) -> Idle`. Drops validate against the *current* projected state
//! before anything reaches the journal; rejections are ordinary values
//! carrying a severity and a human-readable detail, not errors. A cancelled
//! gesture emits nothing, and nothing is cancellable after commit except
//! through `undo`.

use std::fmt;

use matchboard_core::{ConflictSeverity, IndexedEntities, MatchId, SlotKey, TeamId, VenueId};

use crate::journal::ModificationRecord;
use crate::projector::ProjectedSchedule;
use crate::session::EditSession;

/// Lifecycle of one drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        match_id: MatchId,
    },
}

/// Why a drop was blocked before reaching the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropRejection {
    /// Drop received without a preceding `begin_drag`.
    NoActiveDrag,
    UnknownMatch(MatchId),
    /// The match is locked and never moved by drag edits.
    FixedMatch(MatchId),
    /// The target slot's venue does not exist in the dataset.
    UnknownVenue(VenueId),
    /// The target slot is already at its venue's capacity.
    SlotFull {
        slot: SlotKey,
        occupancy: usize,
        capacity: u32,
    },
    /// One of the match's teams already plays at that week and time.
    TeamBusy {
        team: TeamId,
        week: u32,
        time: String,
    },
}

impl DropRejection {
    /// Severity reported alongside the rejection for UI display.
    pub fn severity(&self) -> ConflictSeverity {
        match self {
            DropRejection::SlotFull { .. } | DropRejection::TeamBusy { .. } => {
                ConflictSeverity::Critical
            }
            _ => ConflictSeverity::Warning,
        }
    }
}

impl fmt::Display for DropRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropRejection::NoActiveDrag => f.write_str("no drag gesture in progress"),
            DropRejection::UnknownMatch(id) => write!(f, "match '{id}' does not exist"),
            DropRejection::FixedMatch(id) => write!(f, "match '{id}' is fixed and cannot move"),
            DropRejection::UnknownVenue(id) => write!(f, "venue '{id}' does not exist"),
            DropRejection::SlotFull {
                slot,
                occupancy,
                capacity,
            } => write!(
                f,
                "slot {slot} is full ({occupancy}/{capacity} matches)"
            ),
            DropRejection::TeamBusy { team, week, time } => write!(
                f,
                "team '{team}' already plays in week {week} at {time}"
            ),
        }
    }
}

/// Result of completing a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// One record committed to the journal.
    Committed(ModificationRecord),
    /// Two records committed atomically (a swap).
    Swapped(ModificationRecord, ModificationRecord),
    /// The drop would not change anything; nothing was emitted.
    Unchanged,
    /// Blocked before journal admission.
    Rejected(DropRejection),
}

impl DropOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, DropOutcome::Committed(_) | DropOutcome::Swapped(..))
    }

    pub fn rejection(&self) -> Option<&DropRejection> {
        match self {
            DropOutcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// True when the slot has room for one more match.
///
/// A slot whose venue does not resolve is never available.
pub fn is_slot_available(projected: &ProjectedSchedule, slot: &SlotKey) -> bool {
    match projected.slot_capacity(slot) {
        Some(capacity) => projected.board().occupancy_of(slot) < capacity as usize,
        None => false,
    }
}

/// First team of `teams` that already plays at `(week, time)` in any venue,
/// ignoring the matches listed in `exclude`.
///
/// Scanning the whole period rather than one venue is what makes "a team
/// cannot play twice at the same time" hold across venues. Excluding the
/// moved match itself is what keeps a drop onto the match's own slot from
/// reading as a self-conflict.
pub fn team_conflict_in_period(
    projected: &ProjectedSchedule,
    week: u32,
    time: &str,
    teams: [&TeamId; 2],
    exclude: &[&MatchId],
) -> Option<TeamId> {
    for id in projected.board().matches_in_period(week, time) {
        if exclude.contains(&id) {
            continue;
        }
        let Some(m) = projected.match_by_id(id) else {
            continue;
        };
        for team in teams {
            if m.involves(team) {
                return Some(team.clone());
            }
        }
    }
    None
}

/// Drives one drag gesture at a time against an [`EditSession`].
#[derive(Debug, Default)]
pub struct DragOrchestrator {
    state: DragState,
}

impl DragOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// The match currently being dragged, if any.
    pub fn dragged(&self) -> Option<&MatchId> {
        match &self.state {
            DragState::Dragging { match_id } => Some(match_id),
            DragState::Idle => None,
        }
    }

    /// Starts a gesture. Returns `false` (staying idle) when the match does
    /// not exist in the current projection.
    pub fn begin_drag(&mut self, session: &EditSession, match_id: &MatchId) -> bool {
        if session.projected().match_by_id(match_id).is_none() {
            return false;
        }
        self.state = DragState::Dragging {
            match_id: match_id.clone(),
        };
        true
    }

    /// Abandons the gesture without emitting anything.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Completes the gesture on an empty slot position.
    pub fn drop_on_slot(&mut self, session: &mut EditSession, target: SlotKey) -> DropOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { match_id } => session.move_match(&match_id, target),
            DragState::Idle => DropOutcome::Rejected(DropRejection::NoActiveDrag),
        }
    }

    /// Completes the gesture on another match: a swap of the two slots.
    pub fn drop_on_match(&mut self, session: &mut EditSession, target: &MatchId) -> DropOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { match_id } => session.swap_matches(&match_id, target),
            DragState::Idle => DropOutcome::Rejected(DropRejection::NoActiveDrag),
        }
    }
}
