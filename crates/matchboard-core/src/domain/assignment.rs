//! Slot keys and the all-or-nothing assignment of a match.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AssignmentError;

use super::ids::VenueId;

/// The triple `(week, time, venue)` acting as the unit of capacity
/// contention.
///
/// Slots are derived keys, not stored entities: several matches may share a
/// slot up to the venue's capacity. The wire names (`semaine`, `horaire`,
/// `gymnase`) are pinned for compatibility with the solver's documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    #[serde(rename = "semaine")]
    pub week: u32,
    #[serde(rename = "horaire")]
    pub time: String,
    #[serde(rename = "gymnase")]
    pub venue: VenueId,
}

impl SlotKey {
    pub fn new(week: u32, time: impl Into<String>, venue: impl Into<VenueId>) -> Self {
        Self {
            week,
            time: time.into(),
            venue: venue.into(),
        }
    }

    /// True when `other` falls in the same week and time, at any venue.
    ///
    /// A team cannot play two matches at the same time regardless of venue,
    /// so team-conflict scans compare on this relation rather than full
    /// slot equality.
    pub fn same_period(&self, other: &SlotKey) -> bool {
        self.week == other.week && self.time == other.time
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {} {} @ {}", self.week, self.time, self.venue)
    }
}

/// Placement of a match: fully assigned to a slot, or not assigned at all.
///
/// Collapsing the three nullable wire fields into one sum type removes the
/// partially-assigned states the wire format would otherwise admit.
///
/// # Examples
///
/// ```
/// use matchboard_core::Assignment;
///
/// let a = Assignment::from_parts(Some(3), Some("18:00".into()), Some("gym-1".into())).unwrap();
/// assert!(a.is_assigned());
///
/// let none = Assignment::from_parts(None, None, None).unwrap();
/// assert_eq!(none, Assignment::Unassigned);
///
/// // A half-filled slot is rejected at the boundary.
/// assert!(Assignment::from_parts(Some(3), None, None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Assignment {
    #[default]
    Unassigned,
    Assigned(SlotKey),
}

impl Assignment {
    /// Validates wire-level slot fields into an assignment.
    ///
    /// All three fields present yields `Assigned`; all three absent yields
    /// `Unassigned`; any other combination is an [`AssignmentError`].
    pub fn from_parts(
        week: Option<u32>,
        time: Option<String>,
        venue: Option<String>,
    ) -> Result<Self, AssignmentError> {
        match (week, time, venue) {
            (Some(week), Some(time), Some(venue)) => {
                Ok(Assignment::Assigned(SlotKey::new(week, time, venue)))
            }
            (None, None, None) => Ok(Assignment::Unassigned),
            (week, time, venue) => Err(AssignmentError {
                week: week.is_some(),
                time: time.is_some(),
                venue: venue.is_some(),
            }),
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Assignment::Assigned(_))
    }

    pub fn slot(&self) -> Option<&SlotKey> {
        match self {
            Assignment::Assigned(slot) => Some(slot),
            Assignment::Unassigned => None,
        }
    }

    pub fn into_slot(self) -> Option<SlotKey> {
        match self {
            Assignment::Assigned(slot) => Some(slot),
            Assignment::Unassigned => None,
        }
    }
}

impl From<Option<SlotKey>> for Assignment {
    fn from(slot: Option<SlotKey>) -> Self {
        match slot {
            Some(slot) => Assignment::Assigned(slot),
            None => Assignment::Unassigned,
        }
    }
}

impl From<SlotKey> for Assignment {
    fn from(slot: SlotKey) -> Self {
        Assignment::Assigned(slot)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignment::Unassigned => f.write_str("unassigned"),
            Assignment::Assigned(slot) => slot.fmt(f),
        }
    }
}
