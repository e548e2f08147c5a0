//! Pure conflict detection over the matches sharing one slot.
//!
//! Detection is free of side effects and independent of any rendering or
//! session state, so it can be exercised directly in tests and invoked both
//! reactively (blocking an edit) and descriptively (annotating a slot).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Match, SlotKey, Team, TeamId};

/// Ordered classification of how serious a slot's contention is.
///
/// The derived ordering is `None < Warning < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    #[default]
    None,
    Warning,
    Critical,
}

/// The kinds of conflict a slot can exhibit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// More matches in the slot than the venue allows.
    OverCapacity,
    /// The same team appears in more than one match of the slot.
    TeamDuplicate,
    /// One institution is over-represented in the slot.
    InstitutionOverlap,
}

/// Result of classifying one slot's matches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConflictReport {
    pub severity: ConflictSeverity,
    pub kinds: Vec<ConflictKind>,
    pub details: Vec<String>,
}

impl ConflictReport {
    pub fn has_conflict(&self) -> bool {
        self.severity != ConflictSeverity::None
    }

    fn raise(&mut self, severity: ConflictSeverity, kind: ConflictKind, detail: String) {
        self.severity = self.severity.max(severity);
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self.details.push(detail);
    }
}

/// Classifies the matches sharing one slot.
///
/// Rules, in precedence order (the first applicable rule sets the severity
/// floor; every applicable kind is still reported):
///
/// 1. more matches than `capacity`: critical, [`ConflictKind::OverCapacity`]
/// 2. a team in more than one match: critical, [`ConflictKind::TeamDuplicate`]
/// 3. an institution appearing more than `institution_threshold` times:
///    warning, [`ConflictKind::InstitutionOverlap`]
///
/// `team_by_id` resolves institutions; teams that do not resolve are simply
/// skipped for rule 3.
pub fn detect_slot_conflicts<'a, F>(
    matches_in_slot: &[&Match],
    capacity: u32,
    institution_threshold: usize,
    team_by_id: F,
) -> ConflictReport
where
    F: Fn(&TeamId) -> Option<&'a Team>,
{
    let mut report = ConflictReport::default();

    if matches_in_slot.len() > capacity as usize {
        report.raise(
            ConflictSeverity::Critical,
            ConflictKind::OverCapacity,
            format!(
                "{} matches scheduled in a slot with capacity {}",
                matches_in_slot.len(),
                capacity
            ),
        );
    }

    let mut team_counts: HashMap<&TeamId, usize> = HashMap::new();
    for m in matches_in_slot {
        for team_id in m.teams() {
            *team_counts.entry(team_id).or_default() += 1;
        }
    }
    let mut duplicates: Vec<(&TeamId, usize)> = team_counts
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(&id, &count)| (id, count))
        .collect();
    duplicates.sort();
    for (team_id, count) in duplicates {
        let name = team_by_id(team_id)
            .map(|team| team.name.clone())
            .unwrap_or_else(|| team_id.to_string());
        report.raise(
            ConflictSeverity::Critical,
            ConflictKind::TeamDuplicate,
            format!("team '{name}' is scheduled in {count} matches of this slot"),
        );
    }

    let mut institution_counts: HashMap<&str, usize> = HashMap::new();
    for m in matches_in_slot {
        for team_id in m.teams() {
            if let Some(team) = team_by_id(team_id) {
                if !team.institution.is_empty() {
                    *institution_counts.entry(team.institution.as_str()).or_default() += 1;
                }
            }
        }
    }
    let mut crowded: Vec<(&str, usize)> = institution_counts
        .into_iter()
        .filter(|&(_, count)| count > institution_threshold)
        .collect();
    crowded.sort();
    for (institution, count) in crowded {
        report.raise(
            ConflictSeverity::Warning,
            ConflictKind::InstitutionOverlap,
            format!("institution '{institution}' appears {count} times in this slot"),
        );
    }

    report
}

/// Advisory notes for matches placed against their teams' stated
/// preferences.
///
/// Preferences never block or downgrade a slot; the notes only feed the
/// descriptive annotations next to the penalty breakdown.
pub fn preference_notes<'a, F>(
    matches_in_slot: &[&Match],
    slot: &SlotKey,
    team_by_id: F,
) -> Vec<String>
where
    F: Fn(&TeamId) -> Option<&'a Team>,
{
    let mut notes = Vec::new();
    for m in matches_in_slot {
        for team_id in m.teams() {
            let Some(team) = team_by_id(team_id) else {
                continue;
            };
            if !team.preferred_times.is_empty() && !team.preferred_times.contains(&slot.time) {
                notes.push(format!(
                    "'{}' prefers other times than {}",
                    team.name, slot.time
                ));
            }
            if !team.preferred_venues.is_empty() && !team.preferred_venues.contains(&slot.venue) {
                notes.push(format!("'{}' prefers other venues", team.name));
            }
        }
    }
    notes
}
