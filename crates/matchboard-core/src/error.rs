//! Error types for Matchboard Core

use thiserror::Error;

/// Error raised when a snapshot document cannot be loaded or validated.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document is not valid JSON or does not match the expected shape.
    #[error("snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document could not be read from disk.
    #[error("snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A venue declares a capacity below the minimum of 1.
    #[error("venue '{venue}' has invalid capacity {capacity} (must be >= 1)")]
    InvalidCapacity { venue: String, capacity: u32 },

    /// A match carries some but not all of its slot fields.
    #[error("match '{match_id}': {source}")]
    PartialAssignment {
        match_id: String,
        source: AssignmentError,
    },
}

/// Error raised when slot fields do not form a complete assignment.
///
/// A match is either fully assigned (week, time and venue all present) or
/// fully unassigned; anything in between is rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("slot fields must be all present or all absent (week: {week}, time: {time}, venue: {venue})")]
pub struct AssignmentError {
    pub week: bool,
    pub time: bool,
    pub venue: bool,
}

/// Result type alias for Matchboard Core operations
pub type Result<T> = std::result::Result<T, SnapshotError>;
