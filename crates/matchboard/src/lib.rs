//! Matchboard - calendar state & conflict engine for match timetables
//!
//! A session-resident editing core over an external solver's output: load a
//! frozen snapshot, edit match placements through validated moves and
//! swaps, track every edit in an undoable journal, and round-trip the
//! journal as a versioned JSON document.
//!
//! # Example
//!
//! ```
//! use matchboard::prelude::*;
//!
//! let base = ScheduleSnapshot::from_json_str("{}").unwrap();
//! let mut session = EditSession::new(base, EngineConfig::default());
//!
//! assert_eq!(session.modification_count(), 0);
//! assert!(!session.undo());
//! ```

pub use matchboard_config::{ConfigError, EngineConfig};
pub use matchboard_core::{
    detect_slot_conflicts, Assignment, ConflictKind, ConflictReport, ConflictSeverity,
    EntityIndex, IndexedEntities, Match, MatchId, PenaltyBreakdown, Pool, PoolId,
    ScheduleSnapshot, SlotKey, SnapshotError, Team, TeamId, Venue, VenueId,
};
pub use matchboard_engine::{
    export_document, import_document, project, DragOrchestrator, DragState, DropOutcome,
    DropRejection, EditEventListener, EditEventSupport, EditSession, ExportDocument,
    FileJournalStore, ImportError, ImportMode, ImportReport, JournalDocument, JournalStore,
    MemoryJournalStore, ModificationJournal, ModificationRecord, ProjectedSchedule, StoreError,
    SubscriptionId,
};

/// Everything most callers need, in one import.
pub mod prelude {
    pub use matchboard_config::EngineConfig;
    pub use matchboard_core::{
        Assignment, ConflictReport, ConflictSeverity, IndexedEntities, Match, MatchId,
        ScheduleSnapshot, SlotKey, TeamId, VenueId,
    };
    pub use matchboard_engine::{
        DragOrchestrator, DropOutcome, DropRejection, EditSession, ImportMode,
        ModificationRecord,
    };
}
