//! Matchboard Engine
//!
//! The editing core layered on top of a frozen solver snapshot:
//! - Modification journal with undo/redo and capped history
//! - State projection (snapshot + journal replay = current view)
//! - Versioned export/import of the journal
//! - Durable journal store with degraded-but-alive failure handling
//! - Edit event support for UI observers
//! - Drag orchestration validating edits before they are committed
//! - The edit session context object tying everything together
//!
//! The engine is single-threaded by contract: every mutation runs to
//! completion before the next one starts, and event listeners are invoked
//! strictly post-commit.

pub mod event;
pub mod export;
pub mod journal;
pub mod orchestrator;
pub mod projector;
pub mod session;
pub mod store;
pub mod test_utils;

pub use event::{
    CountingEditListener, EditEventListener, EditEventSupport, LoggingEditListener, SubscriptionId,
};
pub use export::{
    export_document, import_document, ExportDocument, ExportStatistics, ImportError, ImportMode,
    ImportReport, RecordError, WireModification, WireSlot, EXPORT_VERSION,
};
pub use journal::{ModificationJournal, ModificationRecord};
pub use orchestrator::{
    is_slot_available, team_conflict_in_period, DragOrchestrator, DragState, DropOutcome,
    DropRejection,
};
pub use projector::{project, ProjectedSchedule, SlotBoard};
pub use session::EditSession;
pub use store::{FileJournalStore, JournalDocument, JournalStore, MemoryJournalStore, StoreError};
