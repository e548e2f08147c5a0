//! Edit event support for UI observers and stat counters.
//!
//! Listeners are registered with [`EditEventSupport::subscribe`], which
//! returns a handle for later removal. Delivery is synchronous, in
//! registration order, and strictly post-commit.
//!
//! # Re-entrancy contract
//!
//! Listeners may read the current projected state but must not call back
//! into mutating session APIs (`move`, `undo`, `import`, ...) from inside a
//! notification. The engine is single-threaded and does not guard against
//! re-entrant mutation; this is a usage contract.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use matchboard_engine::event::{CountingEditListener, EditEventSupport};
//!
//! let mut support = EditEventSupport::new();
//! let counter = Arc::new(CountingEditListener::default());
//! let subscription = support.subscribe(counter.clone());
//!
//! support.notify_all_modifications_reverted();
//! assert_eq!(counter.reverted_count(), 1);
//!
//! support.unsubscribe(subscription);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use matchboard_core::MatchId;

use crate::journal::ModificationRecord;

/// Listener for edit events.
///
/// All methods have default empty bodies; implement only what you consume.
pub trait EditEventListener: Send + Sync {
    /// Called after a modification has been committed to the journal and
    /// the projection has been rebuilt.
    fn on_modification_applied(&self, _match_id: &MatchId, _record: &ModificationRecord) {}

    /// Called after the journal has been cleared.
    fn on_all_modifications_reverted(&self) {}
}

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registry of edit listeners with ordered, synchronous delivery.
#[derive(Default)]
pub struct EditEventSupport {
    listeners: Vec<(SubscriptionId, Arc<dyn EditEventListener>)>,
    next_id: u64,
}

impl EditEventSupport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its subscription handle.
    pub fn subscribe(&mut self, listener: Arc<dyn EditEventListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        debug!(subscription = id.0, "edit listener subscribed");
        id
    }

    /// Removes a subscription. Returns `false` when the handle is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        before != self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify_modification_applied(&self, match_id: &MatchId, record: &ModificationRecord) {
        for (_, listener) in &self.listeners {
            listener.on_modification_applied(match_id, record);
        }
    }

    pub fn notify_all_modifications_reverted(&self) {
        for (_, listener) in &self.listeners {
            listener.on_all_modifications_reverted();
        }
    }
}

impl std::fmt::Debug for EditEventSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Listener counting received events; useful for stat displays and tests.
#[derive(Debug, Default)]
pub struct CountingEditListener {
    applied: AtomicUsize,
    reverted: AtomicUsize,
}

impl CountingEditListener {
    pub fn applied_count(&self) -> usize {
        self.applied.load(Ordering::Relaxed)
    }

    pub fn reverted_count(&self) -> usize {
        self.reverted.load(Ordering::Relaxed)
    }
}

impl EditEventListener for CountingEditListener {
    fn on_modification_applied(&self, _match_id: &MatchId, _record: &ModificationRecord) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }

    fn on_all_modifications_reverted(&self) {
        self.reverted.fetch_add(1, Ordering::Relaxed);
    }
}

/// Listener tracing every event at debug level.
#[derive(Debug, Default)]
pub struct LoggingEditListener;

impl EditEventListener for LoggingEditListener {
    fn on_modification_applied(&self, match_id: &MatchId, record: &ModificationRecord) {
        debug!(match_id = %match_id, new = %record.new, "modification applied");
    }

    fn on_all_modifications_reverted(&self) {
        debug!("all modifications reverted");
    }
}
