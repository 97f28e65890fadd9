//! Typed publish/subscribe signal.
//!
//! One [`Signal`] per event kind, in the shape of an observer registry:
//! listeners subscribe and receive an explicit [`SubscriptionId`] so they
//! can be detached deterministically later. Delivery is synchronous and in
//! subscription order; a panicking listener is isolated at this boundary
//! and must never abort delivery to later listeners or reach the timer's
//! run loop.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

/// Handle identifying one subscription on one signal.
///
/// Ids are unique per signal, not globally; an id from one signal is
/// meaningless on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = std::sync::Arc<dyn Fn(&T) + Send + Sync>;

/// A named signal carrying payloads of type `T`.
pub struct Signal<T> {
    /// Signal name used in log output when a listener misbehaves.
    name: &'static str,
    /// Subscription registry, kept in subscription order.
    listeners: Mutex<Vec<(SubscriptionId, Listener<T>)>>,
    /// Next subscription id, monotonically increasing.
    next_id: AtomicU64,
}

impl<T> Signal<T> {
    /// Creates an empty signal.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a listener and returns its subscription handle.
    ///
    /// # Panics
    ///
    /// Panics if the listener registry lock is poisoned.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .lock()
            .expect("listener registry lock poisoned")
            .push((id, std::sync::Arc::new(listener)));
        id
    }

    /// Removes the subscription with the given handle.
    ///
    /// Returns `true` if a listener was removed, `false` if the handle was
    /// unknown (already unsubscribed handles are tolerated).
    ///
    /// # Panics
    ///
    /// Panics if the listener registry lock is poisoned.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .expect("listener registry lock poisoned");
        let before = listeners.len();
        listeners.retain(|(sub_id, _)| *sub_id != id);
        listeners.len() < before
    }

    /// Invokes every listener subscribed at the time of the call, in
    /// subscription order, with the same payload.
    ///
    /// The registry lock is released before any listener runs, so listeners
    /// may subscribe or unsubscribe from within a callback; such changes
    /// take effect on the next publish. A panicking listener is caught and
    /// logged, and delivery continues with the next listener.
    ///
    /// # Panics
    ///
    /// Panics if the listener registry lock is poisoned.
    pub fn publish(&self, payload: &T) {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .lock()
            .expect("listener registry lock poisoned")
            .iter()
            .map(|(_, listener)| std::sync::Arc::clone(listener))
            .collect();

        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(payload))).is_err() {
                warn!(signal = self.name, "listener panicked during publish");
            }
        }
    }

    /// Returns the number of current subscriptions.
    ///
    /// # Panics
    ///
    /// Panics if the listener registry lock is poisoned.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .expect("listener registry lock poisoned")
            .len()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
