//! Synchronous change notification.
//!
//! A [`Signal`] holds a set of slots. [`Signal::emit`] calls every slot on
//! the emitting thread, in connection order, before returning. Models use
//! signals to announce resets and views connect to them to invalidate their
//! layout.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use skope_core::Signal;
//!
//! let reset = Signal::<()>::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = seen.clone();
//! let id = reset.connect(move |_| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! reset.emit(());
//! reset.disconnect(id);
//! reset.emit(());
//! assert_eq!(seen.load(Ordering::Relaxed), 1);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identifies one slot connected to a [`Signal`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A list of slots invoked with `&Args` on every [`emit`](Self::emit).
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Adds `slot` and returns the id that removes it again.
    pub fn connect(&self, slot: impl Fn(&Args) + Send + Sync + 'static) -> ConnectionId {
        let id = self.slots.lock().insert(Arc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Adds `slot` for as long as the returned guard lives.
    pub fn connect_scoped(&self, slot: impl Fn(&Args) + Send + Sync + 'static) -> ConnectionGuard<'_, Args> {
        ConnectionGuard {
            id: self.connect(slot),
            signal: self,
        }
    }

    /// Removes a slot. Returns `false` if `id` was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// While blocked, [`emit`](Self::emit) drops its arguments unseen.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::Release);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    /// Calls every connected slot with `args`.
    ///
    /// The slot list is copied before the first call, so slots may connect or
    /// disconnect on this same signal; such changes apply from the next emit.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "emit suppressed while blocked");
            return;
        }

        let snapshot: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = snapshot.len(), "emit");
        for slot in &snapshot {
            slot(&args);
        }
    }
}

/// Disconnects its slot on drop. Returned by [`Signal::connect_scoped`].
pub struct ConnectionGuard<'a, Args: 'static> {
    signal: &'a Signal<Args>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<'_, Args> {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: 'static> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder<T: Clone + Send + 'static>(signal: &Signal<T>) -> (ConnectionId, Arc<Mutex<Vec<T>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let id = signal.connect(move |value: &T| sink.lock().push(value.clone()));
        (id, log)
    }

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<usize>::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let order = order.clone();
            signal.connect(move |row| order.lock().push((tag, *row)));
        }

        signal.emit(4);
        assert_eq!(*order.lock(), vec![("first", 4), ("second", 4)]);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<u32>::new();
        let (id, log) = recorder(&signal);

        signal.emit(1);
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(2);
        assert_eq!(*log.lock(), vec![1]);
    }

    #[test]
    fn test_blocked_signal_is_silent() {
        let signal = Signal::<u32>::new();
        let (_, log) = recorder(&signal);

        signal.set_blocked(true);
        assert!(signal.is_blocked());
        signal.emit(1);
        signal.set_blocked(false);
        signal.emit(2);
        assert_eq!(*log.lock(), vec![2]);
    }

    #[test]
    fn test_scoped_connection() {
        let signal = Signal::<String>::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let sink = log.clone();
            let guard = signal.connect_scoped(move |text: &String| sink.lock().push(text.clone()));
            assert_eq!(signal.connection_count(), 1);
            signal.emit("inside".to_string());
            drop(guard);
        }
        signal.emit("outside".to_string());

        assert_eq!(*log.lock(), vec!["inside".to_string()]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_may_disconnect_all_while_emitting() {
        let signal = Arc::new(Signal::<()>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&signal);
        let counter = calls.clone();
        signal.connect(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
            if let Some(signal) = weak.upgrade() {
                signal.disconnect_all();
            }
        });
        signal.connect(|_| {});

        signal.emit(());
        signal.emit(());
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(signal.connection_count(), 0);
    }
}
