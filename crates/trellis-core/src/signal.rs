//! Signal/slot system for Trellis.
//!
//! A type-safe observer mechanism for widget-controller communication.
//! Controllers own signals and emit them when their state changes; connected
//! slots (closures) are invoked in response.
//!
//! Trellis controllers run on the host framework's UI event loop, so emission
//! is always direct: slots execute synchronously on the emitting thread, in
//! connection order. There is no queued or cross-thread delivery.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let index_changed = Signal::<i32>::new();
//!
//! let conn_id = index_changed.connect(|&index| {
//!     println!("Index changed to: {index}");
//! });
//!
//! index_changed.emit(2);
//!
//! index_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot to invoke (Arc-wrapped so emission can run outside the lock).
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with a reference
/// to the provided arguments, in the order they were connected.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple for multiple arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync`. Slots are always invoked on the emitting
/// thread; cross-thread queuing is the host framework's concern, not this
/// crate's.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use trellis_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {s}"));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let connection = Connection {
            slot: Arc::new(slot),
        };
        self.connections.lock().insert(connection)
    }

    /// Connect a slot and receive an RAII guard that disconnects on drop.
    pub fn connect_guarded<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            signal: self,
            id: Some(self.connect(slot)),
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. Useful during
    /// initialization or batch updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// If the signal is blocked, this does nothing.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "trellis_core::signal", "signal blocked, skipping emit");
            return;
        }

        // Slots may connect or disconnect other slots while running; clone
        // the slot list so no lock is held during invocation.
        let slots: Vec<Arc<dyn Fn(&Args) + Send + Sync>> = {
            let connections = self.connections.lock();
            connections.iter().map(|(_, c)| c.slot.clone()).collect()
        };

        tracing::trace!(target: "trellis_core::signal", connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

/// RAII guard that disconnects a signal connection when dropped.
///
/// Created by [`Signal::connect_guarded`].
pub struct ConnectionGuard<'a, Args: 'static> {
    signal: &'a Signal<Args>,
    id: Option<ConnectionId>,
}

impl<Args: 'static> ConnectionGuard<'_, Args> {
    /// Release the guard without disconnecting, returning the connection ID.
    pub fn release(mut self) -> ConnectionId {
        self.id.take().unwrap_or_default()
    }

    /// The connection ID this guard manages.
    pub fn id(&self) -> ConnectionId {
        self.id.unwrap_or_default()
    }
}

impl<Args: 'static> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.signal.disconnect(id);
        }
    }
}

static_assertions::assert_impl_all!(Signal<i32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn test_connect_and_emit() {
        let signal = Signal::<i32>::new();
        let sum = Arc::new(AtomicI32::new(0));

        let sum2 = sum.clone();
        signal.connect(move |&v| {
            sum2.fetch_add(v, Ordering::SeqCst);
        });

        signal.emit(3);
        signal.emit(4);
        assert_eq!(sum.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicI32::new(0));

        let count2 = count.clone();
        let id = signal.connect(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(());
        assert!(signal.disconnect(id));
        signal.emit(());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        // Second disconnect of the same ID fails.
        assert!(!signal.disconnect(id));
    }

    #[test]
    fn test_multiple_slots_in_order() {
        let signal = Signal::<i32>::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log2 = log.clone();
            signal.connect(move |&v| {
                log2.lock().push((tag, v));
            });
        }

        signal.emit(9);
        assert_eq!(
            *log.lock(),
            vec![("first", 9), ("second", 9), ("third", 9)]
        );
    }

    #[test]
    fn test_blocked() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicI32::new(0));

        let count2 = count.clone();
        signal.connect(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        signal.set_blocked(true);
        assert!(signal.is_blocked());
        signal.emit(());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        signal.connect(|_| {});
        signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 2);

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard() {
        let signal = Signal::<()>::new();
        {
            let _guard = signal.connect_guarded(|_| {});
            assert_eq!(signal.connection_count(), 1);
        }
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_guard_id_is_live_until_drop() {
        let signal = Signal::<i32>::new();
        let guard = signal.connect_guarded(|_| {});
        let id = guard.id();

        // The guarded connection is reachable through its ID while the
        // guard lives, and gone once it drops.
        assert_eq!(signal.connection_count(), 1);
        drop(guard);
        assert!(!signal.disconnect(id));
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_guard_release() {
        let signal = Signal::<()>::new();
        let id = {
            let guard = signal.connect_guarded(|_| {});
            guard.release()
        };
        // Released guard keeps the connection alive.
        assert_eq!(signal.connection_count(), 1);
        assert!(signal.disconnect(id));
    }

    #[test]
    fn test_slot_disconnecting_during_emit() {
        // A slot that disconnects all connections mid-emit must not deadlock.
        let signal = Arc::new(Signal::<()>::new());
        let signal2 = signal.clone();
        signal.connect(move |_| {
            signal2.disconnect_all();
        });
        signal.emit(());
        assert_eq!(signal.connection_count(), 0);
    }
}
