//! Signal/slot system for Trellis.
//!
//! This module provides a type-safe signal/slot mechanism for change
//! notification. Signals are emitted by widgets when their state changes,
//! and connected slots (callbacks) are invoked in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Threading Model
//!
//! The dialog engine is single-threaded and strictly staged: a submission
//! round resolves, validates, waits on the host, and then runs the two
//! update phases in order. Slots are therefore plain `Rc<dyn Fn>` closures
//! invoked directly on the emitting call stack; there is no event loop to
//! queue onto and no cross-thread delivery.
//!
//! # Re-entrancy
//!
//! [`Signal::emit`] snapshots the connected slots before invoking any of
//! them, so a slot may connect or disconnect (including itself) while the
//! emission is in progress. Slots added during an emission are first
//! invoked on the next emission.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let text_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! // Emit the signal
//! text_changed.emit("Hello, World!".to_string());
//!
//! // Disconnect when done
//! text_changed.disconnect(conn_id);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

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
    /// The slot function to invoke.
    slot: Rc<dyn Fn(&Args)>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with the
/// provided arguments, in connection order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple like `(String, i32)` for
///   multiple arguments.
///
/// # Subscriber Counting
///
/// [`connection_count`](Self::connection_count) reports the number of live
/// subscribers. The widget update protocol relies on this to decide whether
/// a widget wants change notifications at all: the count drops to zero the
/// instant the last subscriber disconnects.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: Cell<bool>,
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
            blocked: Cell::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot
    /// later.
    ///
    /// # Example
    ///
    /// ```
    /// use trellis_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + 'static,
    {
        let connection = Connection { slot: Rc::new(slot) };
        self.connections.lock().insert(connection)
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false`
    /// otherwise.
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
        self.blocked.set(blocked);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// If the signal is blocked, this does nothing. The slot list is
    /// snapshotted before invocation, so slots may freely connect or
    /// disconnect during the emission.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "trellis_core::signal", "signal blocked, skipping emit");
            return;
        }

        // Snapshot under the lock, invoke outside it: slots may re-enter
        // connect/disconnect on this same signal.
        let slots: Vec<Rc<dyn Fn(&Args)>> = {
            let connections = self.connections.lock();
            tracing::trace!(
                target: "trellis_core::signal",
                connection_count = connections.len(),
                "emitting signal"
            );
            connections.values().map(|c| Rc::clone(&c.slot)).collect()
        };

        for slot in slots {
            slot(&args);
        }
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// This is useful for RAII-style connection management, ensuring
/// connections are cleaned up when the receiver goes out of scope. Created
/// via [`Signal::connect_scoped`].
///
/// # Example
///
/// ```
/// use trellis_core::Signal;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let signal = Signal::<i32>::new();
/// let total = Rc::new(Cell::new(0));
/// {
///     let total = total.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         total.set(total.get() + n);
///     });
///     signal.emit(42); // total = 42
/// }
/// signal.emit(43); // Nothing happens - connection was dropped
/// assert_eq!(total.get(), 42);
/// ```
pub struct ConnectionGuard<Args: 'static> {
    signal: *const Signal<Args>,
    id: ConnectionId,
}

impl<Args: 'static> Signal<Args> {
    /// Connect a slot with automatic disconnection when the guard is
    /// dropped.
    ///
    /// # Safety
    ///
    /// The returned guard holds a raw pointer to this signal. The signal
    /// must outlive the guard. Using `Rc<Signal<Args>>` is recommended for
    /// shared ownership.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: self as *const Signal<Args>,
            id,
        }
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        // SAFETY: The signal pointer is valid if the guard is used
        // correctly. The caller must ensure the signal outlives the guard.
        unsafe {
            if !self.signal.is_null() {
                let _ = (*self.signal).disconnect(self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.borrow_mut().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.borrow(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.borrow_mut().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.borrow(), vec![1]); // Only received before disconnect
    }

    #[test]
    fn test_disconnect_unknown_id_returns_false() {
        let signal = Signal::<i32>::new();
        let id = signal.connect(|_| {});
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.borrow_mut().push(value);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2); // Should be ignored
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(*received.borrow(), vec![1, 3]);
    }

    #[test]
    fn test_multiple_connections() {
        let signal = Signal::<String>::new();
        let count = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let count_clone = count.clone();
            signal.connect(move |_| {
                count_clone.set(count_clone.get() + 1);
            });
        }

        assert_eq!(signal.connection_count(), 3);
        signal.emit("test".to_string());
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();

        for _ in 0..5 {
            signal.connect(|_| {});
        }

        assert_eq!(signal.connection_count(), 5);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard() {
        let signal = Signal::<i32>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        {
            let received_clone = received.clone();
            let _guard = signal.connect_scoped(move |&value| {
                received_clone.borrow_mut().push(value);
            });
            signal.emit(1);
        } // Guard dropped here, connection should be removed

        signal.emit(2); // Should not be received

        assert_eq!(*received.borrow(), vec![1]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_signal_with_no_args() {
        let signal = Signal::<()>::new();
        let called = Rc::new(Cell::new(false));

        let called_clone = called.clone();
        signal.connect(move |_| {
            called_clone.set(true);
        });

        signal.emit(());
        assert!(called.get());
    }

    #[test]
    fn test_signal_with_multiple_args() {
        let signal = Signal::<(String, i32)>::new();
        let received = Rc::new(RefCell::new(None));

        let received_clone = received.clone();
        signal.connect(move |args| {
            *received_clone.borrow_mut() = Some(args.clone());
        });

        signal.emit(("hello".to_string(), 42));

        let value = received.borrow().clone();
        assert_eq!(value, Some(("hello".to_string(), 42)));
    }

    #[test]
    fn test_reentrant_disconnect_during_emit() {
        // A slot disconnecting itself mid-emission must not deadlock.
        let signal = Rc::new(Signal::<()>::new());
        let count = Rc::new(Cell::new(0));

        let id_slot = Rc::new(Cell::new(None));
        let signal_clone = signal.clone();
        let id_clone = id_slot.clone();
        let count_clone = count.clone();
        let id = signal.connect(move |_| {
            count_clone.set(count_clone.get() + 1);
            if let Some(id) = id_clone.get() {
                signal_clone.disconnect(id);
            }
        });
        id_slot.set(Some(id));

        signal.emit(());
        signal.emit(()); // Slot already gone

        assert_eq!(count.get(), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_reentrant_connect_during_emit() {
        // A slot connecting a new slot mid-emission: the new slot only
        // fires on subsequent emissions.
        let signal = Rc::new(Signal::<()>::new());
        let late_calls = Rc::new(Cell::new(0));

        let signal_clone = signal.clone();
        let late_clone = late_calls.clone();
        let armed = Rc::new(Cell::new(false));
        let armed_clone = armed.clone();
        signal.connect(move |_| {
            if !armed_clone.get() {
                armed_clone.set(true);
                let late = late_clone.clone();
                signal_clone.connect(move |_| {
                    late.set(late.get() + 1);
                });
            }
        });

        signal.emit(());
        assert_eq!(late_calls.get(), 0);

        signal.emit(());
        assert_eq!(late_calls.get(), 1);
    }
}
