//! Core systems for Trellis.
//!
//! This crate provides the foundational components of the Trellis dialog
//! engine:
//!
//! - **Signal/Slot System**: Type-safe change notification with explicit
//!   subscriber counting
//! - **Identity**: Opaque, stable widget identifiers used to address result
//!   payloads from the rendering host
//! - **Logging**: `tracing` target and span-name constants for filtering
//!
//! # Signal/Slot Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Subscriber Counting
//!
//! The engine uses [`Signal::connection_count`] to decide whether a widget
//! "wants" change notifications from the host at all. A count of zero means
//! the widget's value does not need to be reported back over the wire:
//!
//! ```
//! use trellis_core::Signal;
//!
//! let changed = Signal::<String>::new();
//! assert_eq!(changed.connection_count(), 0);
//!
//! let id = changed.connect(|_| {});
//! assert_eq!(changed.connection_count(), 1);
//!
//! changed.disconnect(id);
//! assert_eq!(changed.connection_count(), 0);
//! ```

mod id;
pub mod logging;
pub mod signal;

pub use id::WidgetId;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
