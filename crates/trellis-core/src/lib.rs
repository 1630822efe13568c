//! Core services for Trellis.
//!
//! This crate provides the foundational components the Trellis widget
//! controllers are built on:
//!
//! - **Signal/Slot System**: Type-safe notification for controller state
//!   changes
//! - **Deferred Timers**: Fire-once deadline queue for delayed transition
//!   stages
//! - **Logging**: `tracing` target constants shared across the workspace
//!
//! Trellis assumes the single-threaded, event-driven execution model of its
//! host widget framework: signals deliver directly on the emitting thread,
//! and the deferred queue is pumped by whoever owns the event loop.
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
//!     println!("Value changed to: {value}");
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Deferred Timer Example
//!
//! ```
//! use std::time::Duration;
//! use trellis_core::DeferredQueue;
//!
//! let mut queue = DeferredQueue::new();
//! let id = queue.defer(Duration::ZERO);
//!
//! // The event loop drains expired entries and routes the IDs back to
//! // whichever controller scheduled them.
//! for fired in queue.fire_expired() {
//!     assert_eq!(fired, id);
//! }
//! ```

mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use error::{CoreError, Result, SignalError, TimerError};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{DeferredQueue, TimerId};
