//! Core systems for Horizon Trellis.
//!
//! This crate provides the foundational components of the Horizon Trellis
//! data-binding framework:
//!
//! - **Signal/Slot System**: Type-safe change notification between
//!   datasources, adapters, and views
//! - **Logging**: `tracing` integration with per-subsystem targets
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_trellis_core::Signal;
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

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
