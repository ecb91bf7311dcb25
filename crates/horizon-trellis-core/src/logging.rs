//! Logging and debugging facilities for Horizon Trellis.
//!
//! Horizon Trellis uses the `tracing` crate for instrumentation. To see
//! logs, install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every subsystem logs under its own target (see [`targets`]) so output
//! can be filtered with standard `tracing` directives, e.g.
//! `RUST_LOG=horizon_trellis::source=trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_trellis_core::signal";
    /// Collection datasource target.
    pub const SOURCE: &str = "horizon_trellis::source";
    /// Table-facet adapter target.
    pub const TABLE: &str = "horizon_trellis::table";
    /// Tree-facet adapter target.
    pub const TREE: &str = "horizon_trellis::tree";
    /// Composite tree-table adapter target.
    pub const TREE_TABLE: &str = "horizon_trellis::tree_table";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_trellis::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are re-exported for convenience but are just wrappers around
/// the `tracing` crate macros with consistent target naming.
#[macro_export]
macro_rules! trellis_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_trellis_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! trellis_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_trellis_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! trellis_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "horizon_trellis_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! trellis_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_trellis_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! trellis_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "horizon_trellis_core", $($arg)*)
    };
}
