//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every log line in the workspace carries one of the targets below, so a
//! subsystem can be filtered with a `tracing` directive such as
//! `trellis::stack=trace`.

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Deferred timer queue target.
    pub const TIMER: &str = "trellis_core::timer";
    /// Panel stack controller target.
    pub const STACK: &str = "trellis::stack";
    /// Page snap controller target.
    pub const SNAP: &str = "trellis::snap";
    /// Declarative configuration target.
    pub const CONFIG: &str = "trellis::config";
}
