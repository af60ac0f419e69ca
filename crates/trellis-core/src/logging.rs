//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! The constants in [`targets`] and [`span_names`] can be used with
//! `tracing` directives to filter logs by subsystem, e.g.
//! `RUST_LOG=trellis::dialog=debug`.

/// Span names used throughout Trellis for tracing.
pub mod span_names {
    /// Signal emission span.
    pub const SIGNAL: &str = "trellis::signal";
    /// Coordinate resolution span.
    pub const RESOLVE: &str = "trellis::resolve";
    /// Dialog submission round span.
    pub const SUBMIT: &str = "trellis::submit";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Layout composition target.
    pub const LAYOUT: &str = "trellis::layout";
    /// Dialog submission cycle target.
    pub const DIALOG: &str = "trellis::dialog";
    /// Host wire protocol target.
    pub const PROTOCOL: &str = "trellis::protocol";
    /// Widget update protocol target.
    pub const WIDGET: &str = "trellis::widget";
}
