//! Container composition and placement resolution.
//!
//! A [`Panel`](panel::Panel) owns a set of widgets and nested panels, each
//! with a location relative to the panel's own coordinate frame, and
//! resolves absolute grid placements by recursive coordinate translation.
//! [`validate`] checks the resolved placements for overlaps before a
//! submission leaves for the host.

pub mod panel;
pub mod validate;

pub use panel::{Child, Panel, Placed, SharedPanel, StackAxis};
pub use validate::validate_no_overlap;
