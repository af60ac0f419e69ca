//! Trellis - a logical-grid dialog composition and interaction engine.
//!
//! Trellis lets a program declare a tree of UI controls, arrange them on a
//! logical grid of rows and columns, hand the resolved description to an
//! external rendering host, and receive back precise, exactly-once change
//! notifications for the values the user touched. Nothing here renders a
//! pixel; the host is an opaque collaborator behind
//! [`RenderHost`](protocol::RenderHost).
//!
//! The building blocks, leaf to root:
//!
//! - [`widget`]: the widget base box and the two-phase update contract
//! - [`widget::widgets`]: concrete controls (labels, fields, checkboxes,
//!   collapse groups, tree checklists)
//! - [`layout`]: panels with grid and stack composition strategies, and
//!   recursive coordinate resolution
//! - [`dialog`]: the root container and the submission cycle
//! - [`protocol`]: the serializable host boundary
//!
//! # Example
//!
//! ```no_run
//! use trellis::dialog::Dialog;
//! use trellis::widget::shared;
//! use trellis::widget::widgets::{Checkbox, TextField};
//! # struct MyHost;
//! # impl trellis::protocol::RenderHost for MyHost {
//! #     fn submit(&mut self, _: &trellis::protocol::RenderRequest, _: bool)
//! #         -> Result<Option<trellis::protocol::ResultPayload>, trellis::HostError> { Ok(None) }
//! # }
//!
//! fn main() -> trellis::Result<()> {
//!     let mut dialog = Dialog::stack_vertical("Settings");
//!     let name = shared(TextField::new().with_placeholder("Name"));
//!     let notify = shared(Checkbox::new("Send notifications"));
//!     dialog.add_widget(name.clone())?;
//!     dialog.add_widget(notify.clone())?;
//!
//!     notify.borrow_mut().toggled.connect(|&on| {
//!         println!("notifications: {on}");
//!     });
//!
//!     let mut host = MyHost;
//!     dialog.show(&mut host)?;
//!     Ok(())
//! }
//! ```

pub mod diagnostics;
pub mod dialog;
mod error;
pub mod geometry;
pub mod layout;
pub mod protocol;
pub mod widget;

pub use error::{ConflictReport, HostError, OverlapConflict, Result, TrellisError};
pub use trellis_core::{ConnectionGuard, ConnectionId, Signal, WidgetId};

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::dialog::Dialog;
    pub use crate::geometry::{
        Bounds, HorizontalAlign, Location, Margins, TrackSize, VerticalAlign,
    };
    pub use crate::layout::{Child, Panel, SharedPanel, StackAxis};
    pub use crate::protocol::{RenderHost, RenderRequest, ResultPayload};
    pub use crate::widget::widgets::{
        Button, Checkbox, CollapseGroup, Label, ListEntry, NumberField, SelectionList, TextField,
        TreeChange, TreeChecklist,
    };
    pub use crate::widget::{shared, Interactive, SharedWidget, Widget};
    pub use crate::{Result, Signal, TrellisError, WidgetId};
}
