//! The root container and submission cycle.
//!
//! A [`Dialog`] owns a root panel, dialog-level sizing hints, and the per
//! round control flow: resolve absolute placements, validate overlap,
//! serialize the visible widgets, hand the request to the host, and run the
//! two-phase update over the response.
//!
//! # Example
//!
//! ```ignore
//! let mut dialog = Dialog::stack_vertical("Settings");
//! let name = shared(TextField::new());
//! dialog.add_widget(name.clone())?;
//!
//! dialog.show(&mut host)?; // blocks for one user interaction
//! println!("name: {}", name.borrow().text());
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use trellis_core::{logging::targets, Signal};

use crate::diagnostics;
use crate::error::{Result, TrellisError};
use crate::geometry::{Bounds, Location, TrackSize};
use crate::layout::{validate_no_overlap, Panel, Placed, SharedPanel};
use crate::protocol::{RenderHost, RenderRequest, ResultPayload, WidgetDescription};
use crate::widget::SharedWidget;

/// A root container with sizing hints and the host submission cycle.
pub struct Dialog {
    title: String,
    width: Bounds,
    height: Bounds,
    /// Sparse per-row size overrides; unmapped rows default to `Auto`.
    row_sizes: BTreeMap<u32, TrackSize>,
    /// Sparse per-column size overrides; unmapped columns default to `Auto`.
    column_sizes: BTreeMap<u32, TrackSize>,
    overlap_check: bool,
    root: SharedPanel,
    /// Emitted once per interactive round, before any widget notification.
    pub interacted: Signal<()>,
    /// Emitted when "navigate back" triggered the submission. Skips widget
    /// phase 2 for the round.
    pub navigated_back: Signal<()>,
    /// Emitted when "navigate forward" triggered the submission. Skips
    /// widget phase 2 for the round.
    pub navigated_forward: Signal<()>,
}

impl Dialog {
    /// Create a dialog whose root panel is a grid.
    pub fn grid(title: impl Into<String>) -> Self {
        Self::with_root(title, Panel::grid())
    }

    /// Create a dialog whose root panel is a vertical stack.
    pub fn stack_vertical(title: impl Into<String>) -> Self {
        Self::with_root(title, Panel::stack_vertical())
    }

    /// Create a dialog whose root panel is a horizontal stack.
    pub fn stack_horizontal(title: impl Into<String>) -> Self {
        Self::with_root(title, Panel::stack_horizontal())
    }

    fn with_root(title: impl Into<String>, root: Panel) -> Self {
        Self {
            title: title.into(),
            width: Bounds::unbounded(),
            height: Bounds::unbounded(),
            row_sizes: BTreeMap::new(),
            column_sizes: BTreeMap::new(),
            overlap_check: true,
            root: Rc::new(RefCell::new(root)),
            interacted: Signal::new(),
            navigated_back: Signal::new(),
            navigated_forward: Signal::new(),
        }
    }

    /// The dialog title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the dialog title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The root panel. Nested structure is built through this handle.
    pub fn root(&self) -> SharedPanel {
        Rc::clone(&self.root)
    }

    /// Set the width bounds using builder pattern.
    pub fn with_width(mut self, width: Bounds) -> Self {
        self.width = width;
        self
    }

    /// Set the height bounds using builder pattern.
    pub fn with_height(mut self, height: Bounds) -> Self {
        self.height = height;
        self
    }

    /// Set the width bounds.
    pub fn set_width(&mut self, width: Bounds) {
        self.width = width;
    }

    /// Set the height bounds.
    pub fn set_height(&mut self, height: Bounds) {
        self.height = height;
    }

    /// Override the size of one row. Unmapped rows stay `Auto`.
    pub fn set_row_size(&mut self, row: u32, size: TrackSize) {
        self.row_sizes.insert(row, size);
    }

    /// Override the size of one column. Unmapped columns stay `Auto`.
    pub fn set_column_size(&mut self, column: u32, size: TrackSize) {
        self.column_sizes.insert(column, size);
    }

    /// Whether overlap validation runs before submission.
    pub fn overlap_check(&self) -> bool {
        self.overlap_check
    }

    /// Enable or disable overlap validation. Disabling lets the caller
    /// deliberately stack widgets in one cell and offset them via margins.
    pub fn set_overlap_check(&mut self, enabled: bool) {
        self.overlap_check = enabled;
    }

    // =========================================================================
    // Child Management (forwarded to the root panel)
    // =========================================================================

    /// Add a widget at an explicit location. Grid dialogs only.
    pub fn add_widget_at(&self, widget: SharedWidget, location: Location) -> Result<()> {
        self.root.borrow_mut().add_widget_at(widget, location)
    }

    /// Add a nested panel at an explicit location. Grid dialogs only.
    pub fn add_panel_at(&self, panel: SharedPanel, location: Location) -> Result<()> {
        self.root.borrow_mut().add_panel_at(panel, location)
    }

    /// Append a widget to the flow. Stack dialogs only.
    pub fn add_widget(&self, widget: SharedWidget) -> Result<()> {
        self.root.borrow_mut().add_widget(widget)
    }

    /// Append a nested panel to the flow. Stack dialogs only.
    pub fn add_panel(&self, panel: SharedPanel) -> Result<()> {
        self.root.borrow_mut().add_panel(panel)
    }

    // =========================================================================
    // Submission Cycle
    // =========================================================================

    /// Present the dialog and block for one user interaction, then run the
    /// two-phase update over the response.
    pub fn show(&mut self, host: &mut dyn RenderHost) -> Result<()> {
        self.run_round(host, true)
    }

    /// Push the current state to the host without waiting for a response.
    ///
    /// Result application is skipped entirely; a long-running caller can
    /// invoke this repeatedly as a progress display.
    pub fn display(&mut self, host: &mut dyn RenderHost) -> Result<()> {
        self.run_round(host, false)
    }

    fn run_round(&mut self, host: &mut dyn RenderHost, await_response: bool) -> Result<()> {
        let placed = self.root.borrow().resolve_placements(0, 0);
        if self.overlap_check {
            validate_no_overlap(&placed)?;
        }
        if tracing::event_enabled!(target: targets::DIALOG, tracing::Level::TRACE) {
            tracing::trace!(
                target: targets::DIALOG,
                tree = %diagnostics::format_tree(&self.root.borrow(), &Default::default()),
                "submitting"
            );
        }
        let request = self.build_request(&placed);
        tracing::debug!(
            target: targets::DIALOG,
            title = %self.title,
            widgets = request.widgets.len(),
            await_response,
            "submitting to host"
        );
        let response = host.submit(&request, await_response)?;
        if !await_response {
            return Ok(());
        }
        let payload = response.ok_or(TrellisError::MissingResponse)?;
        self.apply_round(&placed, &payload);
        Ok(())
    }

    /// Build the wire request from resolved placements.
    fn build_request(&self, placed: &[Placed]) -> RenderRequest {
        let root = self.root.borrow();
        let rows = (0..root.row_count())
            .map(|i| self.row_sizes.get(&i).copied().unwrap_or(TrackSize::Auto).to_string())
            .collect();
        let columns = (0..root.column_count())
            .map(|i| {
                self.column_sizes
                    .get(&i)
                    .copied()
                    .unwrap_or(TrackSize::Auto)
                    .to_string()
            })
            .collect();
        let widgets = placed
            .iter()
            .map(|p| {
                let w = p.widget.borrow();
                WidgetDescription {
                    id: w.id().to_string(),
                    kind: w.kind().to_string(),
                    row: p.location.row,
                    column: p.location.column,
                    row_span: p.location.row_span,
                    column_span: p.location.column_span,
                    h_align: w.base().h_align(),
                    v_align: w.base().v_align(),
                    margins: w.base().margins(),
                    enabled: w.base().is_enabled(),
                    wants_notify: w.as_interactive().map_or(false, |i| i.wants_notify()),
                    properties: w.properties(),
                }
            })
            .collect();
        RenderRequest {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            rows,
            columns,
            widgets,
        }
    }

    /// Run the two-phase update over one response payload.
    ///
    /// Phase 1 applies the payload to every widget that was submitted;
    /// only after all of them finished does any notification fire, so a
    /// phase-2 handler reading a sibling always observes the sibling's new
    /// value. The phase-2 set is snapshotted up front, so a handler may
    /// mutate the container tree without corrupting iteration.
    fn apply_round(&mut self, placed: &[Placed], payload: &ResultPayload) {
        let interactive: Vec<SharedWidget> = placed
            .iter()
            .filter(|p| p.widget.borrow().as_interactive().is_some())
            .map(|p| Rc::clone(&p.widget))
            .collect();

        // Phase 1: state sync, any order, no notifications.
        for widget in &interactive {
            let mut w = widget.borrow_mut();
            if let Some(i) = w.as_interactive_mut() {
                i.apply_result(payload);
            }
        }

        // The dialog-level "interacted" notification always fires first.
        self.interacted.emit(());

        // A navigation action short-circuits widget phase 2; staged
        // changes never carry over into the next round.
        if payload.back_pressed || payload.forward_pressed {
            for widget in &interactive {
                let w = widget.borrow();
                if let Some(i) = w.as_interactive() {
                    i.discard_pending();
                }
            }
            tracing::debug!(
                target: targets::DIALOG,
                back = payload.back_pressed,
                forward = payload.forward_pressed,
                "navigation short-circuit"
            );
            if payload.back_pressed {
                self.navigated_back.emit(());
            } else {
                self.navigated_forward.emit(());
            }
            return;
        }

        // Phase 2 over a pre-captured snapshot of flagged widgets.
        let flagged: Vec<SharedWidget> = interactive
            .iter()
            .filter(|w| {
                w.borrow()
                    .as_interactive()
                    .is_some_and(|i| i.has_pending())
            })
            .map(Rc::clone)
            .collect();
        for widget in &flagged {
            let w = widget.borrow();
            if let Some(i) = w.as_interactive() {
                i.raise_pending();
            }
        }

        // Nothing staged survives the round.
        for widget in &interactive {
            let w = widget.borrow();
            if let Some(i) = w.as_interactive() {
                i.discard_pending();
            }
        }
    }
}
