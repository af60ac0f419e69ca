//! Widget base state and capability traits.
//!
//! Widgets are positionable units with a size/alignment/margin box and a
//! visibility flag. A widget has no knowledge of its own position; position
//! is owned entirely by its container. Interactive widgets additionally
//! participate in the two-phase update protocol (see [`Interactive`]).
//!
//! Dynamic dispatch goes through a small set of capability interfaces
//! rather than an inheritance chain: every widget implements [`Widget`];
//! widgets that receive values from the host also implement [`Interactive`]
//! and surface it via [`Widget::as_interactive`].

pub mod widgets;

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use trellis_core::WidgetId;

use crate::error::Result;
use crate::geometry::{HorizontalAlign, Margins, SizeConstraints, VerticalAlign};
use crate::protocol::ResultPayload;

/// Shared handle to a widget in the dialog tree.
///
/// The engine is single-threaded; widgets are shared between their owning
/// container, collapse-group links, and notification closures via
/// `Rc<RefCell<..>>`.
pub type SharedWidget = Rc<RefCell<dyn Widget>>;

/// Wrap a concrete widget into a [`SharedWidget`] handle.
pub fn shared<W: Widget + 'static>(widget: W) -> Rc<RefCell<W>> {
    Rc::new(RefCell::new(widget))
}

/// State common to every widget: identity, visibility, and the
/// size/alignment/margin box.
#[derive(Debug, Clone)]
pub struct WidgetBase {
    /// Stable opaque id, assigned at construction.
    id: WidgetId,
    /// Whether the widget is currently visible.
    visible: bool,
    /// Whether the widget accepts input.
    enabled: bool,
    /// Size hints handed to the host.
    constraints: SizeConstraints,
    /// Horizontal alignment within the resolved cell.
    h_align: HorizontalAlign,
    /// Vertical alignment within the resolved cell.
    v_align: VerticalAlign,
    /// Margins around the widget.
    margins: Margins,
    /// Id of the owning container, if any.
    parent: Option<WidgetId>,
}

impl WidgetBase {
    /// Create a new base with a fresh id; visible and enabled.
    pub fn new() -> Self {
        Self {
            id: WidgetId::next(),
            visible: true,
            enabled: true,
            constraints: SizeConstraints::none(),
            h_align: HorizontalAlign::default(),
            v_align: VerticalAlign::default(),
            margins: Margins::default(),
            parent: None,
        }
    }

    /// The widget's stable opaque id.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Whether the widget is currently visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the widget.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether the widget accepts input.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable input. Disabled widgets are still positioned and
    /// validated.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The widget's size hints.
    pub fn constraints(&self) -> &SizeConstraints {
        &self.constraints
    }

    /// Mutable access to the size hints; assignments validate.
    pub fn constraints_mut(&mut self) -> &mut SizeConstraints {
        &mut self.constraints
    }

    /// Set a fixed width. Zero is rejected.
    pub fn set_width(&mut self, width: Option<u32>) -> Result<()> {
        self.constraints.set_width(width)
    }

    /// Set a fixed height. Zero is rejected.
    pub fn set_height(&mut self, height: Option<u32>) -> Result<()> {
        self.constraints.set_height(height)
    }

    /// Horizontal alignment within the resolved cell.
    pub fn h_align(&self) -> HorizontalAlign {
        self.h_align
    }

    /// Set the horizontal alignment.
    pub fn set_h_align(&mut self, align: HorizontalAlign) {
        self.h_align = align;
    }

    /// Vertical alignment within the resolved cell.
    pub fn v_align(&self) -> VerticalAlign {
        self.v_align
    }

    /// Set the vertical alignment.
    pub fn set_v_align(&mut self, align: VerticalAlign) {
        self.v_align = align;
    }

    /// Margins around the widget.
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Set the margins.
    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// Id of the owning container, if any.
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Record the owning container. Containers call this on add/remove;
    /// a child is owned by at most one container at a time.
    pub(crate) fn set_parent(&mut self, parent: Option<WidgetId>) {
        self.parent = parent;
    }
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self::new()
    }
}

/// The base capability every positionable element implements.
pub trait Widget {
    /// Shared base state.
    fn base(&self) -> &WidgetBase;

    /// Mutable base state.
    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Wire type tag, e.g. `"checkbox"`.
    fn kind(&self) -> &'static str;

    /// Widget-specific wire properties (current value, label, entries, ...).
    fn properties(&self) -> Value;

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The interactive capability, if this widget receives values from the
    /// host.
    fn as_interactive(&self) -> Option<&dyn Interactive> {
        None
    }

    /// Mutable interactive capability.
    fn as_interactive_mut(&mut self) -> Option<&mut dyn Interactive> {
        None
    }

    /// The widget's stable opaque id.
    fn id(&self) -> WidgetId {
        self.base().id()
    }
}

/// The two-phase update capability.
///
/// After the host returns a result payload, the dialog runs two strictly
/// ordered phases over the visible interactive widgets:
///
/// 1. **apply-result**: [`apply_result`](Self::apply_result) runs once per
///    widget, in any order. The widget extracts its own value from the
///    payload, always updates its cached value, and stages a pending change
///    record only when the value differs (by widget-specific equality) and
///    the widget currently wants notifications.
/// 2. **raise-notifications**: after *every* widget finished phase 1,
///    [`raise_pending`](Self::raise_pending) fires the staged notification.
///    A handler that reads a sibling widget therefore always observes the
///    sibling's new value.
///
/// The staged change must never survive a round:
/// [`discard_pending`](Self::discard_pending) resets it when phase 2 is
/// skipped (navigation short-circuit) or after it ran.
pub trait Interactive {
    /// Whether at least one live subscriber exists across all of this
    /// widget's notification kinds.
    ///
    /// The host protocol relies on this flag to avoid reporting unused
    /// values over the wire; it flips to `false` the instant the last
    /// subscriber disconnects.
    fn wants_notify(&self) -> bool;

    /// Phase 1: extract this widget's value from the payload and update
    /// cached state. Stages a pending change only when the value changed
    /// and [`wants_notify`](Self::wants_notify) holds.
    fn apply_result(&mut self, payload: &ResultPayload);

    /// Whether a change is staged for phase 2.
    fn has_pending(&self) -> bool;

    /// Phase 2: emit the staged notification, if any, and clear it.
    ///
    /// Takes `&self`: the staged record lives behind interior mutability so
    /// a handler may re-read this widget while the emission is in flight.
    fn raise_pending(&self);

    /// Drop any staged change without notifying.
    fn discard_pending(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_defaults() {
        let base = WidgetBase::new();
        assert!(base.is_visible());
        assert!(base.is_enabled());
        assert_eq!(base.parent(), None);
        assert_eq!(base.h_align(), HorizontalAlign::Stretch);
    }

    #[test]
    fn test_base_ids_are_unique() {
        let a = WidgetBase::new();
        let b = WidgetBase::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_invalid_width_leaves_state_untouched() {
        let mut base = WidgetBase::new();
        base.set_width(Some(200)).unwrap();
        assert!(base.set_width(Some(0)).is_err());
        assert_eq!(base.constraints().width, Some(200));
    }
}
