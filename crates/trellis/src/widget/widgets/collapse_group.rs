//! Collapsible group widget with cascading visibility.

use std::any::Any;
use std::cell::Cell;
use std::collections::HashSet;

use serde_json::{json, Value};
use trellis_core::{Signal, WidgetId};

use crate::layout::{Child, SharedPanel};
use crate::protocol::ResultPayload;
use crate::widget::{Interactive, SharedWidget, Widget, WidgetBase};

/// A header widget that toggles the visibility of a linked set of widgets
/// and panels.
///
/// Linked children are not owned by the group; they stay in whatever panel
/// positions them. Toggling computes the transitive affected set and
/// applies `visible = !collapsed` to every member:
///
/// - collapsing always recurses into linked groups, so a nested group's own
///   children disappear with it
/// - expanding recurses only into linked groups that are not themselves
///   collapsed; an already-collapsed nested group keeps its children hidden
///
/// # Example
///
/// ```ignore
/// let details = shared(CollapseGroup::new("Details"));
/// details.borrow_mut().link_widget(path_field.clone());
/// details.borrow_mut().link_widget(size_field.clone());
/// details.borrow_mut().set_collapsed(true); // both fields hidden
/// ```
pub struct CollapseGroup {
    base: WidgetBase,
    label: String,
    collapsed: bool,
    linked: Vec<Child>,
    /// Pending change staged by phase 1 for phase 2.
    pending: Cell<Option<bool>>,
    /// Emitted with the new collapsed state when it changed in a round.
    pub toggled: Signal<bool>,
}

impl CollapseGroup {
    /// Create an expanded group with the given header label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(),
            label: label.into(),
            collapsed: false,
            linked: Vec::new(),
            pending: Cell::new(None),
            toggled: Signal::new(),
        }
    }

    /// The header label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the group is collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Link a widget whose visibility follows this group.
    pub fn link_widget(&mut self, widget: SharedWidget) {
        self.linked.push(Child::Widget(widget));
    }

    /// Link a panel whose visibility follows this group.
    pub fn link_panel(&mut self, panel: SharedPanel) {
        self.linked.push(Child::Panel(panel));
    }

    /// The linked children, in link order.
    pub fn linked(&self) -> &[Child] {
        &self.linked
    }

    /// Unlink a child by id. The child's current visibility is left as is.
    pub fn unlink(&mut self, id: WidgetId) {
        self.linked.retain(|child| child.try_id() != Some(id));
    }

    /// Collapse or expand the group programmatically, cascading visibility
    /// through the affected set. Emits `toggled` on change.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        if self.collapsed == collapsed {
            return;
        }
        self.collapsed = collapsed;
        self.apply_cascade(collapsed);
        self.toggled.emit(collapsed);
    }

    /// Apply `visible = !collapsed` to the transitive affected set.
    fn apply_cascade(&self, collapsed: bool) {
        let mut visited = HashSet::new();
        visited.insert(self.base.id());
        self.cascade_into(collapsed, &mut visited);
        tracing::debug!(
            target: trellis_core::logging::targets::WIDGET,
            group = %self.base.id(),
            collapsed,
            affected = visited.len() - 1,
            "collapse cascade applied"
        );
    }

    fn cascade_into(&self, collapsed: bool, visited: &mut HashSet<WidgetId>) {
        for child in &self.linked {
            // A borrowed child can only be a link cycle back into a group
            // already on the cascade path.
            let Some(id) = child.try_id() else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            child.set_visible(!collapsed);
            if let Child::Widget(w) = child {
                let w = w.borrow();
                if let Some(nested) = w.as_any().downcast_ref::<CollapseGroup>() {
                    // Collapsing always descends; expanding skips groups
                    // that are themselves collapsed, so their children stay
                    // hidden.
                    if collapsed || !nested.collapsed {
                        nested.cascade_into(collapsed, visited);
                    }
                }
            }
        }
    }
}

impl Widget for CollapseGroup {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "collapse-group"
    }

    fn properties(&self) -> Value {
        json!({ "label": self.label, "collapsed": self.collapsed })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_interactive(&self) -> Option<&dyn Interactive> {
        Some(self)
    }

    fn as_interactive_mut(&mut self) -> Option<&mut dyn Interactive> {
        Some(self)
    }
}

impl Interactive for CollapseGroup {
    fn wants_notify(&self) -> bool {
        self.toggled.connection_count() > 0
    }

    fn apply_result(&mut self, payload: &ResultPayload) {
        let Some(collapsed) = payload.value_of(self.base.id()).and_then(Value::as_bool) else {
            return;
        };
        if collapsed == self.collapsed {
            return;
        }
        // The cascade runs in phase 1 so phase-2 handlers observe the final
        // visibility of every affected widget.
        self.collapsed = collapsed;
        self.apply_cascade(collapsed);
        if self.wants_notify() {
            self.pending.set(Some(collapsed));
        }
    }

    fn has_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    fn raise_pending(&self) {
        if let Some(collapsed) = self.pending.take() {
            self.toggled.emit(collapsed);
        }
    }

    fn discard_pending(&self) {
        self.pending.set(None);
    }
}
