//! Panels: the container composition model.
//!
//! A panel owns an ordered set of children (widgets or nested panels) and
//! one of two composition strategies:
//!
//! - **Grid**: the caller supplies an explicit row/column/span
//!   [`Location`] per child. Colliding locations are accepted at add time;
//!   they only become an error for *visible* widgets when the dialog
//!   validates before submission, because consumers routinely stack
//!   widgets that alternate visibility in the same cell.
//! - **Stack**: children are placed automatically, sequentially, along one
//!   axis, skipping hidden children. The flow is recomputed on every
//!   resolution call because visibility changes between rounds.
//!
//! Structural invariants are enforced at add time: a child is owned by at
//! most one panel, and a panel can never contain itself, directly or
//! transitively. Failed adds leave no partial state.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::WidgetId;

use crate::error::{Result, TrellisError};
use crate::geometry::Location;
use crate::widget::SharedWidget;

/// Shared handle to a panel in the dialog tree.
pub type SharedPanel = Rc<RefCell<Panel>>;

/// The axis a stack panel flows along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackAxis {
    /// Children flow downward, one per row (row-major).
    Vertical,
    /// Children flow rightward, one per column (column-major).
    Horizontal,
}

/// A child of a panel: either a leaf widget or a nested panel.
#[derive(Clone)]
pub enum Child {
    /// A leaf widget.
    Widget(SharedWidget),
    /// A nested panel.
    Panel(SharedPanel),
}

impl Child {
    /// The child's id, or `None` if the child is currently mutably
    /// borrowed (which can only be the element this call re-entered from).
    pub fn try_id(&self) -> Option<WidgetId> {
        match self {
            Self::Widget(w) => w.try_borrow().ok().map(|w| w.id()),
            Self::Panel(p) => p.try_borrow().ok().map(|p| p.id()),
        }
    }

    /// The child's id. Panics if the child is mutably borrowed.
    pub fn id(&self) -> WidgetId {
        match self {
            Self::Widget(w) => w.borrow().id(),
            Self::Panel(p) => p.borrow().id(),
        }
    }

    /// Whether the child is currently visible.
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Widget(w) => w.borrow().base().is_visible(),
            Self::Panel(p) => p.borrow().is_visible(),
        }
    }

    /// Show or hide the child.
    pub fn set_visible(&self, visible: bool) {
        match self {
            Self::Widget(w) => w.borrow_mut().base_mut().set_visible(visible),
            Self::Panel(p) => p.borrow_mut().set_visible(visible),
        }
    }
}

impl std::fmt::Debug for Child {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Widget(w) => match w.try_borrow() {
                Ok(w) => write!(f, "Widget({}, {})", w.kind(), w.id()),
                Err(_) => write!(f, "Widget(<borrowed>)"),
            },
            Self::Panel(p) => match p.try_borrow() {
                Ok(p) => write!(f, "Panel({})", p.id()),
                Err(_) => write!(f, "Panel(<borrowed>)"),
            },
        }
    }
}

/// How a child is positioned within its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Explicit grid location.
    At(Location),
    /// Sequential stack flow, occupying `span` slots along the axis.
    Flow {
        /// Slots occupied along the stacking axis.
        span: u32,
    },
}

/// One child with its placement.
#[derive(Debug, Clone)]
struct Entry {
    child: Child,
    placement: Placement,
}

/// The composition strategy of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Grid,
    Stack(StackAxis),
}

impl Strategy {
    fn name(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Stack(_) => "stack",
        }
    }
}

/// A resolved placement: one visible widget and its absolute location.
#[derive(Clone)]
pub struct Placed {
    /// The widget.
    pub widget: SharedWidget,
    /// The widget's absolute location after accumulating all ancestor
    /// offsets.
    pub location: Location,
}

impl std::fmt::Debug for Placed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.widget.try_borrow() {
            Ok(w) => write!(f, "Placed({}, {}, {})", w.kind(), w.id(), self.location),
            Err(_) => write!(f, "Placed(<borrowed>, {})", self.location),
        }
    }
}

/// A container owning widgets and nested panels with relative locations.
#[derive(Debug)]
pub struct Panel {
    id: WidgetId,
    visible: bool,
    strategy: Strategy,
    entries: Vec<Entry>,
    /// Id of the owning panel, if any.
    parent: Option<WidgetId>,
}

impl Panel {
    /// Create a grid panel: explicit locations per child.
    pub fn grid() -> Self {
        Self::with_strategy(Strategy::Grid)
    }

    /// Create a vertical stack panel: one child per row, top to bottom.
    pub fn stack_vertical() -> Self {
        Self::with_strategy(Strategy::Stack(StackAxis::Vertical))
    }

    /// Create a horizontal stack panel: one child per column, left to
    /// right.
    pub fn stack_horizontal() -> Self {
        Self::with_strategy(Strategy::Stack(StackAxis::Horizontal))
    }

    fn with_strategy(strategy: Strategy) -> Self {
        Self {
            id: WidgetId::next(),
            visible: true,
            strategy,
            entries: Vec::new(),
            parent: None,
        }
    }

    /// The panel's stable opaque id.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Whether the panel is currently visible. A hidden panel contributes
    /// nothing to resolution.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the panel and its whole subtree.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Id of the owning panel, if this panel has been nested.
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the panel has no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // =========================================================================
    // Child Management
    // =========================================================================

    /// Add a widget at an explicit location. Grid panels only.
    ///
    /// Colliding locations are accepted here; overlap is validated against
    /// *visible* widgets at submission time.
    pub fn add_widget_at(&mut self, widget: SharedWidget, location: Location) -> Result<()> {
        self.require_grid()?;
        self.claim_widget(&widget)?;
        self.entries.push(Entry {
            child: Child::Widget(widget),
            placement: Placement::At(location),
        });
        Ok(())
    }

    /// Add a nested panel at an explicit location. Grid panels only.
    pub fn add_panel_at(&mut self, panel: SharedPanel, location: Location) -> Result<()> {
        self.require_grid()?;
        self.claim_panel(&panel)?;
        self.entries.push(Entry {
            child: Child::Panel(panel),
            placement: Placement::At(location),
        });
        Ok(())
    }

    /// Append a widget to the flow. Stack panels only.
    pub fn add_widget(&mut self, widget: SharedWidget) -> Result<()> {
        self.add_widget_span(widget, 1)
    }

    /// Append a widget occupying `span` slots along the stacking axis.
    /// Stack panels only; spans below 1 are clamped.
    pub fn add_widget_span(&mut self, widget: SharedWidget, span: u32) -> Result<()> {
        self.require_stack()?;
        self.claim_widget(&widget)?;
        self.entries.push(Entry {
            child: Child::Widget(widget),
            placement: Placement::Flow { span: span.max(1) },
        });
        Ok(())
    }

    /// Append a nested panel to the flow. Stack panels only. The panel
    /// occupies as many slots as its derived row/column count; a panel
    /// whose derived count is 0 is skipped entirely.
    pub fn add_panel(&mut self, panel: SharedPanel) -> Result<()> {
        self.require_stack()?;
        self.claim_panel(&panel)?;
        self.entries.push(Entry {
            child: Child::Panel(panel),
            placement: Placement::Flow { span: 1 },
        });
        Ok(())
    }

    /// Remove a direct child by id, releasing its ownership.
    pub fn remove_child(&mut self, id: WidgetId) -> Result<Child> {
        let index = self
            .entries
            .iter()
            .position(|e| e.child.try_id() == Some(id))
            .ok_or(TrellisError::UnknownChild { id })?;
        let entry = self.entries.remove(index);
        match &entry.child {
            Child::Widget(w) => w.borrow_mut().base_mut().set_parent(None),
            Child::Panel(p) => p.borrow_mut().parent = None,
        }
        Ok(entry.child)
    }

    /// Move a direct child to a new location. Grid panels only.
    pub fn move_child(&mut self, id: WidgetId, location: Location) -> Result<()> {
        self.require_grid()?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.child.try_id() == Some(id))
            .ok_or(TrellisError::UnknownChild { id })?;
        entry.placement = Placement::At(location);
        Ok(())
    }

    /// Remove all children, releasing their ownership.
    pub fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            match &entry.child {
                Child::Widget(w) => w.borrow_mut().base_mut().set_parent(None),
                Child::Panel(p) => p.borrow_mut().parent = None,
            }
        }
    }

    /// Iterate the direct children in registration order.
    pub fn children(&self) -> impl Iterator<Item = &Child> {
        self.entries.iter().map(|e| &e.child)
    }

    /// The location of a direct child, if it has an explicit one.
    pub fn location_of(&self, id: WidgetId) -> Option<Location> {
        self.entries
            .iter()
            .find(|e| e.child.try_id() == Some(id))
            .and_then(|e| match e.placement {
                Placement::At(loc) => Some(loc),
                Placement::Flow { .. } => None,
            })
    }

    fn require_grid(&self) -> Result<()> {
        match self.strategy {
            Strategy::Grid => Ok(()),
            Strategy::Stack(_) => Err(TrellisError::StrategyMismatch {
                id: self.id,
                strategy: self.strategy.name(),
            }),
        }
    }

    fn require_stack(&self) -> Result<()> {
        match self.strategy {
            Strategy::Stack(_) => Ok(()),
            Strategy::Grid => Err(TrellisError::StrategyMismatch {
                id: self.id,
                strategy: self.strategy.name(),
            }),
        }
    }

    /// Take ownership of a widget, rejecting one that already has a parent.
    fn claim_widget(&self, widget: &SharedWidget) -> Result<()> {
        let mut w = widget.borrow_mut();
        if w.base().parent().is_some() {
            return Err(TrellisError::AlreadyParented { id: w.id() });
        }
        w.base_mut().set_parent(Some(self.id));
        Ok(())
    }

    /// Take ownership of a panel, rejecting re-parenting, self-containment,
    /// and containment cycles. No state changes unless every check passes.
    fn claim_panel(&self, panel: &SharedPanel) -> Result<()> {
        // The only live mutable borrow during an add is the panel the call
        // re-entered from, i.e. an attempted self-add.
        let mut child = panel
            .try_borrow_mut()
            .map_err(|_| TrellisError::SelfParent { id: self.id })?;
        if child.parent.is_some() {
            return Err(TrellisError::AlreadyParented { id: child.id });
        }
        if child.contains_panel(self.id) {
            return Err(TrellisError::AncestorCycle { id: child.id });
        }
        child.parent = Some(self.id);
        Ok(())
    }

    /// Whether the given panel id appears anywhere in this panel's subtree.
    fn contains_panel(&self, id: WidgetId) -> bool {
        self.entries.iter().any(|e| match &e.child {
            Child::Panel(p) => match p.try_borrow() {
                Ok(p) => p.id == id || p.contains_panel(id),
                // The only panel that can be mutably borrowed during an add
                // is the one the call re-entered from, which is exactly the
                // panel being searched for.
                Err(_) => true,
            },
            Child::Widget(_) => false,
        })
    }

    // =========================================================================
    // Coordinate Resolution
    // =========================================================================

    /// Resolve the absolute location of every visible widget reachable
    /// from this panel, in depth-first registration order.
    ///
    /// Hidden widgets and hidden panels contribute nothing. In a stack,
    /// hidden children and nested panels whose derived extent is 0 consume
    /// zero slots, so a hidden branch does not reserve grid space. The
    /// result is recomputed from scratch on every call; nothing is cached.
    pub fn resolve_placements(&self, origin_row: u32, origin_column: u32) -> Vec<Placed> {
        let mut out = Vec::new();
        if self.visible {
            self.resolve_into(origin_row, origin_column, &mut out);
        }
        tracing::trace!(
            target: trellis_core::logging::targets::LAYOUT,
            panel = %self.id,
            placements = out.len(),
            "resolved placements"
        );
        out
    }

    /// Recursive resolution body. The caller has already checked this
    /// panel's visibility.
    fn resolve_into(&self, origin_row: u32, origin_column: u32, out: &mut Vec<Placed>) {
        match self.strategy {
            Strategy::Grid => self.resolve_grid(origin_row, origin_column, out),
            Strategy::Stack(axis) => self.resolve_stack(axis, origin_row, origin_column, out),
        }
    }

    fn resolve_grid(&self, origin_row: u32, origin_column: u32, out: &mut Vec<Placed>) {
        for entry in &self.entries {
            let Placement::At(location) = entry.placement else {
                continue;
            };
            match &entry.child {
                Child::Widget(w) => {
                    if w.borrow().base().is_visible() {
                        out.push(Placed {
                            widget: Rc::clone(w),
                            location: location.translated(origin_row, origin_column),
                        });
                    }
                }
                Child::Panel(p) => {
                    let p = p.borrow();
                    if p.visible {
                        p.resolve_into(
                            origin_row + location.row,
                            origin_column + location.column,
                            out,
                        );
                    }
                }
            }
        }
    }

    fn resolve_stack(
        &self,
        axis: StackAxis,
        origin_row: u32,
        origin_column: u32,
        out: &mut Vec<Placed>,
    ) {
        let mut cursor = 0u32;
        for entry in &self.entries {
            let Placement::Flow { span } = entry.placement else {
                continue;
            };
            match &entry.child {
                Child::Widget(w) => {
                    if !w.borrow().base().is_visible() {
                        continue;
                    }
                    let location = match axis {
                        StackAxis::Vertical => Location {
                            row: origin_row + cursor,
                            column: origin_column,
                            row_span: span,
                            column_span: 1,
                        },
                        StackAxis::Horizontal => Location {
                            row: origin_row,
                            column: origin_column + cursor,
                            row_span: 1,
                            column_span: span,
                        },
                    };
                    out.push(Placed {
                        widget: Rc::clone(w),
                        location,
                    });
                    cursor += span;
                }
                Child::Panel(p) => {
                    let p = p.borrow();
                    if !p.visible {
                        continue;
                    }
                    let extent = match axis {
                        StackAxis::Vertical => p.row_count(),
                        StackAxis::Horizontal => p.column_count(),
                    };
                    // A panel whose derived extent is 0 reserves no slot.
                    if extent == 0 {
                        continue;
                    }
                    let (row, column) = match axis {
                        StackAxis::Vertical => (origin_row + cursor, origin_column),
                        StackAxis::Horizontal => (origin_row, origin_column + cursor),
                    };
                    p.resolve_into(row, column, out);
                    cursor += extent;
                }
            }
        }
    }

    // =========================================================================
    // Derived Extents
    // =========================================================================

    /// Number of rows currently occupied by visible children.
    ///
    /// Derived on demand as `max(row + row_span)` over the panel's own
    /// frame; never stored, so it cannot go stale as children are hidden
    /// and shown between rounds.
    pub fn row_count(&self) -> u32 {
        let mut out = Vec::new();
        self.resolve_into(0, 0, &mut out);
        out.iter().map(|p| p.location.row_end()).max().unwrap_or(0)
    }

    /// Number of columns currently occupied by visible children.
    pub fn column_count(&self) -> u32 {
        let mut out = Vec::new();
        self.resolve_into(0, 0, &mut out);
        out.iter()
            .map(|p| p.location.column_end())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::widgets::Label;
    use crate::widget::{shared, SharedWidget};

    fn label(text: &str) -> SharedWidget {
        shared(Label::new(text))
    }

    fn shared_panel(panel: Panel) -> SharedPanel {
        Rc::new(RefCell::new(panel))
    }

    #[test]
    fn test_grid_translates_by_origin() {
        let mut panel = Panel::grid();
        let w = label("a");
        panel.add_widget_at(w.clone(), Location::new(1, 2)).unwrap();

        let placed = panel.resolve_placements(10, 20);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].location, Location::new(11, 22));
    }

    #[test]
    fn test_hidden_widget_not_resolved() {
        let mut panel = Panel::grid();
        let w = label("a");
        panel.add_widget_at(w.clone(), Location::new(0, 0)).unwrap();
        w.borrow_mut().base_mut().set_visible(false);

        assert!(panel.resolve_placements(0, 0).is_empty());
        assert_eq!(panel.row_count(), 0);
    }

    #[test]
    fn test_hidden_panel_contributes_nothing() {
        let mut outer = Panel::grid();
        let inner = shared_panel(Panel::grid());
        inner
            .borrow_mut()
            .add_widget_at(label("a"), Location::new(0, 0))
            .unwrap();
        outer.add_panel_at(inner.clone(), Location::new(0, 0)).unwrap();

        assert_eq!(outer.resolve_placements(0, 0).len(), 1);
        inner.borrow_mut().set_visible(false);
        assert!(outer.resolve_placements(0, 0).is_empty());
    }

    #[test]
    fn test_nested_grid_offsets_accumulate() {
        let mut outer = Panel::grid();
        let mid = shared_panel(Panel::grid());
        let inner = shared_panel(Panel::grid());
        inner
            .borrow_mut()
            .add_widget_at(label("deep"), Location::new(1, 1))
            .unwrap();
        mid.borrow_mut()
            .add_panel_at(inner, Location::new(2, 0))
            .unwrap();
        outer.add_panel_at(mid, Location::new(3, 4)).unwrap();

        let placed = outer.resolve_placements(0, 0);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].location, Location::new(6, 5));
    }

    #[test]
    fn test_vertical_stack_skips_hidden_and_spans() {
        // W1 visible span 1, W2 hidden, W3 visible span 2:
        // W1 -> row 0, W3 -> rows 1..2, row count 3.
        let mut stack = Panel::stack_vertical();
        let w1 = label("w1");
        let w2 = label("w2");
        let w3 = label("w3");
        stack.add_widget(w1.clone()).unwrap();
        stack.add_widget(w2.clone()).unwrap();
        stack.add_widget_span(w3.clone(), 2).unwrap();
        w2.borrow_mut().base_mut().set_visible(false);

        let placed = stack.resolve_placements(0, 0);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].location, Location::new(0, 0));
        assert_eq!(placed[1].location, Location::spanning(1, 0, 2, 1));
        assert_eq!(stack.row_count(), 3);

        // Showing W2 again re-flows on the next resolution call.
        w2.borrow_mut().base_mut().set_visible(true);
        let placed = stack.resolve_placements(0, 0);
        assert_eq!(placed[1].location, Location::new(1, 0));
        assert_eq!(placed[2].location, Location::spanning(2, 0, 2, 1));
        assert_eq!(stack.row_count(), 4);
    }

    #[test]
    fn test_horizontal_stack_flows_columns() {
        let mut stack = Panel::stack_horizontal();
        stack.add_widget(label("a")).unwrap();
        stack.add_widget_span(label("b"), 3).unwrap();

        let placed = stack.resolve_placements(0, 0);
        assert_eq!(placed[0].location, Location::new(0, 0));
        assert_eq!(placed[1].location, Location::spanning(0, 1, 1, 3));
        assert_eq!(stack.column_count(), 4);
        assert_eq!(stack.row_count(), 1);
    }

    #[test]
    fn test_stack_nested_panel_occupies_derived_extent() {
        let mut stack = Panel::stack_vertical();
        let inner = shared_panel(Panel::grid());
        inner
            .borrow_mut()
            .add_widget_at(label("a"), Location::spanning(0, 0, 2, 1))
            .unwrap();
        let after = label("after");
        stack.add_panel(inner.clone()).unwrap();
        stack.add_widget(after.clone()).unwrap();

        let placed = stack.resolve_placements(0, 0);
        // Inner panel occupies rows 0..1, "after" lands on row 2.
        assert_eq!(placed[0].location, Location::spanning(0, 0, 2, 1));
        assert_eq!(placed[1].location, Location::new(2, 0));
    }

    #[test]
    fn test_stack_skips_zero_extent_panel() {
        let mut stack = Panel::stack_vertical();
        let empty = shared_panel(Panel::grid());
        let after = label("after");
        stack.add_panel(empty).unwrap();
        stack.add_widget(after).unwrap();

        let placed = stack.resolve_placements(0, 0);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].location, Location::new(0, 0));
    }

    #[test]
    fn test_stack_skips_panel_with_only_hidden_children() {
        let mut stack = Panel::stack_vertical();
        let inner = shared_panel(Panel::grid());
        let hidden = label("hidden");
        inner
            .borrow_mut()
            .add_widget_at(hidden.clone(), Location::new(0, 0))
            .unwrap();
        hidden.borrow_mut().base_mut().set_visible(false);
        stack.add_panel(inner).unwrap();
        let after = label("after");
        stack.add_widget(after).unwrap();

        // The nested panel's derived extent is 0 once its only child is
        // hidden, so it reserves no slot.
        let placed = stack.resolve_placements(0, 0);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].location, Location::new(0, 0));
        assert_eq!(stack.row_count(), 1);
    }

    #[test]
    fn test_reparenting_fails() {
        let mut a = Panel::grid();
        let mut b = Panel::grid();
        let w = label("w");
        a.add_widget_at(w.clone(), Location::new(0, 0)).unwrap();

        let err = b.add_widget_at(w.clone(), Location::new(0, 0)).unwrap_err();
        assert!(matches!(err, TrellisError::AlreadyParented { .. }));
        // No partial mutation: b is still empty, w still belongs to a.
        assert!(b.is_empty());
        assert_eq!(w.borrow().base().parent(), Some(a.id()));
    }

    #[test]
    fn test_self_containment_fails() {
        let panel = shared_panel(Panel::grid());
        let result = {
            let mut p = panel.borrow_mut();
            let clone = panel.clone();
            p.add_panel_at(clone, Location::new(0, 0))
        };
        assert!(matches!(result, Err(TrellisError::SelfParent { .. })));
        assert!(panel.borrow().is_empty());
    }

    #[test]
    fn test_ancestor_cycle_fails() {
        let outer = shared_panel(Panel::grid());
        let inner = shared_panel(Panel::grid());
        outer
            .borrow_mut()
            .add_panel_at(inner.clone(), Location::new(0, 0))
            .unwrap();

        // inner -> outer would make outer contain itself transitively.
        let result = inner
            .borrow_mut()
            .add_panel_at(outer.clone(), Location::new(1, 0));
        assert!(matches!(result, Err(TrellisError::AncestorCycle { .. })));
        assert!(inner.borrow().is_empty());
        assert_eq!(outer.borrow().parent(), None);
    }

    #[test]
    fn test_deep_ancestor_cycle_fails() {
        let outer = shared_panel(Panel::grid());
        let mid = shared_panel(Panel::grid());
        let inner = shared_panel(Panel::grid());
        outer
            .borrow_mut()
            .add_panel_at(mid.clone(), Location::new(0, 0))
            .unwrap();
        mid.borrow_mut()
            .add_panel_at(inner.clone(), Location::new(0, 0))
            .unwrap();

        // inner is two levels down; the cycle walk has to recurse through
        // mid to find it.
        let result = inner
            .borrow_mut()
            .add_panel_at(outer.clone(), Location::new(1, 0));
        assert!(matches!(result, Err(TrellisError::AncestorCycle { .. })));
        assert!(inner.borrow().is_empty());
        assert_eq!(outer.borrow().parent(), None);
    }

    #[test]
    fn test_placed_debug_names_widget_and_location() {
        let mut panel = Panel::grid();
        panel
            .add_widget_at(label("x"), Location::new(1, 2))
            .unwrap();

        let placed = panel.resolve_placements(0, 0);
        let text = format!("{:?}", placed[0]);
        assert!(text.starts_with("Placed(label"), "{text}");
        assert!(text.ends_with("(1,2 1x1))"), "{text}");
    }

    #[test]
    fn test_remove_child_releases_ownership() {
        let mut a = Panel::grid();
        let mut b = Panel::grid();
        let w = label("w");
        let id = w.borrow().id();
        a.add_widget_at(w.clone(), Location::new(0, 0)).unwrap();

        a.remove_child(id).unwrap();
        assert_eq!(w.borrow().base().parent(), None);

        // The widget can be adopted again after removal.
        b.add_widget_at(w.clone(), Location::new(0, 0)).unwrap();
        assert_eq!(w.borrow().base().parent(), Some(b.id()));
    }

    #[test]
    fn test_move_child_updates_location() {
        let mut panel = Panel::grid();
        let w = label("w");
        let id = w.borrow().id();
        panel.add_widget_at(w, Location::new(0, 0)).unwrap();

        panel.move_child(id, Location::new(4, 2)).unwrap();
        assert_eq!(panel.location_of(id), Some(Location::new(4, 2)));
        assert_eq!(
            panel.resolve_placements(0, 0)[0].location,
            Location::new(4, 2)
        );
    }

    #[test]
    fn test_strategy_mismatch() {
        let mut grid = Panel::grid();
        let mut stack = Panel::stack_vertical();

        let err = grid.add_widget(label("a")).unwrap_err();
        assert!(matches!(err, TrellisError::StrategyMismatch { .. }));

        let err = stack
            .add_widget_at(label("b"), Location::new(0, 0))
            .unwrap_err();
        assert!(matches!(err, TrellisError::StrategyMismatch { .. }));
    }

    #[test]
    fn test_grid_accepts_colliding_locations_at_add_time() {
        let mut panel = Panel::grid();
        panel.add_widget_at(label("a"), Location::new(0, 0)).unwrap();
        // Same cell: accepted here, only a submission-time error when both
        // are visible.
        panel.add_widget_at(label("b"), Location::new(0, 0)).unwrap();
        assert_eq!(panel.child_count(), 2);
    }

    #[test]
    fn test_depth_first_registration_order() {
        let mut outer = Panel::grid();
        let first = label("first");
        let inner = shared_panel(Panel::grid());
        inner
            .borrow_mut()
            .add_widget_at(label("nested"), Location::new(0, 0))
            .unwrap();
        let last = label("last");

        outer.add_widget_at(first.clone(), Location::new(0, 0)).unwrap();
        outer.add_panel_at(inner, Location::new(1, 0)).unwrap();
        outer.add_widget_at(last.clone(), Location::new(2, 0)).unwrap();

        let placed = outer.resolve_placements(0, 0);
        let ids: Vec<_> = placed.iter().map(|p| p.widget.borrow().id()).collect();
        assert_eq!(ids[0], first.borrow().id());
        assert_eq!(ids[2], last.borrow().id());
    }
}
