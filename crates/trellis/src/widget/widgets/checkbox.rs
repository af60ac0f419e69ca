//! Checkbox widget.

use std::any::Any;
use std::cell::Cell;

use serde_json::{json, Value};
use trellis_core::Signal;

use crate::protocol::ResultPayload;
use crate::widget::{Interactive, Widget, WidgetBase};

/// A two-state checkbox.
///
/// # Signals
///
/// - `toggled(bool)`: emitted during phase 2 when the host reported a
///   state different from the cached one
pub struct Checkbox {
    base: WidgetBase,
    label: String,
    checked: bool,
    /// Pending change staged by phase 1 for phase 2.
    pending: Cell<Option<bool>>,
    /// Emitted when the checked state changed in a round.
    pub toggled: Signal<bool>,
}

impl Checkbox {
    /// Create an unchecked checkbox with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(),
            label: label.into(),
            checked: false,
            pending: Cell::new(None),
            toggled: Signal::new(),
        }
    }

    /// Set the initial checked state using builder pattern.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// The checkbox label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the checkbox is checked.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Set the checked state programmatically. Emits `toggled` immediately
    /// on change; host-driven changes go through the two-phase protocol
    /// instead.
    pub fn set_checked(&mut self, checked: bool) {
        if self.checked != checked {
            self.checked = checked;
            self.toggled.emit(checked);
        }
    }
}

impl Widget for Checkbox {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "checkbox"
    }

    fn properties(&self) -> Value {
        json!({ "label": self.label, "checked": self.checked })
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

impl Interactive for Checkbox {
    fn wants_notify(&self) -> bool {
        self.toggled.connection_count() > 0
    }

    fn apply_result(&mut self, payload: &ResultPayload) {
        let Some(checked) = payload.value_of(self.base.id()).and_then(Value::as_bool) else {
            return;
        };
        let changed = checked != self.checked;
        // The cached value is always updated, wanted or not.
        self.checked = checked;
        if changed && self.wants_notify() {
            self.pending.set(Some(checked));
        }
    }

    fn has_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    fn raise_pending(&self) {
        if let Some(checked) = self.pending.take() {
            self.toggled.emit(checked);
        }
    }

    fn discard_pending(&self) {
        self.pending.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_value_updates_without_subscriber() {
        let mut cb = Checkbox::new("flag");
        let mut payload = ResultPayload::new();
        payload.set_value(cb.id(), json!(true));

        cb.apply_result(&payload);
        assert!(cb.is_checked());
        assert!(!cb.has_pending());
    }

    #[test]
    fn test_unchanged_value_stages_nothing() {
        let mut cb = Checkbox::new("flag").with_checked(true);
        cb.toggled.connect(|_| {});

        let mut payload = ResultPayload::new();
        payload.set_value(cb.id(), json!(true));
        cb.apply_result(&payload);
        assert!(!cb.has_pending());
    }

    #[test]
    fn test_change_round_trip() {
        let mut cb = Checkbox::new("flag");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        cb.toggled.connect(move |&v| seen_clone.borrow_mut().push(v));

        let mut payload = ResultPayload::new();
        payload.set_value(cb.id(), json!(true));
        cb.apply_result(&payload);
        assert!(cb.has_pending());

        cb.raise_pending();
        assert_eq!(*seen.borrow(), vec![true]);
        // Exactly once.
        cb.raise_pending();
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn test_missing_payload_value_is_ignored() {
        let mut cb = Checkbox::new("flag").with_checked(true);
        cb.apply_result(&ResultPayload::new());
        assert!(cb.is_checked());
    }

    #[test]
    fn test_wants_notify_tracks_subscribers() {
        let cb = Checkbox::new("flag");
        assert!(!cb.wants_notify());

        let first = cb.toggled.connect(|_| {});
        assert!(cb.wants_notify());
        let second = cb.toggled.connect(|_| {});

        cb.toggled.disconnect(first);
        assert!(cb.wants_notify());
        // Flips the instant the last subscriber goes away.
        cb.toggled.disconnect(second);
        assert!(!cb.wants_notify());
    }

    #[test]
    fn test_programmatic_set_emits_immediately() {
        let mut cb = Checkbox::new("flag");
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        cb.toggled.connect(move |_| count_clone.set(count_clone.get() + 1));

        cb.set_checked(true);
        cb.set_checked(true); // No change, no signal.
        assert_eq!(count.get(), 1);
    }
}
