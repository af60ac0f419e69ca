//! Push button.

use std::any::Any;
use std::cell::Cell;

use serde_json::{json, Value};
use trellis_core::Signal;

use crate::protocol::ResultPayload;
use crate::widget::{Interactive, Widget, WidgetBase};

/// A push button.
///
/// The host reports `true` under the button's id when the button was the
/// control that triggered the submission. There is no cached previous
/// value: every reported press is a change.
///
/// # Signals
///
/// - `clicked(())`: emitted during phase 2 when this button triggered the
///   round
pub struct Button {
    base: WidgetBase,
    label: String,
    /// Pending press staged by phase 1 for phase 2.
    pending: Cell<bool>,
    /// Emitted when this button triggered the submission.
    pub clicked: Signal<()>,
}

impl Button {
    /// Create a button with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(),
            label: label.into(),
            pending: Cell::new(false),
            clicked: Signal::new(),
        }
    }

    /// The button label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the button label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

impl Widget for Button {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "button"
    }

    fn properties(&self) -> Value {
        json!({ "label": self.label })
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

impl Interactive for Button {
    fn wants_notify(&self) -> bool {
        self.clicked.connection_count() > 0
    }

    fn apply_result(&mut self, payload: &ResultPayload) {
        let pressed = payload
            .value_of(self.base.id())
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if pressed && self.wants_notify() {
            self.pending.set(true);
        }
    }

    fn has_pending(&self) -> bool {
        self.pending.get()
    }

    fn raise_pending(&self) {
        if self.pending.take() {
            self.clicked.emit(());
        }
    }

    fn discard_pending(&self) {
        self.pending.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_press_stages_pending_only_with_subscriber() {
        let mut button = Button::new("OK");
        let mut payload = ResultPayload::new();
        payload.set_value(button.id(), json!(true));

        // No subscriber: nothing staged.
        button.apply_result(&payload);
        assert!(!button.has_pending());

        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        button.clicked.connect(move |_| {
            clicks_clone.set(clicks_clone.get() + 1);
        });

        button.apply_result(&payload);
        assert!(button.has_pending());
        button.raise_pending();
        assert_eq!(clicks.get(), 1);
        assert!(!button.has_pending());
    }

    #[test]
    fn test_unpressed_button_stays_quiet() {
        let mut button = Button::new("OK");
        button.clicked.connect(|_| panic!("must not fire"));

        let mut payload = ResultPayload::new();
        payload.set_value(button.id(), json!(false));
        button.apply_result(&payload);
        assert!(!button.has_pending());
        button.raise_pending();
    }

    #[test]
    fn test_discard_clears_pending() {
        let mut button = Button::new("OK");
        button.clicked.connect(|_| panic!("must not fire"));

        let mut payload = ResultPayload::new();
        payload.set_value(button.id(), json!(true));
        button.apply_result(&payload);
        assert!(button.has_pending());

        button.discard_pending();
        assert!(!button.has_pending());
        button.raise_pending();
    }
}
