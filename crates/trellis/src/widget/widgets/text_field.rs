//! Single-line text input widget.

use std::any::Any;
use std::cell::RefCell;

use serde_json::{json, Value};
use trellis_core::Signal;

use crate::protocol::ResultPayload;
use crate::widget::{Interactive, Widget, WidgetBase};

/// A single-line text input.
///
/// String values compare by exact equality; the host reports the full
/// current text, not a diff.
pub struct TextField {
    base: WidgetBase,
    text: String,
    placeholder: String,
    /// Pending change staged by phase 1 for phase 2.
    pending: RefCell<Option<String>>,
    /// Emitted when the text changed in a round.
    pub changed: Signal<String>,
}

impl TextField {
    /// Create an empty text field.
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            text: String::new(),
            placeholder: String::new(),
            pending: RefCell::new(None),
            changed: Signal::new(),
        }
    }

    /// Set the initial text using builder pattern.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the placeholder shown while the field is empty.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// The current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set the text programmatically. Emits `changed` immediately on change.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text.clone();
            self.changed.emit(text);
        }
    }

    /// The placeholder text.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for TextField {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "text-field"
    }

    fn properties(&self) -> Value {
        json!({ "text": self.text, "placeholder": self.placeholder })
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

impl Interactive for TextField {
    fn wants_notify(&self) -> bool {
        self.changed.connection_count() > 0
    }

    fn apply_result(&mut self, payload: &ResultPayload) {
        let Some(text) = payload.value_of(self.base.id()).and_then(Value::as_str) else {
            return;
        };
        let changed = text != self.text;
        self.text = text.to_owned();
        if changed && self.wants_notify() {
            *self.pending.borrow_mut() = Some(self.text.clone());
        }
    }

    fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    fn raise_pending(&self) {
        let staged = self.pending.borrow_mut().take();
        if let Some(text) = staged {
            self.changed.emit(text);
        }
    }

    fn discard_pending(&self) {
        self.pending.borrow_mut().take();
    }
}
