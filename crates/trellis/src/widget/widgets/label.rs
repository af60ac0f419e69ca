//! Static text label.

use std::any::Any;

use serde_json::{json, Value};

use crate::widget::{Widget, WidgetBase};

/// A non-interactive piece of text.
///
/// Labels are positioned and validated like any other widget but never
/// receive values from the host.
#[derive(Debug)]
pub struct Label {
    base: WidgetBase,
    text: String,
}

impl Label {
    /// Create a label with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(),
            text: text.into(),
        }
    }

    /// The label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the label text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Widget for Label {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "label"
    }

    fn properties(&self) -> Value {
        json!({ "text": self.text })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
