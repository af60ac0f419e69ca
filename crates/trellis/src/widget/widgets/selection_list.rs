//! Multi-selection list widget.

use std::any::Any;
use std::cell::RefCell;

use serde_json::{json, Value};
use trellis_core::Signal;

use crate::protocol::ResultPayload;
use crate::widget::{Interactive, Widget, WidgetBase};

/// One selectable entry in a [`SelectionList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Stable key reported over the wire.
    pub key: String,
    /// Text shown to the user.
    pub text: String,
}

impl ListEntry {
    /// Create an entry.
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// An ordered list with multi-selection.
///
/// The host reports the full set of selected keys after each round; the
/// selection compares as an ordered list of keys.
pub struct SelectionList {
    base: WidgetBase,
    entries: Vec<ListEntry>,
    selected: Vec<String>,
    /// Pending change staged by phase 1 for phase 2.
    pending: RefCell<Option<Vec<String>>>,
    /// Emitted when the selected key set changed in a round.
    pub selection_changed: Signal<Vec<String>>,
}

impl SelectionList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            entries: Vec::new(),
            selected: Vec::new(),
            pending: RefCell::new(None),
            selection_changed: Signal::new(),
        }
    }

    /// Set the entries using builder pattern.
    pub fn with_entries(mut self, entries: Vec<ListEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Append an entry.
    pub fn add_entry(&mut self, entry: ListEntry) {
        self.entries.push(entry);
    }

    /// The entries, in display order.
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// The selected keys, in wire order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Set the selection programmatically. Unknown keys are dropped; emits
    /// `selection_changed` immediately on change.
    pub fn set_selected(&mut self, keys: Vec<String>) {
        let keys: Vec<String> = keys
            .into_iter()
            .filter(|key| self.entries.iter().any(|entry| entry.key == *key))
            .collect();
        if self.selected != keys {
            self.selected = keys.clone();
            self.selection_changed.emit(keys);
        }
    }
}

impl Default for SelectionList {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for SelectionList {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "selection-list"
    }

    fn properties(&self) -> Value {
        let entries: Vec<Value> = self
            .entries
            .iter()
            .map(|entry| json!({ "key": entry.key, "text": entry.text }))
            .collect();
        json!({ "entries": entries, "selected": self.selected })
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

impl Interactive for SelectionList {
    fn wants_notify(&self) -> bool {
        self.selection_changed.connection_count() > 0
    }

    fn apply_result(&mut self, payload: &ResultPayload) {
        let Some(keys) = payload.value_of(self.base.id()).and_then(Value::as_array) else {
            return;
        };
        let keys: Vec<String> = keys
            .iter()
            .filter_map(|key| key.as_str().map(str::to_owned))
            .collect();
        let changed = keys != self.selected;
        self.selected = keys;
        if changed && self.wants_notify() {
            *self.pending.borrow_mut() = Some(self.selected.clone());
        }
    }

    fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    fn raise_pending(&self) {
        let staged = self.pending.borrow_mut().take();
        if let Some(keys) = staged {
            self.selection_changed.emit(keys);
        }
    }

    fn discard_pending(&self) {
        self.pending.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn sample_list() -> SelectionList {
        SelectionList::new().with_entries(vec![
            ListEntry::new("a", "Alpha"),
            ListEntry::new("b", "Beta"),
            ListEntry::new("c", "Gamma"),
        ])
    }

    #[test]
    fn test_selection_change_round_trip() {
        let mut list = sample_list();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        list.selection_changed
            .connect(move |keys: &Vec<String>| seen_clone.borrow_mut().push(keys.clone()));

        let mut payload = ResultPayload::new();
        payload.set_value(list.id(), json!(["a", "c"]));
        list.apply_result(&payload);

        assert_eq!(list.selected(), ["a".to_string(), "c".to_string()]);
        list.raise_pending();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0], vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_same_selection_is_quiet() {
        let mut list = sample_list();
        list.set_selected(vec!["b".into()]);
        list.selection_changed.connect(|_| {});

        let mut payload = ResultPayload::new();
        payload.set_value(list.id(), json!(["b"]));
        list.apply_result(&payload);
        assert!(!list.has_pending());
    }

    #[test]
    fn test_programmatic_selection_drops_unknown_keys() {
        let mut list = sample_list();
        list.set_selected(vec!["a".into(), "zzz".into()]);
        assert_eq!(list.selected(), ["a".to_string()]);
    }
}
