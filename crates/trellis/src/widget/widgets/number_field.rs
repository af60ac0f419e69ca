//! Numeric input widget.

use std::any::Any;
use std::cell::Cell;

use serde_json::{json, Value};
use trellis_core::Signal;

use crate::error::{Result, TrellisError};
use crate::protocol::ResultPayload;
use crate::widget::{Interactive, Widget, WidgetBase};

/// A numeric input field.
///
/// Values compare within a decimal-places tolerance rather than by `==`:
/// with two decimal places, `1.230` and `1.2301` are the same value. The
/// wire format is a culture-invariant decimal string rounded to the
/// configured number of places.
pub struct NumberField {
    base: WidgetBase,
    value: f64,
    decimal_places: u8,
    min: Option<f64>,
    max: Option<f64>,
    /// Pending change staged by phase 1 for phase 2.
    pending: Cell<Option<f64>>,
    /// Emitted when the value changed in a round.
    pub changed: Signal<f64>,
}

impl NumberField {
    /// Create a field holding `0.0` with two decimal places.
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            value: 0.0,
            decimal_places: 2,
            min: None,
            max: None,
            pending: Cell::new(None),
            changed: Signal::new(),
        }
    }

    /// Set the initial value using builder pattern.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Set the number of decimal places using builder pattern.
    pub fn with_decimal_places(mut self, places: u8) -> Self {
        self.decimal_places = places;
        self
    }

    /// The current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value programmatically. Rejects non-finite values; emits
    /// `changed` immediately when the value differs within tolerance.
    pub fn set_value(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(TrellisError::NotFinite { name: "value", value });
        }
        if self.differs(value) {
            self.value = value;
            self.changed.emit(value);
        } else {
            self.value = value;
        }
        Ok(())
    }

    /// The configured number of decimal places.
    pub fn decimal_places(&self) -> u8 {
        self.decimal_places
    }

    /// Set the number of decimal places used for formatting and equality.
    pub fn set_decimal_places(&mut self, places: u8) {
        self.decimal_places = places;
    }

    /// The allowed range as reported to the host.
    pub fn range(&self) -> (Option<f64>, Option<f64>) {
        (self.min, self.max)
    }

    /// Set the allowed range. Rejects non-finite bounds and min > max.
    pub fn set_range(&mut self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        if let Some(min) = min {
            if !min.is_finite() {
                return Err(TrellisError::NotFinite { name: "min", value: min });
            }
        }
        if let Some(max) = max {
            if !max.is_finite() {
                return Err(TrellisError::NotFinite { name: "max", value: max });
            }
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(TrellisError::InvalidValueRange {
                    name: "value range",
                    min: lo,
                    max: hi,
                });
            }
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    /// The value formatted for the wire: invariant decimal notation rounded
    /// to the configured places.
    pub fn wire_text(&self) -> String {
        format!("{:.*}", self.decimal_places as usize, self.value)
    }

    /// Whether `candidate` differs from the cached value by at least half a
    /// unit in the last configured decimal place.
    fn differs(&self, candidate: f64) -> bool {
        let tolerance = 10f64.powi(-(self.decimal_places as i32)) / 2.0;
        (candidate - self.value).abs() >= tolerance
    }
}

impl Default for NumberField {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for NumberField {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "number-field"
    }

    fn properties(&self) -> Value {
        json!({
            "value": self.wire_text(),
            "decimal_places": self.decimal_places,
            "min": self.min,
            "max": self.max,
        })
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

impl Interactive for NumberField {
    fn wants_notify(&self) -> bool {
        self.changed.connection_count() > 0
    }

    fn apply_result(&mut self, payload: &ResultPayload) {
        // Hosts report either a decimal string or a bare number.
        let value = match payload.value_of(self.base.id()) {
            Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
            Some(value) => value.as_f64(),
            None => None,
        };
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return;
        };
        let changed = self.differs(value);
        self.value = value;
        if changed && self.wants_notify() {
            self.pending.set(Some(value));
        }
    }

    fn has_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    fn raise_pending(&self) {
        if let Some(value) = self.pending.take() {
            self.changed.emit(value);
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

    fn payload_with(field: &NumberField, value: Value) -> ResultPayload {
        let mut payload = ResultPayload::new();
        payload.set_value(field.id(), value);
        payload
    }

    #[test]
    fn test_within_tolerance_is_quiet() {
        let mut field = NumberField::new().with_value(1.23).with_decimal_places(2);
        field.changed.connect(|_| {});

        field.apply_result(&payload_with(&field, json!("1.2301")));
        assert!(!field.has_pending());
    }

    #[test]
    fn test_beyond_tolerance_stages() {
        let mut field = NumberField::new().with_value(1.23).with_decimal_places(2);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        field.changed.connect(move |&v| seen_clone.borrow_mut().push(v));

        field.apply_result(&payload_with(&field, json!("1.24")));
        field.raise_pending();
        assert_eq!(*seen.borrow(), vec![1.24]);
    }

    #[test]
    fn test_accepts_bare_numbers() {
        let mut field = NumberField::new();
        field.apply_result(&payload_with(&field, json!(42.5)));
        assert_eq!(field.value(), 42.5);
    }

    #[test]
    fn test_rejects_unparseable_and_non_finite() {
        let mut field = NumberField::new().with_value(7.0);
        field.apply_result(&payload_with(&field, json!("not a number")));
        assert_eq!(field.value(), 7.0);

        assert!(field.set_value(f64::NAN).is_err());
        assert_eq!(field.value(), 7.0);
    }

    #[test]
    fn test_wire_text_rounds_to_places() {
        let field = NumberField::new().with_value(3.14159).with_decimal_places(3);
        assert_eq!(field.wire_text(), "3.142");
    }

    #[test]
    fn test_range_validation() {
        let mut field = NumberField::new();
        assert!(field.set_range(Some(10.0), Some(1.0)).is_err());
        assert!(field.set_range(Some(1.0), Some(10.0)).is_ok());
        assert_eq!(field.range(), (Some(1.0), Some(10.0)));
    }
}
