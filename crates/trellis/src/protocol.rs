//! The wire boundary to the rendering host.
//!
//! The host is an opaque black box: it accepts a serialized grid
//! description ([`RenderRequest`]) and, after one user interaction, returns
//! a flat [`ResultPayload`] keyed by each interactive widget's opaque id.
//! Everything here is plain serde data; this module never interprets widget
//! values.
//!
//! # Example
//!
//! ```ignore
//! use trellis::protocol::{RenderHost, RenderRequest, ResultPayload};
//!
//! struct StdioHost;
//!
//! impl RenderHost for StdioHost {
//!     fn submit(
//!         &mut self,
//!         request: &RenderRequest,
//!         await_response: bool,
//!     ) -> Result<Option<ResultPayload>, trellis::HostError> {
//!         let json = serde_json::to_string(request).unwrap();
//!         // ... hand `json` to the renderer, read the reply ...
//!         # unimplemented!()
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_core::WidgetId;

use crate::error::HostError;
use crate::geometry::{Bounds, HorizontalAlign, Margins, VerticalAlign};

/// A complete dialog description, ready for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Dialog title.
    pub title: String,
    /// Dialog width bounds.
    pub width: Bounds,
    /// Dialog height bounds.
    pub height: Bounds,
    /// One size string per derived row ("auto", "stretch", or a number).
    pub rows: Vec<String>,
    /// One size string per derived column.
    pub columns: Vec<String>,
    /// Every visible widget, annotated with its resolved placement.
    pub widgets: Vec<WidgetDescription>,
}

/// One widget's rendering description with its resolved absolute placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescription {
    /// The widget's opaque id; the result payload is keyed by this.
    pub id: String,
    /// Widget type tag, e.g. `"checkbox"` or `"text-field"`.
    pub kind: String,
    /// Resolved absolute row.
    pub row: u32,
    /// Resolved absolute column.
    pub column: u32,
    /// Rows occupied.
    pub row_span: u32,
    /// Columns occupied.
    pub column_span: u32,
    /// Horizontal alignment within the cell.
    pub h_align: HorizontalAlign,
    /// Vertical alignment within the cell.
    pub v_align: VerticalAlign,
    /// Margins around the widget.
    pub margins: Margins,
    /// Whether the widget accepts input.
    pub enabled: bool,
    /// Whether any notification handler is subscribed to the widget. Hosts
    /// may skip reporting values for widgets nobody listens to.
    #[serde(default)]
    pub wants_notify: bool,
    /// Widget-specific properties (current value, label, entries, ...).
    pub properties: Value,
}

/// The flat result payload returned by the host after a user interaction.
///
/// Values are addressed by widget id string. Tree widgets receive an object
/// `{ "checked": [...], "expanded": [...] }` under their id; scalar widgets
/// receive their value directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    /// Per-widget values, keyed by the widget's id string.
    #[serde(default)]
    pub values: HashMap<String, Value>,
    /// Whether "navigate back" triggered the submission.
    #[serde(default)]
    pub back_pressed: bool,
    /// Whether "navigate forward" triggered the submission.
    #[serde(default)]
    pub forward_pressed: bool,
}

impl ResultPayload {
    /// An empty payload with no values and no navigation flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the value reported for a widget.
    pub fn value_of(&self, id: WidgetId) -> Option<&Value> {
        self.values.get(&id.to_string())
    }

    /// Record a value for a widget. Host-side helper.
    pub fn set_value(&mut self, id: WidgetId, value: Value) {
        self.values.insert(id.to_string(), value);
    }

    /// Mark the payload as a "navigate back" submission. Host-side helper.
    pub fn with_back_pressed(mut self) -> Self {
        self.back_pressed = true;
        self
    }

    /// Mark the payload as a "navigate forward" submission. Host-side helper.
    pub fn with_forward_pressed(mut self) -> Self {
        self.forward_pressed = true;
        self
    }
}

/// The rendering host boundary.
///
/// One call per submission round. The call blocks until the host is done;
/// Trellis never retries; callers needing retry semantics layer it outside
/// the engine.
pub trait RenderHost {
    /// Present the request.
    ///
    /// With `await_response` the host must block for one user interaction
    /// and return the payload. Without it the host just renders (static /
    /// progress display) and returns `Ok(None)`.
    fn submit(
        &mut self,
        request: &RenderRequest,
        await_response: bool,
    ) -> std::result::Result<Option<ResultPayload>, HostError>;
}

// Wire types cross the host boundary; keep them thread-portable plain data.
static_assertions::assert_impl_all!(RenderRequest: Send, Sync);
static_assertions::assert_impl_all!(ResultPayload: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_value_lookup() {
        let id = WidgetId::next();
        let mut payload = ResultPayload::new();
        payload.set_value(id, json!("hello"));

        assert_eq!(payload.value_of(id), Some(&json!("hello")));
        assert_eq!(payload.value_of(WidgetId::next()), None);
    }

    #[test]
    fn test_payload_navigation_flags() {
        let payload = ResultPayload::new().with_back_pressed();
        assert!(payload.back_pressed);
        assert!(!payload.forward_pressed);
    }

    #[test]
    fn test_request_round_trips_through_json() {
        let request = RenderRequest {
            title: "Test".into(),
            width: Bounds::unbounded(),
            height: Bounds::fixed(400).unwrap(),
            rows: vec!["auto".into(), "stretch".into()],
            columns: vec!["120".into()],
            widgets: vec![WidgetDescription {
                id: "w1".into(),
                kind: "label".into(),
                row: 0,
                column: 0,
                row_span: 1,
                column_span: 1,
                h_align: HorizontalAlign::Left,
                v_align: VerticalAlign::default(),
                margins: Margins::uniform(2),
                enabled: true,
                wants_notify: false,
                properties: json!({ "text": "hi" }),
            }],
        };

        let text = serde_json::to_string(&request).unwrap();
        let back: RenderRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_payload_tolerates_missing_fields() {
        let payload: ResultPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.values.is_empty());
        assert!(!payload.back_pressed);
    }
}
