//! Message-channel contract between the UI context and the host context.
//!
//! Payloads travel as JSON. Decoding is deliberately lenient: each layout
//! item is decoded on its own so one malformed entry never poisons the rest
//! of a snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::WindowKey;

// =============================================================================
// CHANNEL NAMES
// =============================================================================

/// UI -> host: full layout snapshot for the sender's window.
pub const APPLY_SNAPSHOT: &str = "apply-snapshot";
/// UI -> host: reload one surface in the sender's window.
pub const RELOAD: &str = "reload";
/// UI -> host: fan-out text injection into surfaces.
pub const FILL_INPUTS: &str = "fill-inputs";
/// Surface -> host: horizontal wheel gesture the page could not consume.
pub const WHEEL: &str = "wheel";
/// Host -> UI: scroll the panel container horizontally.
pub const SCROLL_X: &str = "scroll-x";

// =============================================================================
// GEOMETRY
// =============================================================================

/// Rectangle as reported by the UI context, in its own coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Integer pixel rectangle. Position is rounded but never clamped,
    /// size is rounded and floored at zero.
    pub fn to_pixels(&self) -> PixelBounds {
        PixelBounds {
            x: js_round(self.x) as i32,
            y: js_round(self.y) as i32,
            width: js_round(self.width).max(0.0) as u32,
            height: js_round(self.height).max(0.0) as u32,
        }
    }
}

/// Rectangle actually applied to a surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Round half toward positive infinity, matching `Math.round` in the UI context.
pub fn js_round(value: f64) -> f64 {
    // `f64::round` breaks ties away from zero; pull negative ties back up.
    let rounded = value.round();
    if rounded - value == -0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// One panel slot in a layout snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub id: String,
    #[serde(default)]
    pub url: String,
    pub bounds: Bounds,
}

/// Result of decoding one element of a snapshot array.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotEntry {
    Item(LayoutItem),
    /// Carried a string id but the rest could not be used. The id still
    /// counts as present so its surface is kept.
    Malformed { id: String },
}

/// A decoded snapshot plus the number of elements dropped for lacking an id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedSnapshot {
    pub entries: Vec<SnapshotEntry>,
    pub dropped: usize,
}

/// Decode a raw snapshot payload. Returns `None` when the payload is not an array.
pub fn decode_snapshot(value: &Value) -> Option<DecodedSnapshot> {
    let array = value.as_array()?;
    let mut decoded = DecodedSnapshot::default();

    for element in array {
        let Some(id) = element.get("id").and_then(Value::as_str) else {
            decoded.dropped += 1;
            continue;
        };

        let bounds = element
            .get("bounds")
            .and_then(|b| serde_json::from_value::<Bounds>(b.clone()).ok())
            .filter(Bounds::is_finite);

        let entry = match bounds {
            Some(bounds) => SnapshotEntry::Item(LayoutItem {
                id: id.to_string(),
                url: element
                    .get("url")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                bounds,
            }),
            None => SnapshotEntry::Malformed { id: id.to_string() },
        };
        decoded.entries.push(entry);
    }

    Some(decoded)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadRequest {
    pub id: String,
}

impl ReloadRequest {
    /// `None` when the payload has no non-empty string id.
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = value.get("id").and_then(Value::as_str)?;
        if id.is_empty() {
            return None;
        }
        Some(Self { id: id.to_string() })
    }
}

/// Input selector for one panel slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorEntry {
    pub id: String,
    pub selector: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillInputsRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub selectors: Vec<SelectorEntry>,
    /// Whether to submit after filling.
    #[serde(default)]
    pub submit: bool,
    /// Per-slot submit button selector. Slots without one submit with Enter.
    #[serde(default)]
    pub submit_selectors: HashMap<String, String>,
}

impl FillInputsRequest {
    /// Lenient decode: missing fields default, unusable selector entries are skipped.
    pub fn from_value(value: &Value) -> Self {
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let selectors = value
            .get("selectors")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| serde_json::from_value::<SelectorEntry>(e.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        let submit = value
            .get("submit")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let submit_selectors = value
            .get("submitSelectors")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(id, sel)| sel.as_str().map(|s| (id.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            text,
            selectors,
            submit,
            submit_selectors,
        }
    }

    /// Selector for a slot. The last entry wins when an id repeats.
    pub fn selector_for(&self, id: &str) -> Option<&str> {
        self.selectors
            .iter()
            .rev()
            .find(|e| e.id == id)
            .map(|e| e.selector.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn submit_selector_for(&self, id: &str) -> Option<&str> {
        self.submit_selectors
            .get(id)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelPayload {
    #[serde(rename = "deltaX", default)]
    pub delta_x: Option<f64>,
}

impl WheelPayload {
    pub fn from_value(value: &Value) -> Self {
        Self {
            delta_x: value.get("deltaX").and_then(Value::as_f64),
        }
    }

    /// The horizontal delta, if there is one worth relaying.
    pub fn horizontal_delta(&self) -> Option<f64> {
        self.delta_x.filter(|d| d.is_finite() && *d != 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollXPayload {
    #[serde(rename = "deltaX")]
    pub delta_x: f64,
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// A request from a window's UI context to the host, payload still raw.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    ApplySnapshot { window: WindowKey, payload: Value },
    Reload { window: WindowKey, payload: Value },
    FillInputs { window: WindowKey, payload: Value },
}

impl HostRequest {
    pub fn channel(&self) -> &'static str {
        match self {
            Self::ApplySnapshot { .. } => APPLY_SNAPSHOT,
            Self::Reload { .. } => RELOAD,
            Self::FillInputs { .. } => FILL_INPUTS,
        }
    }

    pub fn window(&self) -> WindowKey {
        match self {
            Self::ApplySnapshot { window, .. }
            | Self::Reload { window, .. }
            | Self::FillInputs { window, .. } => *window,
        }
    }
}

/// A notification from the host to a window's UI context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiMessage {
    ScrollX(ScrollXPayload),
}

impl UiMessage {
    pub fn channel(&self) -> &'static str {
        match self {
            Self::ScrollX(_) => SCROLL_X,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::ScrollX(p) => serde_json::json!({ "deltaX": p.delta_x }),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
