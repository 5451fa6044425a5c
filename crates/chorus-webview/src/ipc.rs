//! IPC envelope between pages and the host.
//!
//! - **Page -> host**: `window.ipc.postMessage(JSON.stringify({kind, payload}))`,
//!   received by the webview's `ipc_handler`.
//! - **Host -> shell page**: `evaluate_script` calling
//!   `window.chorus.ipc._dispatch(kind, payload)`.

use serde::{Deserialize, Serialize};

/// A typed IPC message from a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    /// The message type / command name.
    pub kind: String,
    /// The message payload.
    #[serde(default = "IpcPayload::none")]
    pub payload: IpcPayload,
}

/// Payload of an IPC message, either a simple string or structured JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcPayload {
    Text(String),
    Json(serde_json::Value),
    None,
}

impl IpcPayload {
    fn none() -> Self {
        Self::None
    }

    /// The payload as JSON, `null` when absent.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Json(v) => v.clone(),
            Self::None => serde_json::Value::Null,
        }
    }
}

impl IpcMessage {
    /// Parse an IPC message from a raw JSON string.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Bridge installed into the shell page.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.chorus = window.chorus || {};
    window.chorus.ipc = {
        send: function(kind, payload) {
            window.ipc.postMessage(JSON.stringify({
                kind: kind,
                payload: payload === undefined ? null : payload
            }));
        },
        _handlers: {},
        on: function(kind, callback) {
            this._handlers[kind] = callback;
        },
        _dispatch: function(kind, payload) {
            var handler = this._handlers[kind];
            if (handler) {
                handler(payload);
            }
        }
    };
})();
"#;

/// JS snippet delivering a message to the shell page's handlers.
pub fn js_dispatch_message(kind: &str, payload: &serde_json::Value) -> String {
    let payload_json = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    format!(
        "window.chorus && window.chorus.ipc._dispatch({}, {});",
        serde_json::to_string(kind).unwrap_or_else(|_| "\"unknown\"".to_string()),
        payload_json,
    )
}
