//! Chat panel descriptors.

use serde::{Deserialize, Serialize};

/// One chat web application shown as a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Header label.
    pub title: String,
    /// Page loaded into the panel's surface.
    pub url: String,
    /// CSS selector of the prompt field that broadcast text is written into.
    pub input_selector: String,
    /// CSS selector of the send button. Without one, broadcast submits with Enter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_selector: Option<String>,
    /// Initial panel width as a percentage of the window width.
    #[serde(default = "default_width_percent")]
    pub width_percent: u32,
}

fn default_width_percent() -> u32 {
    50
}

impl PanelConfig {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        input_selector: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            input_selector: input_selector.into(),
            submit_selector: None,
            width_percent: default_width_percent(),
        }
    }

    pub fn with_submit(mut self, selector: impl Into<String>) -> Self {
        self.submit_selector = Some(selector.into());
        self
    }
}

/// The panels a fresh install starts with.
pub fn default_panels() -> Vec<PanelConfig> {
    vec![
        PanelConfig::new("ChatGPT", "https://chatgpt.com", "#prompt-textarea")
            .with_submit("button[data-testid=\"send-button\"]"),
        PanelConfig::new(
            "Gemini",
            "https://gemini.google.com",
            "rich-textarea .ql-editor",
        )
        .with_submit("button.send-button"),
        PanelConfig::new(
            "Claude",
            "https://claude.ai",
            "div.ProseMirror[contenteditable=\"true\"]",
        ),
    ]
}
