//! Configuration schema types for Chorus.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod layout;
mod panels;
mod system;
mod webview;
mod window;

pub use layout::*;
pub use panels::*;
pub use system::*;
pub use webview::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Chorus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChorusConfig {
    /// Chat panels, left to right. Slot ids are the stringified indices.
    pub panels: Vec<PanelConfig>,
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub webview: WebViewConfig,
    pub broadcast: BroadcastConfig,
    pub logging: LoggingConfig,
}

impl Default for ChorusConfig {
    fn default() -> Self {
        Self {
            panels: default_panels(),
            window: WindowConfig::default(),
            layout: LayoutConfig::default(),
            webview: WebViewConfig::default(),
            broadcast: BroadcastConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_three_panels() {
        let config = ChorusConfig::default();
        let titles: Vec<&str> = config.panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["ChatGPT", "Gemini", "Claude"]);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: ChorusConfig = toml::from_str("").unwrap();
        assert_eq!(config.panels.len(), 3);
        assert_eq!(config.window.title, "Chorus");
    }

    #[test]
    fn panels_array_replaces_defaults() {
        let toml_str = r##"
[[panels]]
title = "Local"
url = "http://localhost:3000"
input_selector = "#prompt"
"##;
        let config: ChorusConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.panels.len(), 1);
        assert_eq!(config.panels[0].title, "Local");
        assert_eq!(config.panels[0].submit_selector, None);
        assert_eq!(config.panels[0].width_percent, 50);
    }
}
