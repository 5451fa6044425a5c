//! Panel strip geometry configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Padding around the strip in pixels (valid range: 0-40).
    pub padding: u32,
    /// Gap between panels in pixels (valid range: 0-40).
    pub panel_gap: u32,
    /// Panel header height in pixels (valid range: 16-96).
    pub header_height: u32,
    /// Panel border width in pixels (valid range: 0-4).
    pub border_width: u32,
    /// Height of the broadcast composer bar in pixels (valid range: 32-240).
    pub composer_height: u32,
    /// Width presets offered in each panel header, in percent of the window.
    pub width_options: Vec<u32>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 8,
            panel_gap: 8,
            header_height: 36,
            border_width: 1,
            composer_height: 64,
            width_options: vec![25, 33, 50, 75, 100],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_config_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.padding, 8);
        assert_eq!(config.panel_gap, 8);
        assert_eq!(config.header_height, 36);
        assert_eq!(config.border_width, 1);
        assert_eq!(config.width_options, vec![25, 33, 50, 75, 100]);
    }

    #[test]
    fn layout_config_partial_toml() {
        let toml_str = r#"
panel_gap = 12
width_options = [50, 100]
"#;
        let config: LayoutConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.panel_gap, 12);
        assert_eq!(config.width_options, vec![50, 100]);
        // Defaults preserved
        assert_eq!(config.padding, 8);
        assert_eq!(config.composer_height, 64);
    }
}
