//! Top-level window configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels (valid range: 400-7680).
    pub width: u32,
    /// Initial inner height in logical pixels (valid range: 300-4320).
    pub height: u32,
    /// Windows opened at startup (valid range: 1-8).
    pub windows: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Chorus".to_string(),
            width: 1440,
            height: 900,
            windows: 1,
        }
    }
}
