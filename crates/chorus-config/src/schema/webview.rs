//! Embedded surface configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewConfig {
    /// Custom user agent. Unset keeps the platform webview's own, which
    /// chat sites expect.
    pub user_agent: Option<String>,
    /// Enable devtools in panel surfaces.
    pub devtools: bool,
    /// Extra script run at document start in every panel surface.
    pub bootstrap_script: Option<PathBuf>,
    /// Directory holding the bundled shell page, relative to the working directory.
    pub assets_dir: PathBuf,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            devtools: cfg!(debug_assertions),
            bootstrap_script: None,
            assets_dir: PathBuf::from("assets"),
        }
    }
}
