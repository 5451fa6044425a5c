//! TOML config file loading and creation.

use crate::schema::ChorusConfig;
use chorus_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// Validation is left to the caller.
pub fn load_from_path(path: &Path) -> Result<ChorusConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: ChorusConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/chorus/config.toml`
/// On Linux: `~/.config/chorus/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<ChorusConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(ChorusConfig::default());
    }

    load_from_path(&path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("chorus").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

/// Generate the default TOML config content with comments.
fn default_config_toml() -> &'static str {
    r##"# Chorus Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# Defining any [[panels]] entry replaces the whole default panel list.

# [[panels]]
# title = "ChatGPT"
# url = "https://chatgpt.com"
# input_selector = "#prompt-textarea"
# submit_selector = 'button[data-testid="send-button"]'
# width_percent = 50

[window]
# title = "Chorus"
# width = 1440           # 400-7680
# height = 900           # 300-4320
# windows = 1            # 1-8

[layout]
# padding = 8            # 0-40
# panel_gap = 8          # 0-40
# header_height = 36     # 16-96
# border_width = 1       # 0-4
# composer_height = 64   # 32-240
# width_options = [25, 33, 50, 75, 100]

[webview]
# user_agent = "Mozilla/5.0 ..."
# devtools = false
# bootstrap_script = "/path/to/panel-bootstrap.js"
# assets_dir = "assets"

[broadcast]
# submit = true
# submit_delay_ms = 150  # 0-5000

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
}
