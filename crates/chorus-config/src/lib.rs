//! Chorus configuration system.
//!
//! TOML-based configuration for the panel list, window, strip geometry,
//! embedded surfaces, and broadcast behavior. Every section uses serde
//! defaults so a partial file (or none at all) works.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ChorusConfig, PanelConfig};

use chorus_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it when absent.
pub fn load_config() -> Result<ChorusConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path (the `--config` override).
pub fn load_config_from(path: &Path) -> Result<ChorusConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
