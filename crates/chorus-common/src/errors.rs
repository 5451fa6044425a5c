use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WebViewError {
    #[error("no parent window registered for {0}")]
    UnknownWindow(crate::types::WindowKey),

    #[error("surface creation failed: {0}")]
    Create(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("script execution failed: {0}")]
    Script(String),

    #[error("surface operation failed: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ChorusError {
    #[error("window error: {0}")]
    Window(String),
}
