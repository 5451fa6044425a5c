//! Broadcast behavior and logging.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Submit each panel after filling its prompt.
    pub submit: bool,
    /// Delay between filling and submitting, in milliseconds (valid range: 0-5000).
    pub submit_delay_ms: u32,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            submit: true,
            submit_delay_ms: 150,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` filter directive scoped to the chorus crates.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Trace => "chorus=trace",
            Self::Debug => "chorus=debug",
            Self::Info => "chorus=info",
            Self::Warn => "chorus=warn",
            Self::Error => "chorus=error",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
