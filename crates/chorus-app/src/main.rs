mod app;
mod cli;

use std::path::Path;

use chorus_common::{ChorusError, ConfigError};
use chorus_config::ChorusConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

fn load_config(path: Option<&str>) -> Result<ChorusConfig, ConfigError> {
    match path {
        Some(p) => chorus_config::load_config_from(Path::new(p)),
        None => chorus_config::load_config(),
    }
}

fn main() {
    let args = cli::parse();

    // Loaded before logging so the config can pick the level; reported after.
    let loaded = load_config(args.config.as_deref());

    let log_directive = match (&args.log_level, &loaded) {
        (Some(level), _) => level.as_str(),
        (None, Ok(config)) => config.logging.level.directive(),
        (None, Err(_)) => "chorus=info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::info!("Chorus v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        ChorusConfig::default()
    });
    if let Some(windows) = args.windows {
        config.window.windows = windows;
    }
    tracing::info!(
        panels = config.panels.len(),
        windows = config.window.windows,
        "Config loaded"
    );

    if let Err(e) = run(config) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}

fn run(config: ChorusConfig) -> chorus_common::Result<()> {
    let event_loop = EventLoop::new().map_err(|e| ChorusError::Window(e.to_string()))?;
    let mut app = app::ChorusApp::new(config);

    tracing::info!("Entering event loop");
    event_loop
        .run_app(&mut app)
        .map_err(|e| ChorusError::Window(format!("event loop: {e}")))
}
