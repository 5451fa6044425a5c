//! ChorusApp struct definition and constructor.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::window::{Window, WindowId};

use chorus_common::{SurfaceId, WindowKey};
use chorus_config::ChorusConfig;
use chorus_webview::{
    AllowedOrigins, ContentProvider, ShellView, SurfaceOptions, ViewReconciler, WryHost,
};

use super::shell::ShellState;

/// How often to poll for webview events (approx 120 Hz).
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// One open top-level window.
pub(super) struct ShellWindow {
    /// Declared first so it drops before `window`.
    pub(super) view: Option<ShellView>,
    pub(super) window: Arc<Window>,
    pub(super) state: ShellState,
}

pub struct ChorusApp {
    pub(super) config: ChorusConfig,
    pub(super) reconciler: ViewReconciler<WryHost<Window>>,

    pub(super) shells: HashMap<WindowId, ShellWindow>,
    pub(super) window_ids: HashMap<WindowKey, WindowId>,
    /// Shell webview id -> owning window, for routing shell IPC.
    pub(super) shell_surfaces: HashMap<SurfaceId, WindowKey>,
    pub(super) next_window: u64,

    /// Windows requested from a shell page, opened on the next poll.
    pub(super) pending_windows: u32,
    pub(super) started: bool,
    pub(super) last_poll: Instant,
}

impl ChorusApp {
    pub fn new(config: ChorusConfig) -> Self {
        let origins = AllowedOrigins::new();
        let mut host = WryHost::new(origins.clone());
        host.set_content_provider(ContentProvider::new(assets_dir(&config.webview.assets_dir)));

        let options = SurfaceOptions {
            bootstrap_path: config.webview.bootstrap_script.clone(),
            devtools: config.webview.devtools,
            user_agent: config.webview.user_agent.clone(),
        };
        let reconciler = ViewReconciler::new(host, options, origins)
            .with_submit_delay(u64::from(config.broadcast.submit_delay_ms));

        Self {
            config,
            reconciler,
            shells: HashMap::new(),
            window_ids: HashMap::new(),
            shell_surfaces: HashMap::new(),
            next_window: 1,
            pending_windows: 0,
            started: false,
            last_poll: Instant::now(),
        }
    }

    pub(super) fn shell_mut(&mut self, key: WindowKey) -> Option<&mut ShellWindow> {
        let id = self.window_ids.get(&key)?;
        self.shells.get_mut(id)
    }
}

/// Resolve the assets directory. Relative paths are tried against the
/// working directory first, then next to the executable.
fn assets_dir(configured: &std::path::Path) -> PathBuf {
    if configured.is_absolute() {
        return configured.to_path_buf();
    }
    let from_cwd = std::env::current_dir().unwrap_or_default().join(configured);
    if from_cwd.is_dir() {
        return from_cwd;
    }
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(configured)));
    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => {
            tracing::warn!(
                path = %from_cwd.display(),
                "Assets directory not found, shell pages will not load"
            );
            from_cwd
        }
    }
}
