//! `wry`-backed surface host.
//!
//! Every surface is a child webview of a registered parent window. Handlers
//! installed on each webview push `SurfaceEvent`s into a shared queue that the
//! app drains once per poll.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chorus_common::protocol::UiMessage;
use chorus_common::{SurfaceId, WebViewError, WindowKey};
use tracing::debug;
use wry::raw_window_handle::HasWindowHandle;
use wry::WebViewBuilder;

use crate::content::ContentProvider;
use crate::events::SurfaceEvent;
use crate::origins::AllowedOrigins;
use crate::scripts::WHEEL_BRIDGE_SCRIPT;
use crate::surface::{SurfaceHost, SurfaceOptions};

mod handlers;
mod shell;
mod surface;

pub use handlers::{is_shell_navigation_allowed, SHELL_NAV_PREFIXES};
pub use shell::ShellView;
pub use surface::WrySurface;

pub struct WryHost<W: HasWindowHandle> {
    windows: HashMap<WindowKey, Arc<W>>,
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
    ui_outbox: Vec<(WindowKey, UiMessage)>,
    origins: AllowedOrigins,
    content_provider: Option<Arc<ContentProvider>>,
    next_id: u64,
}

impl<W: HasWindowHandle> WryHost<W> {
    pub fn new(origins: AllowedOrigins) -> Self {
        Self {
            windows: HashMap::new(),
            events: Arc::new(Mutex::new(Vec::new())),
            ui_outbox: Vec::new(),
            origins,
            content_provider: None,
            next_id: 0,
        }
    }

    pub fn register_window(&mut self, key: WindowKey, window: Arc<W>) {
        debug!(window = %key, "parent window registered");
        self.windows.insert(key, window);
    }

    pub fn unregister_window(&mut self, key: WindowKey) -> Option<Arc<W>> {
        self.windows.remove(&key)
    }

    /// Set the provider serving `chorus://` to shell webviews.
    pub fn set_content_provider(&mut self, provider: ContentProvider) {
        self.content_provider = Some(Arc::new(provider));
    }

    pub fn drain_events(&self) -> Vec<SurfaceEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }

    /// Messages queued by `send_to_ui`, in send order.
    pub fn drain_ui_messages(&mut self) -> Vec<(WindowKey, UiMessage)> {
        std::mem::take(&mut self.ui_outbox)
    }

    fn window(&self, key: WindowKey) -> Result<&Arc<W>, WebViewError> {
        self.windows
            .get(&key)
            .ok_or(WebViewError::UnknownWindow(key))
    }

    fn next_surface_id(&mut self) -> SurfaceId {
        self.next_id += 1;
        SurfaceId(self.next_id)
    }

    /// Create the shell webview that draws a window's chrome.
    pub fn create_shell(
        &mut self,
        key: WindowKey,
        bounds: chorus_common::Rect,
        devtools: bool,
    ) -> Result<ShellView, WebViewError> {
        let provider = self
            .content_provider
            .clone()
            .ok_or_else(|| WebViewError::Create("no content provider for shell".into()))?;
        let window = Arc::clone(self.window(key)?);
        let id = self.next_surface_id();
        let events = Arc::clone(&self.events);
        ShellView::build(id, key, window.as_ref(), bounds, devtools, provider, events)
    }
}

impl<W: HasWindowHandle> SurfaceHost for WryHost<W> {
    type Surface = WrySurface;

    fn create_surface(
        &mut self,
        key: WindowKey,
        options: &SurfaceOptions,
    ) -> Result<WrySurface, WebViewError> {
        self.window(key)?;
        let id = self.next_surface_id();
        let events = Arc::clone(&self.events);
        let origins = self.origins.clone();

        let mut builder = WebViewBuilder::new()
            .with_bounds(surface::to_wry_rect(Default::default()))
            .with_visible(false)
            .with_devtools(options.devtools)
            .with_focused(false)
            .with_initialization_script(WHEEL_BRIDGE_SCRIPT);

        if let Some(path) = &options.bootstrap_path {
            let script = std::fs::read_to_string(path).map_err(|e| {
                WebViewError::Create(format!("bootstrap script {}: {e}", path.display()))
            })?;
            builder = builder.with_initialization_script(&script);
        }

        if let Some(ua) = &options.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = handlers::attach_surface_ipc_handler(builder, Arc::clone(&events), origins, id);
        builder = handlers::attach_page_load_handler(builder, Arc::clone(&events), id);
        builder = handlers::attach_title_handler(builder, events, id);

        let window = self.window(key)?;
        let webview = builder
            .build_as_child(window.as_ref())
            .map_err(|e| WebViewError::Create(e.to_string()))?;

        debug!(window = %key, surface = %id, "webview created");
        Ok(WrySurface::new(id, webview))
    }

    fn attach(&mut self, key: WindowKey, surface: &mut WrySurface) -> Result<(), WebViewError> {
        self.window(key)?;
        surface.set_visible(true)
    }

    fn detach(&mut self, _key: WindowKey, surface: &mut WrySurface) -> Result<(), WebViewError> {
        surface.set_visible(false)
    }

    fn send_to_ui(&mut self, key: WindowKey, message: UiMessage) {
        self.ui_outbox.push((key, message));
    }
}
