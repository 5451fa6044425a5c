use std::sync::{Arc, Mutex};

use chorus_common::{Rect, SurfaceId, WebViewError, WindowKey};
use tracing::debug;
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebView, WebViewBuilder};

use crate::content::{ContentProvider, SHELL_URL};
use crate::events::SurfaceEvent;
use crate::ipc::{js_dispatch_message, IPC_INIT_SCRIPT};

use super::handlers;

/// The webview drawing a window's chrome: panel headers, the broadcast
/// composer and the scrollable gaps between panels.
///
/// It covers the whole window and sits below the panel surfaces.
pub struct ShellView {
    id: SurfaceId,
    webview: WebView,
}

impl ShellView {
    pub(super) fn build<W: HasWindowHandle>(
        id: SurfaceId,
        window: WindowKey,
        parent: &W,
        bounds: Rect,
        devtools: bool,
        provider: Arc<ContentProvider>,
        events: Arc<Mutex<Vec<SurfaceEvent>>>,
    ) -> Result<Self, WebViewError> {
        let mut builder = WebViewBuilder::new()
            .with_bounds(to_wry_rect(bounds))
            .with_devtools(devtools)
            .with_initialization_script(IPC_INIT_SCRIPT);

        builder = handlers::attach_shell_ipc_handler(builder, Arc::clone(&events), id);
        builder = handlers::attach_page_load_handler(builder, events, id);
        builder = handlers::attach_shell_navigation_handler(builder, id);
        builder = handlers::attach_content_protocol(builder, provider);

        let webview = builder
            .with_url(SHELL_URL)
            .build_as_child(parent)
            .map_err(|e| WebViewError::Create(e.to_string()))?;

        debug!(%window, surface = %id, "shell webview created");
        Ok(Self { id, webview })
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn set_bounds(&self, bounds: Rect) -> Result<(), WebViewError> {
        self.webview
            .set_bounds(to_wry_rect(bounds))
            .map_err(|e| WebViewError::Backend(e.to_string()))
    }

    /// Deliver a message to the page's `window.chorus.ipc` handlers.
    pub fn send(&self, kind: &str, payload: &serde_json::Value) -> Result<(), WebViewError> {
        self.webview
            .evaluate_script(&js_dispatch_message(kind, payload))
            .map_err(|e| WebViewError::Script(e.to_string()))
    }
}

fn to_wry_rect(rect: Rect) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(rect.x, rect.y)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(rect.width, rect.height)),
    }
}
