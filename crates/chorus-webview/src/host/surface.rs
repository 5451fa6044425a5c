use chorus_common::protocol::PixelBounds;
use chorus_common::{SurfaceId, WebViewError};
use tracing::debug;
use wry::WebView;

use crate::surface::{ScriptCallback, Surface};

/// A panel surface backed by a child `wry::WebView`.
pub struct WrySurface {
    id: SurfaceId,
    webview: WebView,
    current_url: String,
}

impl WrySurface {
    pub(super) fn new(id: SurfaceId, webview: WebView) -> Self {
        Self {
            id,
            webview,
            current_url: String::new(),
        }
    }

    pub(super) fn set_visible(&self, visible: bool) -> Result<(), WebViewError> {
        self.webview
            .set_visible(visible)
            .map_err(|e| WebViewError::Backend(e.to_string()))
    }
}

impl Surface for WrySurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn load_url(&mut self, url: &str) -> Result<(), WebViewError> {
        self.current_url = url.to_string();
        self.webview
            .load_url(url)
            .map_err(|e| WebViewError::Navigation(format!("{url}: {e}")))
    }

    fn set_bounds(&mut self, bounds: PixelBounds) -> Result<(), WebViewError> {
        self.webview
            .set_bounds(to_wry_rect(bounds))
            .map_err(|e| WebViewError::Backend(e.to_string()))
    }

    /// Native reload, so error pages with no script context still recover.
    fn reload(&mut self) -> Result<(), WebViewError> {
        self.webview
            .reload()
            .map_err(|e| WebViewError::Backend(e.to_string()))
    }

    fn execute_script(&mut self, script: &str, on_result: ScriptCallback) -> Result<(), WebViewError> {
        self.webview
            .evaluate_script_with_callback(script, on_result)
            .map_err(|e| WebViewError::Script(e.to_string()))
    }

    fn close(self) {
        debug!(surface = %self.id, url = %self.current_url, "webview closed");
        drop(self.webview);
    }
}

/// Integer pixel bounds as a logical `wry::Rect`.
pub(crate) fn to_wry_rect(bounds: PixelBounds) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(
            f64::from(bounds.x),
            f64::from(bounds.y),
        )),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(
            f64::from(bounds.width),
            f64::from(bounds.height),
        )),
    }
}
