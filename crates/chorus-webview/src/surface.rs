//! Surface traits.
//!
//! A surface is one embedded web content instance parented to a window.
//! The reconciler only talks to surfaces through these traits so the
//! lifecycle logic runs the same against `wry` and an in-memory host.

use std::path::PathBuf;

use chorus_common::protocol::{PixelBounds, UiMessage};
use chorus_common::{SurfaceId, WebViewError, WindowKey};

/// Receives the JSON-encoded result of an executed script.
pub type ScriptCallback = Box<dyn Fn(String) + Send + 'static>;

/// Creation options shared by every panel surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceOptions {
    /// Script file loaded into every page before its own scripts.
    pub bootstrap_path: Option<PathBuf>,
    pub devtools: bool,
    pub user_agent: Option<String>,
}

pub trait Surface {
    fn id(&self) -> SurfaceId;

    /// Start navigating. Returns once the request is issued, not when the
    /// page has loaded.
    fn load_url(&mut self, url: &str) -> Result<(), WebViewError>;

    fn set_bounds(&mut self, bounds: PixelBounds) -> Result<(), WebViewError>;

    fn reload(&mut self) -> Result<(), WebViewError>;

    /// Run a script in the page. `on_result` fires later with the result.
    fn execute_script(&mut self, script: &str, on_result: ScriptCallback) -> Result<(), WebViewError>;

    /// Release the underlying content resource.
    fn close(self);
}

pub trait SurfaceHost {
    type Surface: Surface;

    fn create_surface(
        &mut self,
        window: WindowKey,
        options: &SurfaceOptions,
    ) -> Result<Self::Surface, WebViewError>;

    /// Show the surface in its window's content area.
    fn attach(&mut self, window: WindowKey, surface: &mut Self::Surface) -> Result<(), WebViewError>;

    fn detach(&mut self, window: WindowKey, surface: &mut Self::Surface) -> Result<(), WebViewError>;

    fn send_to_ui(&mut self, window: WindowKey, message: UiMessage);
}
