//! Window creation and shell setup.

use std::sync::Arc;

use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use chorus_common::{Rect, WindowKey};

use super::core::{ChorusApp, ShellWindow};
use super::shell::ShellState;

impl ChorusApp {
    /// Open one top-level window with its shell. Returns `false` on failure.
    pub(super) fn open_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let key = WindowKey(self.next_window);
        self.next_window += 1;

        let title = if key.0 == 1 {
            self.config.window.title.clone()
        } else {
            format!("{} ({})", self.config.window.title, key.0)
        };
        let attrs = WindowAttributes::default().with_title(title).with_inner_size(
            winit::dpi::LogicalSize::new(
                f64::from(self.config.window.width),
                f64::from(self.config.window.height),
            ),
        );

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        self.reconciler
            .host_mut()
            .register_window(key, Arc::clone(&window));

        let view = match self.reconciler.host_mut().create_shell(
            key,
            Rect::new(0.0, 0.0, size.width, size.height),
            self.config.webview.devtools,
        ) {
            Ok(view) => {
                self.shell_surfaces.insert(view.id(), key);
                Some(view)
            }
            Err(e) => {
                tracing::warn!(window = %key, "Shell webview unavailable: {e}");
                None
            }
        };

        let mut state = ShellState::new(key, &self.config);
        state.resize(size.width, size.height);
        state.mount();

        let id = window.id();
        window.request_redraw();
        self.window_ids.insert(key, id);
        self.shells.insert(
            id,
            ShellWindow {
                window,
                view,
                state,
            },
        );
        tracing::info!(window = %key, "Window opened");
        true
    }

    /// Open the windows requested at startup. Returns how many opened.
    pub(super) fn open_initial_windows(&mut self, event_loop: &ActiveEventLoop) -> u32 {
        let mut opened = 0;
        for _ in 0..self.config.window.windows.max(1) {
            if self.open_window(event_loop) {
                opened += 1;
            }
        }
        opened
    }
}
