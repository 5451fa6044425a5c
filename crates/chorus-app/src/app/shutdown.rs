//! Window teardown and graceful shutdown.

use winit::window::WindowId;

use super::core::ChorusApp;

impl ChorusApp {
    /// Tear down one window: its surfaces, its shell, then the window itself.
    pub(super) fn close_window(&mut self, window_id: WindowId) {
        let Some(mut shell) = self.shells.remove(&window_id) else {
            return;
        };
        let key = shell.state.key();
        shell.state.teardown();

        let destroyed = self.reconciler.close_window(key);
        if let Some(view) = shell.view.take() {
            self.shell_surfaces.remove(&view.id());
        }
        self.reconciler.host_mut().unregister_window(key);
        self.window_ids.remove(&key);

        tracing::info!(window = %key, surfaces = destroyed, "Window closed");
    }

    /// Tear down every window.
    pub(super) fn shutdown(&mut self) {
        tracing::info!("Initiating graceful shutdown");

        let ids: Vec<WindowId> = self.shells.keys().copied().collect();
        for id in ids {
            self.close_window(id);
        }
        let leftover = self.reconciler.surface_count();
        if leftover > 0 {
            tracing::warn!(surfaces = leftover, "Closing surfaces of unknown windows");
        }
        self.reconciler.close_all();
        self.pending_windows = 0;

        tracing::info!("Graceful shutdown complete");
    }
}
