//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use chorus_common::Rect;

use super::core::ChorusApp;

impl ApplicationHandler for ChorusApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        if self.open_initial_windows(event_loop) == 0 {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_window(window_id);
                if self.shells.is_empty() {
                    tracing::info!("Last window closed");
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(size) => {
                let Some(shell) = self.shells.get_mut(&window_id) else {
                    return;
                };
                let logical = size.to_logical::<f64>(shell.window.scale_factor());
                shell.state.resize(logical.width, logical.height);
                if let Some(view) = &shell.view {
                    if let Err(e) =
                        view.set_bounds(Rect::new(0.0, 0.0, logical.width, logical.height))
                    {
                        tracing::warn!("Failed to resize shell webview: {e}");
                    }
                }
                shell.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                self.run_frame(window_id);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        while self.pending_windows > 0 {
            self.pending_windows -= 1;
            self.open_window(event_loop);
        }
        self.poll_and_schedule(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
