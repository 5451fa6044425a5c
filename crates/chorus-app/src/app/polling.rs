//! Polling of webview events and per-frame layout sync.

use std::time::Instant;

use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::WindowId;

use chorus_common::protocol::{ScrollXPayload, UiMessage, SCROLL_X};

use super::core::{ChorusApp, POLL_INTERVAL};

impl ChorusApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_surface_events();
            self.route_ui_messages();
        }

        for shell in self.shells.values() {
            if shell.state.needs_frame() {
                shell.window.request_redraw();
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    /// Animation frame for one window: send the pending snapshot and
    /// refresh the shell chrome.
    pub(super) fn run_frame(&mut self, window_id: WindowId) {
        let Some(shell) = self.shells.get_mut(&window_id) else {
            return;
        };
        shell.state.run_frame();
        let requests = shell.state.take_requests();

        if let Some(chrome) = shell.state.take_chrome() {
            if let Some(view) = &shell.view {
                if let Err(e) = view.send("chrome", &chrome) {
                    tracing::warn!(window = %shell.state.key(), "Failed to update chrome: {e}");
                }
            }
        }

        for request in requests {
            self.reconciler.handle(request);
        }
    }

    /// Deliver host -> UI messages to each window's reporter.
    fn route_ui_messages(&mut self) {
        let messages = self.reconciler.host_mut().drain_ui_messages();
        for (key, message) in messages {
            let Some(shell) = self.shell_mut(key) else {
                continue;
            };
            match message {
                UiMessage::ScrollX(ScrollXPayload { delta_x }) => {
                    tracing::trace!(window = %key, channel = SCROLL_X, delta_x, "relayed scroll");
                    shell.state.on_scroll_x(ScrollXPayload { delta_x });
                }
            }
        }
    }
}
