//! Routing of webview events: shell chrome commands and panel IPC.

use serde_json::Value;

use chorus_common::protocol::WHEEL;
use chorus_common::{SurfaceId, WindowKey};
use chorus_webview::{IpcMessage, SurfaceEvent};

use super::core::ChorusApp;
use super::shell::broadcast_request;

/// A command from a window's shell page.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ShellCommand {
    Ready,
    Reload(Value),
    Broadcast(String),
    SetWidth { index: usize, percent: u32 },
    Wheel(f64),
    OpenWindow,
}

impl ShellCommand {
    /// Decode a shell IPC message. Unknown kinds and unusable payloads yield `None`.
    pub(super) fn parse(msg: &IpcMessage) -> Option<Self> {
        let payload = msg.payload.to_value();
        match msg.kind.as_str() {
            "ready" => Some(Self::Ready),
            "reload" => Some(Self::Reload(payload)),
            "broadcast" => {
                let text = payload.get("text").and_then(Value::as_str)?;
                if text.trim().is_empty() {
                    return None;
                }
                Some(Self::Broadcast(text.to_string()))
            }
            "set_width" => {
                let index = payload.get("index").and_then(Value::as_u64)?;
                let percent = payload.get("percent").and_then(Value::as_u64)?;
                Some(Self::SetWidth {
                    index: usize::try_from(index).ok()?,
                    percent: u32::try_from(percent).ok()?,
                })
            }
            "wheel" => payload
                .get("deltaX")
                .and_then(Value::as_f64)
                .filter(|d| d.is_finite() && *d != 0.0)
                .map(Self::Wheel),
            "open_window" => Some(Self::OpenWindow),
            _ => None,
        }
    }
}

impl ChorusApp {
    /// Drain queued webview events and route each one.
    pub(super) fn poll_surface_events(&mut self) {
        let events = self.reconciler.host().drain_events();
        for event in events {
            match event {
                SurfaceEvent::Ipc { surface, body } => self.handle_ipc(surface, &body),
                SurfaceEvent::PageLoad {
                    surface,
                    state,
                    url,
                } => {
                    tracing::debug!(%surface, ?state, url = %url, "page load");
                }
                SurfaceEvent::TitleChanged { surface, title } => {
                    tracing::trace!(%surface, title = %title, "title changed");
                }
            }
        }
    }

    fn handle_ipc(&mut self, surface: SurfaceId, body: &str) {
        let Some(msg) = IpcMessage::from_json(body) else {
            tracing::warn!(%surface, body_len = body.len(), "unparsable IPC message");
            return;
        };

        if let Some(&window) = self.shell_surfaces.get(&surface) {
            match ShellCommand::parse(&msg) {
                Some(command) => self.handle_shell_command(window, command),
                None => tracing::debug!(%window, kind = %msg.kind, "shell message ignored"),
            }
            return;
        }

        if msg.kind == WHEEL {
            self.reconciler.relay_wheel(surface, &msg.payload.to_value());
        } else {
            tracing::debug!(%surface, kind = %msg.kind, "surface message ignored");
        }
    }

    pub(super) fn handle_shell_command(&mut self, window: WindowKey, command: ShellCommand) {
        tracing::debug!(%window, ?command, "shell command");
        match command {
            ShellCommand::Ready => {
                if let Some(shell) = self.shell_mut(window) {
                    shell.state.mark_chrome_dirty();
                }
            }
            ShellCommand::Reload(payload) => {
                let Some(shell) = self.shell_mut(window) else {
                    return;
                };
                let request = shell.state.reload_request(payload);
                self.reconciler.handle(request);
            }
            ShellCommand::Broadcast(text) => {
                let request =
                    broadcast_request(window, &text, &self.config.panels, &self.config.broadcast);
                self.reconciler.handle(request);
            }
            ShellCommand::SetWidth { index, percent } => {
                if let Some(shell) = self.shell_mut(window) {
                    if !shell.state.set_width(index, percent) {
                        tracing::debug!(%window, index, percent, "width change rejected");
                    }
                }
            }
            ShellCommand::Wheel(delta_x) => {
                if let Some(shell) = self.shell_mut(window) {
                    shell.state.scroll_by(delta_x);
                }
            }
            ShellCommand::OpenWindow => {
                self.pending_windows += 1;
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
