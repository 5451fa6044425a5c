//! Per-window UI state: the panel strip, its layout reporter, and the
//! requests the window's UI sends to the host.

use chorus_common::protocol::{HostRequest, LayoutItem, ScrollXPayload};
use chorus_common::WindowKey;
use chorus_config::schema::{BroadcastConfig, LayoutConfig};
use chorus_config::{ChorusConfig, PanelConfig};
use chorus_layout::{
    FrameHandle, FrameScheduler, LayoutReporter, PanelDescriptor, ScrollContainer, SnapshotSink,
    StripLayout, StripMetrics,
};
use serde_json::{json, Map, Value};

/// Hands out frame handles. The reporter owns the pending handle; the app
/// turns it into a window redraw, so cancelling needs no bookkeeping here.
#[derive(Debug, Default)]
pub(super) struct RedrawFrames {
    next: u64,
}

impl FrameScheduler for RedrawFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        FrameHandle(self.next)
    }

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

/// Queues snapshots as `apply-snapshot` requests for the window.
pub(super) struct RequestOutbox {
    window: WindowKey,
    queued: Vec<HostRequest>,
}

impl RequestOutbox {
    fn new(window: WindowKey) -> Self {
        Self {
            window,
            queued: Vec::new(),
        }
    }
}

impl SnapshotSink for RequestOutbox {
    fn send_snapshot(&mut self, items: Vec<LayoutItem>) {
        match serde_json::to_value(&items) {
            Ok(payload) => self.queued.push(HostRequest::ApplySnapshot {
                window: self.window,
                payload,
            }),
            Err(e) => tracing::warn!(window = %self.window, error = %e, "failed to encode snapshot"),
        }
    }
}

pub(super) fn strip_metrics(layout: &LayoutConfig) -> StripMetrics {
    StripMetrics {
        padding: f64::from(layout.padding),
        gap: f64::from(layout.panel_gap),
        header_height: f64::from(layout.header_height),
        border_width: f64::from(layout.border_width),
        composer_height: f64::from(layout.composer_height),
    }
}

pub(super) struct ShellState {
    key: WindowKey,
    strip: StripLayout,
    reporter: LayoutReporter<RedrawFrames, RequestOutbox>,
    width_options: Vec<u32>,
    chrome_dirty: bool,
}

impl ShellState {
    pub(super) fn new(key: WindowKey, config: &ChorusConfig) -> Self {
        let strip = StripLayout::new(
            strip_metrics(&config.layout),
            config.panels.iter().map(|p| p.width_percent),
        );
        let descriptors = config
            .panels
            .iter()
            .map(|p| PanelDescriptor::new(&p.title, &p.url))
            .collect();
        Self {
            key,
            strip,
            reporter: LayoutReporter::new(
                descriptors,
                RedrawFrames::default(),
                RequestOutbox::new(key),
            ),
            width_options: config.layout.width_options.clone(),
            chrome_dirty: true,
        }
    }

    pub(super) fn key(&self) -> WindowKey {
        self.key
    }

    /// Attach every panel's placeholder and start reporting.
    pub(super) fn mount(&mut self) {
        self.strip.mount_all();
        for index in 0..self.strip.panel_count() {
            self.reporter.register_placeholder(index);
        }
        self.reporter.on_mount();
        self.reporter.observe_resizes(&self.strip);
    }

    pub(super) fn resize(&mut self, width: f64, height: f64) {
        if self.strip.set_viewport(width, height) {
            self.chrome_dirty = true;
            self.reporter.on_window_resize();
        }
    }

    /// Change a panel's width. Only configured width options are accepted.
    pub(super) fn set_width(&mut self, index: usize, percent: u32) -> bool {
        if !self.width_options.contains(&percent) {
            return false;
        }
        if !self.strip.set_width_percent(index, percent) {
            return false;
        }
        self.chrome_dirty = true;
        self.reporter.observe_resizes(&self.strip);
        true
    }

    /// Scroll from a wheel gesture over the shell itself.
    pub(super) fn scroll_by(&mut self, delta_x: f64) -> bool {
        if !self.strip.scroll_by(delta_x) {
            return false;
        }
        self.chrome_dirty = true;
        self.reporter.on_container_scroll();
        true
    }

    /// Scroll relayed from a panel surface.
    pub(super) fn on_scroll_x(&mut self, payload: ScrollXPayload) {
        let before = self.strip.scroll_x();
        self.reporter.on_scroll_x(payload, &mut self.strip);
        if self.strip.scroll_x() != before {
            self.chrome_dirty = true;
        }
    }

    pub(super) fn needs_frame(&self) -> bool {
        self.reporter.pending_frame().is_some() || self.chrome_dirty
    }

    /// Run the pending animation frame, if any. Returns whether a snapshot was queued.
    pub(super) fn run_frame(&mut self) -> bool {
        match self.reporter.pending_frame() {
            Some(handle) => self.reporter.on_animation_frame(handle, &self.strip),
            None => false,
        }
    }

    pub(super) fn take_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.reporter.sink_mut().queued)
    }

    /// Chrome description for the shell page, if it changed since last taken.
    pub(super) fn take_chrome(&mut self) -> Option<Value> {
        if !self.chrome_dirty {
            return None;
        }
        self.chrome_dirty = false;
        Some(self.chrome())
    }

    pub(super) fn mark_chrome_dirty(&mut self) {
        self.chrome_dirty = true;
    }

    pub(super) fn chrome(&self) -> Value {
        let panels: Vec<Value> = self
            .reporter
            .descriptors()
            .iter()
            .map(|d| json!({ "title": d.title, "url": d.url }))
            .collect();
        json!({
            "frames": self.strip.frames(),
            "composer": self.strip.composer_rect(),
            "panels": panels,
            "widthOptions": self.width_options,
            "scrollX": self.strip.scroll_x(),
        })
    }

    pub(super) fn reload_request(&self, payload: Value) -> HostRequest {
        HostRequest::Reload {
            window: self.key,
            payload,
        }
    }

    /// Stop reporting, then detach every placeholder.
    pub(super) fn teardown(&mut self) {
        self.reporter.teardown();
        for index in 0..self.strip.panel_count() {
            self.reporter.unregister_placeholder(index);
            self.strip.unmount(index);
        }
    }
}

/// `fill-inputs` request typing `text` into every configured panel.
pub(super) fn broadcast_request(
    window: WindowKey,
    text: &str,
    panels: &[PanelConfig],
    broadcast: &BroadcastConfig,
) -> HostRequest {
    let selectors: Vec<Value> = panels
        .iter()
        .enumerate()
        .map(|(index, panel)| json!({ "id": index.to_string(), "selector": panel.input_selector }))
        .collect();

    let mut submit_selectors = Map::new();
    for (index, panel) in panels.iter().enumerate() {
        if let Some(selector) = panel.submit_selector.as_deref().filter(|s| !s.is_empty()) {
            submit_selectors.insert(index.to_string(), Value::String(selector.to_string()));
        }
    }

    HostRequest::FillInputs {
        window,
        payload: json!({
            "text": text,
            "selectors": selectors,
            "submit": broadcast.submit,
            "submitSelectors": submit_selectors,
        }),
    }
}

// =============================================================================
// TESTS
// =============================================================================
