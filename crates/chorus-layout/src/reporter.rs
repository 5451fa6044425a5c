//! Layout reporter: turns placeholder geometry into layout snapshots.
//!
//! The reporter is level-triggered. Every trigger (mount, window resize,
//! container scroll, an observed placeholder resize) schedules one full
//! recompute on the next frame; triggers that land before that frame runs
//! collapse into it. A newer trigger cancels the pending frame request and
//! replaces it.

use std::collections::{BTreeMap, HashMap};

use chorus_common::protocol::{js_round, Bounds, LayoutItem, ScrollXPayload};
use chorus_common::types::Rect;
use tracing::{debug, trace};

/// Title and target page of one panel slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDescriptor {
    pub title: String,
    pub url: String,
}

impl PanelDescriptor {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Token for one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Source of animation frames (e.g. window redraws).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Where snapshots go. Fire-and-forget from the reporter's side.
pub trait SnapshotSink {
    fn send_snapshot(&mut self, items: Vec<LayoutItem>);
}

/// Rendered geometry of placeholders, as laid out by the UI.
pub trait PlaceholderGeometry {
    /// Bounding box of a placeholder, `None` while it is not attached.
    fn placeholder_rect(&self, index: usize) -> Option<Rect>;
}

/// The horizontally scrollable container holding the placeholders.
pub trait ScrollContainer {
    /// Scroll by `delta_x`. Returns whether the position changed.
    fn scroll_by(&mut self, delta_x: f64) -> bool;
}

pub struct LayoutReporter<S, K> {
    descriptors: Vec<PanelDescriptor>,
    /// Stringified panel index -> placeholder reference.
    placeholders: BTreeMap<String, usize>,
    /// Last size seen per observed placeholder, in whole pixels.
    observed: HashMap<String, Option<(i64, i64)>>,
    pending: Option<FrameHandle>,
    mounted: bool,
    scheduler: S,
    sink: K,
}

impl<S: FrameScheduler, K: SnapshotSink> LayoutReporter<S, K> {
    pub fn new(descriptors: Vec<PanelDescriptor>, scheduler: S, sink: K) -> Self {
        Self {
            descriptors,
            placeholders: BTreeMap::new(),
            observed: HashMap::new(),
            pending: None,
            mounted: false,
            scheduler,
            sink,
        }
    }

    pub fn descriptors(&self) -> &[PanelDescriptor] {
        &self.descriptors
    }

    /// Record the placeholder for a panel as the UI mounts it.
    pub fn register_placeholder(&mut self, index: usize) {
        let key = index.to_string();
        self.observed.entry(key.clone()).or_insert(None);
        self.placeholders.insert(key, index);
    }

    /// Forget a placeholder as the UI unmounts it.
    pub fn unregister_placeholder(&mut self, index: usize) {
        let key = index.to_string();
        self.placeholders.remove(&key);
        self.observed.remove(&key);
        self.request_sync();
    }

    /// Initial mount: start listening and send the first snapshot.
    pub fn on_mount(&mut self) {
        self.mounted = true;
        self.request_sync();
    }

    pub fn on_window_resize(&mut self) {
        self.request_sync();
    }

    pub fn on_container_scroll(&mut self) {
        self.request_sync();
    }

    /// Compare every observed placeholder's size with the last observation.
    /// Schedules a sync and returns `true` if any changed.
    pub fn observe_resizes<G: PlaceholderGeometry>(&mut self, geometry: &G) -> bool {
        if !self.mounted {
            return false;
        }

        let mut changed = false;
        for (key, index) in &self.placeholders {
            let size = geometry
                .placeholder_rect(*index)
                .map(|r| (js_round(r.width) as i64, js_round(r.height) as i64));
            let last = self.observed.entry(key.clone()).or_insert(None);
            if *last != size {
                trace!(placeholder = %key, ?size, "placeholder resized");
                *last = size;
                changed = true;
            }
        }

        if changed {
            self.request_sync();
        }
        changed
    }

    /// The frame a sync is waiting on, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Schedule a snapshot for the next frame, superseding any pending one.
    pub fn request_sync(&mut self) {
        if !self.mounted {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.pending = Some(self.scheduler.request_frame());
    }

    /// Run a frame. Only the currently pending frame produces a snapshot;
    /// cancelled or stale handles are ignored. Returns whether one was sent.
    pub fn on_animation_frame<G: PlaceholderGeometry>(
        &mut self,
        handle: FrameHandle,
        geometry: &G,
    ) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;

        let items = self.compute_snapshot(geometry);
        debug!(items = items.len(), "sending layout snapshot");
        self.sink.send_snapshot(items);
        true
    }

    /// Full snapshot of every attached placeholder, in panel order.
    pub fn compute_snapshot<G: PlaceholderGeometry>(&self, geometry: &G) -> Vec<LayoutItem> {
        self.descriptors
            .iter()
            .enumerate()
            .filter_map(|(index, descriptor)| {
                let id = index.to_string();
                let placeholder = *self.placeholders.get(&id)?;
                let rect = geometry.placeholder_rect(placeholder)?;
                Some(LayoutItem {
                    id,
                    url: descriptor.url.clone(),
                    bounds: Bounds::new(
                        js_round(rect.x),
                        js_round(rect.y),
                        js_round(rect.width),
                        js_round(rect.height),
                    ),
                })
            })
            .collect()
    }

    /// Inbound scroll request relayed from a surface's wheel gesture.
    pub fn on_scroll_x<C: ScrollContainer>(&mut self, payload: ScrollXPayload, container: &mut C) {
        if !payload.delta_x.is_finite() {
            return;
        }
        if container.scroll_by(payload.delta_x) {
            self.on_container_scroll();
        }
    }

    /// Stop listening: drop the pending frame and forget observations.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.mounted = false;
        for size in self.observed.values_mut() {
            *size = None;
        }
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }
}

// =============================================================================
// TESTS
// =============================================================================
