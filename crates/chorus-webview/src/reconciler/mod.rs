//! View reconciliation.
//!
//! `ViewReconciler` owns every panel surface, grouped into one scope per
//! window and keyed by slot id inside it. Each layout snapshot is the
//! complete desired set for its window: missing slots are created, live
//! ones are navigated and resized only when their cached values differ,
//! and slots absent from the snapshot are destroyed after everything else
//! in the snapshot has been applied.
//!
//! No operation here returns an error. Failures are logged and contained
//! to the surface they happened on.

use std::collections::{BTreeMap, HashMap, HashSet};

use chorus_common::protocol::{
    decode_snapshot, FillInputsRequest, HostRequest, LayoutItem, PixelBounds, ReloadRequest,
    ScrollXPayload, SnapshotEntry, UiMessage, WheelPayload,
};
use chorus_common::{SurfaceId, WindowKey};
use serde_json::Value;
use tracing::{debug, warn};

use crate::origins::AllowedOrigins;
use crate::scripts;
use crate::surface::{Surface, SurfaceHost, SurfaceOptions};

/// A live surface and the last values applied to it.
struct SurfaceEntry<S> {
    surface: S,
    url: Option<String>,
    bounds: Option<PixelBounds>,
}

struct WindowScope<S> {
    entries: BTreeMap<String, SurfaceEntry<S>>,
}

impl<S> Default for WindowScope<S> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

/// Where a surface lives, for routing its inbound events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseEntry {
    pub window: WindowKey,
    pub slot: String,
}

pub struct ViewReconciler<H: SurfaceHost> {
    host: H,
    options: SurfaceOptions,
    scopes: HashMap<WindowKey, WindowScope<H::Surface>>,
    reverse: HashMap<SurfaceId, ReverseEntry>,
    origins: AllowedOrigins,
    submit_delay_ms: u64,
}

impl<H: SurfaceHost> ViewReconciler<H> {
    pub fn new(host: H, options: SurfaceOptions, origins: AllowedOrigins) -> Self {
        Self {
            host,
            options,
            scopes: HashMap::new(),
            reverse: HashMap::new(),
            origins,
            submit_delay_ms: 150,
        }
    }

    /// Delay between filling inputs and the submit step.
    pub fn with_submit_delay(mut self, delay_ms: u64) -> Self {
        self.submit_delay_ms = delay_ms;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn origins(&self) -> &AllowedOrigins {
        &self.origins
    }

    /// Route a request from a window's UI context.
    pub fn handle(&mut self, request: HostRequest) {
        match request {
            HostRequest::ApplySnapshot { window, payload } => self.apply_snapshot(window, &payload),
            HostRequest::Reload { window, payload } => match ReloadRequest::from_value(&payload) {
                Some(req) => self.reload(window, &req.id),
                None => debug!(%window, "reload request without id ignored"),
            },
            HostRequest::FillInputs { window, payload } => {
                let req = FillInputsRequest::from_value(&payload);
                self.fill_inputs(window, &req);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Apply a raw snapshot payload. A non-array payload is ignored.
    pub fn apply_snapshot(&mut self, window: WindowKey, payload: &Value) {
        let Some(decoded) = decode_snapshot(payload) else {
            warn!(%window, "snapshot payload is not an array, ignored");
            return;
        };
        if decoded.dropped > 0 {
            debug!(%window, dropped = decoded.dropped, "snapshot entries without id skipped");
        }

        let mut seen = HashSet::new();
        for entry in decoded.entries {
            match entry {
                SnapshotEntry::Item(item) => {
                    seen.insert(item.id.clone());
                    self.apply_item(window, &item);
                }
                SnapshotEntry::Malformed { id } => {
                    debug!(%window, id = %id, "malformed snapshot entry skipped");
                    seen.insert(id);
                }
            }
        }
        self.prune(window, &seen);
    }

    fn apply_item(&mut self, window: WindowKey, item: &LayoutItem) {
        let scope = self.scopes.entry(window).or_default();

        if !scope.entries.contains_key(&item.id) {
            let mut surface = match self.host.create_surface(window, &self.options) {
                Ok(surface) => surface,
                Err(e) => {
                    warn!(%window, id = %item.id, error = %e, "failed to create surface");
                    return;
                }
            };
            if let Err(e) = self.host.attach(window, &mut surface) {
                warn!(%window, id = %item.id, error = %e, "failed to attach surface");
                surface.close();
                return;
            }
            let surface_id = surface.id();
            self.reverse.insert(
                surface_id,
                ReverseEntry {
                    window,
                    slot: item.id.clone(),
                },
            );
            scope.entries.insert(
                item.id.clone(),
                SurfaceEntry {
                    surface,
                    url: None,
                    bounds: None,
                },
            );
            debug!(%window, id = %item.id, surface = %surface_id, "surface created");
        }

        let Some(entry) = scope.entries.get_mut(&item.id) else {
            return;
        };

        if !item.url.is_empty() && entry.url.as_deref() != Some(item.url.as_str()) {
            if let Err(e) = entry.surface.load_url(&item.url) {
                warn!(%window, id = %item.id, url = %item.url, error = %e, "navigation failed");
            }
            entry.url = Some(item.url.clone());
            if self.origins.record_url(&item.url) {
                debug!(url = %item.url, "origin allowed");
            }
        }

        let bounds = item.bounds.to_pixels();
        if entry.bounds != Some(bounds) {
            match entry.surface.set_bounds(bounds) {
                Ok(()) => entry.bounds = Some(bounds),
                Err(e) => warn!(%window, id = %item.id, error = %e, "failed to set bounds"),
            }
        }
    }

    fn prune(&mut self, window: WindowKey, seen: &HashSet<String>) {
        let Some(scope) = self.scopes.get_mut(&window) else {
            return;
        };
        let stale: Vec<String> = scope
            .entries
            .keys()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect();
        for id in stale {
            if let Some(entry) = scope.entries.remove(&id) {
                debug!(%window, id = %id, "surface no longer in layout");
                destroy(&mut self.host, &mut self.reverse, window, entry);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Auxiliary operations
    // -------------------------------------------------------------------------

    /// Reload one slot. Unknown window or id is a no-op.
    pub fn reload(&mut self, window: WindowKey, id: &str) {
        let Some(entry) = self
            .scopes
            .get_mut(&window)
            .and_then(|scope| scope.entries.get_mut(id))
        else {
            debug!(%window, id, "reload for unknown surface ignored");
            return;
        };
        if let Err(e) = entry.surface.reload() {
            warn!(%window, id, error = %e, "reload failed");
        }
    }

    /// Inject `req.text` into every slot of the window that has a selector.
    ///
    /// Returns how many surfaces the script was dispatched to. A failure on
    /// one surface is logged and the loop moves on.
    pub fn fill_inputs(&mut self, window: WindowKey, req: &FillInputsRequest) -> usize {
        let Some(scope) = self.scopes.get_mut(&window) else {
            debug!(%window, "fill-inputs for unknown window ignored");
            return 0;
        };

        let mut dispatched = 0;
        for (id, entry) in scope.entries.iter_mut() {
            let Some(selector) = req.selector_for(id) else {
                continue;
            };
            let submit = req
                .submit
                .then(|| req.submit_selector_for(id).unwrap_or(""));
            let script =
                scripts::fill_inputs_script(&req.text, selector, submit, self.submit_delay_ms);

            let slot = id.clone();
            let on_result = Box::new(move |raw: String| match scripts::parse_fill_result(&raw) {
                Some(count) => debug!(%window, id = %slot, count, "inputs filled"),
                None => warn!(%window, id = %slot, result = %raw, "fill script failed in page"),
            });

            match entry.surface.execute_script(&script, on_result) {
                Ok(()) => dispatched += 1,
                Err(e) => warn!(%window, id = %id, error = %e, "fill-inputs injection failed"),
            }
        }
        dispatched
    }

    /// Forward a surface's horizontal wheel gesture to its window's UI.
    ///
    /// Returns whether a scroll message was sent.
    pub fn relay_wheel(&mut self, surface: SurfaceId, payload: &Value) -> bool {
        let Some(owner) = self.reverse.get(&surface) else {
            debug!(%surface, "wheel from unknown surface ignored");
            return false;
        };
        let Some(delta_x) = WheelPayload::from_value(payload).horizontal_delta() else {
            return false;
        };
        self.host
            .send_to_ui(owner.window, UiMessage::ScrollX(ScrollXPayload { delta_x }));
        true
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Destroy every surface of a window. Returns how many were destroyed.
    pub fn close_window(&mut self, window: WindowKey) -> usize {
        let Some(scope) = self.scopes.remove(&window) else {
            return 0;
        };
        let count = scope.entries.len();
        for (_, entry) in scope.entries {
            destroy(&mut self.host, &mut self.reverse, window, entry);
        }
        debug!(%window, count, "window scope torn down");
        count
    }

    pub fn close_all(&mut self) {
        let windows: Vec<WindowKey> = self.scopes.keys().copied().collect();
        for window in windows {
            self.close_window(window);
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[cfg(test)]
    pub(crate) fn has_surface(&self, window: WindowKey, id: &str) -> bool {
        self.scopes
            .get(&window)
            .is_some_and(|scope| scope.entries.contains_key(id))
    }

    pub fn surface_id(&self, window: WindowKey, id: &str) -> Option<SurfaceId> {
        self.scopes
            .get(&window)
            .and_then(|scope| scope.entries.get(id))
            .map(|entry| entry.surface.id())
    }

    /// Slot ids of a window, sorted.
    pub fn slots(&self, window: WindowKey) -> Vec<String> {
        self.scopes
            .get(&window)
            .map(|scope| scope.entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn surface_count(&self) -> usize {
        self.scopes.values().map(|scope| scope.entries.len()).sum()
    }

    #[cfg(test)]
    pub(crate) fn owner_of(&self, surface: SurfaceId) -> Option<&ReverseEntry> {
        self.reverse.get(&surface)
    }

    #[cfg(test)]
    pub(crate) fn reverse_len(&self) -> usize {
        self.reverse.len()
    }

    pub fn windows(&self) -> Vec<WindowKey> {
        self.scopes.keys().copied().collect()
    }
}

/// Detach, unindex, then close.
fn destroy<H: SurfaceHost>(
    host: &mut H,
    reverse: &mut HashMap<SurfaceId, ReverseEntry>,
    window: WindowKey,
    mut entry: SurfaceEntry<H::Surface>,
) {
    if let Err(e) = host.detach(window, &mut entry.surface) {
        warn!(%window, error = %e, "failed to detach surface");
    }
    let surface_id = entry.surface.id();
    reverse.remove(&surface_id);
    entry.surface.close();
    debug!(%window, surface = %surface_id, "surface destroyed");
}

#[cfg(test)]
mod tests;
