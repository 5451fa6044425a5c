use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chorus_common::protocol::{FillInputsRequest, HostRequest, PixelBounds, UiMessage};
use chorus_common::{SurfaceId, WebViewError, WindowKey};
use serde_json::{json, Value};

use super::ViewReconciler;
use crate::origins::AllowedOrigins;
use crate::surface::{ScriptCallback, Surface, SurfaceHost, SurfaceOptions};

// =============================================================================
// IN-MEMORY HOST
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(SurfaceId),
    Attach(SurfaceId),
    Detach(SurfaceId),
    Load(SurfaceId, String),
    Bounds(SurfaceId, PixelBounds),
    Reload(SurfaceId),
    Script(SurfaceId, String),
    Close(SurfaceId),
}

#[derive(Default)]
struct Log {
    calls: Vec<Call>,
    ui: Vec<(WindowKey, UiMessage)>,
    failing_scripts: HashSet<SurfaceId>,
    failing_loads: HashSet<SurfaceId>,
}

impl Log {
    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

struct FakeSurface {
    id: SurfaceId,
    log: Rc<RefCell<Log>>,
}

impl Surface for FakeSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn load_url(&mut self, url: &str) -> Result<(), WebViewError> {
        let mut log = self.log.borrow_mut();
        log.calls.push(Call::Load(self.id, url.to_string()));
        if log.failing_loads.contains(&self.id) {
            return Err(WebViewError::Navigation(url.to_string()));
        }
        Ok(())
    }

    fn set_bounds(&mut self, bounds: PixelBounds) -> Result<(), WebViewError> {
        self.log.borrow_mut().calls.push(Call::Bounds(self.id, bounds));
        Ok(())
    }

    fn reload(&mut self) -> Result<(), WebViewError> {
        self.log.borrow_mut().calls.push(Call::Reload(self.id));
        Ok(())
    }

    fn execute_script(&mut self, script: &str, on_result: ScriptCallback) -> Result<(), WebViewError> {
        let mut log = self.log.borrow_mut();
        if log.failing_scripts.contains(&self.id) {
            return Err(WebViewError::Script("surface detached".into()));
        }
        log.calls.push(Call::Script(self.id, script.to_string()));
        drop(log);
        on_result("1".to_string());
        Ok(())
    }

    fn close(self) {
        self.log.borrow_mut().calls.push(Call::Close(self.id));
    }
}

#[derive(Default)]
struct FakeHost {
    log: Rc<RefCell<Log>>,
    next_id: u64,
    fail_create: bool,
}

impl SurfaceHost for FakeHost {
    type Surface = FakeSurface;

    fn create_surface(
        &mut self,
        _window: WindowKey,
        _options: &SurfaceOptions,
    ) -> Result<FakeSurface, WebViewError> {
        if self.fail_create {
            return Err(WebViewError::Create("no window".into()));
        }
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        self.log.borrow_mut().calls.push(Call::Create(id));
        Ok(FakeSurface {
            id,
            log: Rc::clone(&self.log),
        })
    }

    fn attach(&mut self, _window: WindowKey, surface: &mut FakeSurface) -> Result<(), WebViewError> {
        self.log.borrow_mut().calls.push(Call::Attach(surface.id));
        Ok(())
    }

    fn detach(&mut self, _window: WindowKey, surface: &mut FakeSurface) -> Result<(), WebViewError> {
        self.log.borrow_mut().calls.push(Call::Detach(surface.id));
        Ok(())
    }

    fn send_to_ui(&mut self, window: WindowKey, message: UiMessage) {
        self.log.borrow_mut().ui.push((window, message));
    }
}

fn reconciler() -> (ViewReconciler<FakeHost>, Rc<RefCell<Log>>) {
    let host = FakeHost::default();
    let log = Rc::clone(&host.log);
    let r = ViewReconciler::new(host, SurfaceOptions::default(), AllowedOrigins::new());
    (r, log)
}

fn item(id: &str, url: &str, x: f64, y: f64, w: f64, h: f64) -> Value {
    json!({"id": id, "url": url, "bounds": {"x": x, "y": y, "width": w, "height": h}})
}

const W1: WindowKey = WindowKey(1);
const W2: WindowKey = WindowKey(2);

// =============================================================================
// SNAPSHOTS
// =============================================================================

#[test]
fn first_snapshot_creates_attaches_navigates_and_sizes() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(W1, &json!([item("0", "https://a.example/", 0.0, 0.0, 10.0, 10.0)]));

    let sid = r.surface_id(W1, "0").unwrap();
    assert_eq!(
        log.borrow().calls,
        vec![
            Call::Create(sid),
            Call::Attach(sid),
            Call::Load(sid, "https://a.example/".into()),
            Call::Bounds(sid, PixelBounds { x: 0, y: 0, width: 10, height: 10 }),
        ]
    );
    assert_eq!(r.owner_of(sid).map(|o| o.window), Some(W1));
    assert_eq!(r.owner_of(sid).map(|o| o.slot.as_str()), Some("0"));
}

#[test]
fn repeated_item_is_idempotent() {
    let (mut r, log) = reconciler();
    let snap = json!([item("0", "https://a.example/", 1.0, 2.0, 30.0, 40.0)]);
    r.apply_snapshot(W1, &snap);
    let before = log.borrow().calls.len();
    r.apply_snapshot(W1, &snap);
    assert_eq!(log.borrow().calls.len(), before);
}

#[test]
fn sub_pixel_jitter_does_not_resize() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(W1, &json!([item("0", "https://a.example/", 10.2, 0.0, 100.0, 50.0)]));
    r.apply_snapshot(W1, &json!([item("0", "https://a.example/", 9.8, 0.1, 100.4, 49.6)]));
    assert_eq!(log.borrow().count(|c| matches!(c, Call::Bounds(..))), 1);
}

#[test]
fn surviving_slots_are_updated_not_recreated() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(
        W1,
        &json!([
            item("0", "https://a.example/", 0.0, 0.0, 10.0, 10.0),
            item("1", "https://b.example/", 20.0, 0.0, 10.0, 10.0)
        ]),
    );
    let s0 = r.surface_id(W1, "0").unwrap();
    r.apply_snapshot(
        W1,
        &json!([
            item("0", "https://a2.example/", 5.0, 0.0, 10.0, 10.0),
            item("1", "https://b.example/", 20.0, 0.0, 10.0, 10.0)
        ]),
    );

    let log = log.borrow();
    assert_eq!(log.count(|c| matches!(c, Call::Create(_))), 2);
    assert_eq!(log.count(|c| matches!(c, Call::Close(_))), 0);
    assert_eq!(r.surface_id(W1, "0"), Some(s0));
    assert!(log.calls.contains(&Call::Load(s0, "https://a2.example/".into())));
    assert!(log
        .calls
        .contains(&Call::Bounds(s0, PixelBounds { x: 5, y: 0, width: 10, height: 10 })));
}

#[test]
fn absent_slot_is_destroyed_and_unindexed() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(
        W1,
        &json!([
            item("0", "https://a/", 0.0, 0.0, 10.0, 10.0),
            item("1", "https://b/", 20.0, 0.0, 10.0, 10.0)
        ]),
    );
    let s1 = r.surface_id(W1, "1").unwrap();
    r.apply_snapshot(W1, &json!([item("0", "https://a/", 0.0, 0.0, 10.0, 10.0)]));

    assert!(r.has_surface(W1, "0"));
    assert!(!r.has_surface(W1, "1"));
    assert!(r.owner_of(s1).is_none());
    assert_eq!(r.reverse_len(), 1);

    // detach, then close
    let log = log.borrow();
    let calls = &log.calls;
    let detach = calls.iter().position(|c| *c == Call::Detach(s1)).unwrap();
    let close = calls.iter().position(|c| *c == Call::Close(s1)).unwrap();
    assert!(detach < close);
}

#[test]
fn creations_happen_before_deletions() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(W1, &json!([item("old", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    let old = r.surface_id(W1, "old").unwrap();
    log.borrow_mut().calls.clear();

    r.apply_snapshot(W1, &json!([item("new", "https://b/", 0.0, 0.0, 1.0, 1.0)]));
    let new = r.surface_id(W1, "new").unwrap();
    let log = log.borrow();
    let calls = &log.calls;
    let created = calls.iter().position(|c| *c == Call::Create(new)).unwrap();
    let closed = calls.iter().position(|c| *c == Call::Close(old)).unwrap();
    assert!(created < closed);
}

#[test]
fn empty_snapshot_clears_window() {
    let (mut r, _log) = reconciler();
    r.apply_snapshot(W1, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    r.apply_snapshot(W1, &json!([]));
    assert_eq!(r.surface_count(), 0);
    assert_eq!(r.reverse_len(), 0);
}

#[test]
fn non_array_snapshot_is_ignored() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(W1, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    let before = log.borrow().calls.len();
    r.apply_snapshot(W1, &json!({"id": "0"}));
    r.apply_snapshot(W1, &Value::Null);
    assert_eq!(log.borrow().calls.len(), before);
    assert!(r.has_surface(W1, "0"));
}

#[test]
fn malformed_entries_are_skipped_individually() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(
        W1,
        &json!([
            item("0", "https://a/", 0.0, 0.0, 1.0, 1.0),
            item("1", "https://b/", 0.0, 0.0, 1.0, 1.0)
        ]),
    );
    let s1 = r.surface_id(W1, "1").unwrap();
    log.borrow_mut().calls.clear();

    r.apply_snapshot(
        W1,
        &json!([
            {"url": "https://no-id/", "bounds": {"x": 0, "y": 0, "width": 1, "height": 1}},
            {"id": "1", "bounds": {"x": "wide", "y": 0, "width": 1, "height": 1}},
            item("0", "https://a/", 3.0, 0.0, 1.0, 1.0),
            item("2", "https://c/", 0.0, 0.0, 1.0, 1.0)
        ]),
    );

    // "1" keeps its surface untouched, "2" is created, nothing is closed
    assert_eq!(r.surface_id(W1, "1"), Some(s1));
    assert!(r.has_surface(W1, "2"));
    let log = log.borrow();
    assert!(!log.calls.iter().any(|c| matches!(c, Call::Close(_))));
    assert!(!log.calls.iter().any(|c| matches!(c, Call::Bounds(id, _) if *id == s1)));
}

#[test]
fn malformed_entry_for_unknown_id_creates_nothing() {
    let (mut r, _log) = reconciler();
    r.apply_snapshot(W1, &json!([{"id": "0", "bounds": null}]));
    assert_eq!(r.surface_count(), 0);
}

#[test]
fn negative_and_fractional_bounds_normalize() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(W1, &json!([item("0", "", -5.4, 3.6, -1.0, 12.2)]));
    let sid = r.surface_id(W1, "0").unwrap();
    assert!(log.borrow().calls.contains(&Call::Bounds(
        sid,
        PixelBounds { x: -5, y: 4, width: 0, height: 12 }
    )));
}

#[test]
fn empty_url_never_navigates() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(W1, &json!([item("0", "", 0.0, 0.0, 1.0, 1.0)]));
    r.apply_snapshot(W1, &json!([{"id": "0", "bounds": {"x": 0, "y": 0, "width": 1, "height": 1}}]));
    assert_eq!(log.borrow().count(|c| matches!(c, Call::Load(..))), 0);
}

#[test]
fn navigation_failure_is_swallowed_and_cached() {
    let (mut r, log) = reconciler();
    log.borrow_mut().failing_loads.insert(SurfaceId(1));
    let snap = json!([item("0", "not a url", 0.0, 0.0, 1.0, 1.0)]);
    r.apply_snapshot(W1, &snap);
    r.apply_snapshot(W1, &snap);
    assert_eq!(log.borrow().count(|c| matches!(c, Call::Load(..))), 1);
    assert!(r.has_surface(W1, "0"));
    assert!(r.origins().is_empty());
}

#[test]
fn parsable_urls_grow_allowed_origins() {
    let (mut r, _log) = reconciler();
    r.apply_snapshot(
        W1,
        &json!([
            item("0", "https://chatgpt.com/", 0.0, 0.0, 1.0, 1.0),
            item("1", "https://claude.ai/new", 0.0, 0.0, 1.0, 1.0)
        ]),
    );
    r.apply_snapshot(W1, &json!([]));
    assert!(r.origins().contains("https://chatgpt.com"));
    assert!(r.origins().contains("https://claude.ai"));
}

#[test]
fn create_failure_skips_only_that_item() {
    let (mut r, _log) = reconciler();
    r.host_mut().fail_create = true;
    r.apply_snapshot(W1, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    assert_eq!(r.surface_count(), 0);

    r.host_mut().fail_create = false;
    r.apply_snapshot(W1, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    assert!(r.has_surface(W1, "0"));
}

#[test]
fn windows_are_independent() {
    let (mut r, _log) = reconciler();
    r.apply_snapshot(W1, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    r.apply_snapshot(W2, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    assert_ne!(r.surface_id(W1, "0"), r.surface_id(W2, "0"));

    r.apply_snapshot(W2, &json!([]));
    assert!(r.has_surface(W1, "0"));
    assert!(!r.has_surface(W2, "0"));
}

// =============================================================================
// RELOAD / FILL / WHEEL
// =============================================================================

#[test]
fn reload_targets_one_slot() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(
        W1,
        &json!([
            item("0", "https://a/", 0.0, 0.0, 1.0, 1.0),
            item("1", "https://b/", 0.0, 0.0, 1.0, 1.0)
        ]),
    );
    let s1 = r.surface_id(W1, "1").unwrap();
    r.handle(HostRequest::Reload {
        window: W1,
        payload: json!({"id": "1"}),
    });
    assert_eq!(log.borrow().count(|c| matches!(c, Call::Reload(_))), 1);
    assert!(log.borrow().calls.contains(&Call::Reload(s1)));
}

#[test]
fn reload_unknown_is_noop() {
    let (mut r, log) = reconciler();
    r.reload(W1, "0");
    r.apply_snapshot(W1, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    r.reload(W2, "0");
    r.reload(W1, "9");
    r.handle(HostRequest::Reload {
        window: W1,
        payload: json!({}),
    });
    assert_eq!(log.borrow().count(|c| matches!(c, Call::Reload(_))), 0);
}

fn three_panels(r: &mut ViewReconciler<FakeHost>) {
    r.apply_snapshot(
        W1,
        &json!([
            item("0", "https://a/", 0.0, 0.0, 1.0, 1.0),
            item("1", "https://b/", 0.0, 0.0, 1.0, 1.0),
            item("2", "https://c/", 0.0, 0.0, 1.0, 1.0)
        ]),
    );
}

#[test]
fn fill_inputs_only_targets_slots_with_selectors() {
    let (mut r, log) = reconciler();
    three_panels(&mut r);
    let req = FillInputsRequest::from_value(&json!({
        "text": "hello",
        "selectors": [{"id": "0", "selector": "#a"}, {"id": "2", "selector": "#c"}]
    }));
    assert_eq!(r.fill_inputs(W1, &req), 2);

    let s1 = r.surface_id(W1, "1").unwrap();
    let log = log.borrow();
    assert_eq!(log.count(|c| matches!(c, Call::Script(..))), 2);
    assert!(!log.calls.iter().any(|c| matches!(c, Call::Script(id, _) if *id == s1)));
}

#[test]
fn fill_inputs_continues_past_a_failing_surface() {
    let (mut r, log) = reconciler();
    three_panels(&mut r);
    let s0 = r.surface_id(W1, "0").unwrap();
    let s2 = r.surface_id(W1, "2").unwrap();
    log.borrow_mut().failing_scripts.insert(s0);

    let req = FillInputsRequest::from_value(&json!({
        "text": "hello",
        "selectors": [{"id": "0", "selector": "#a"}, {"id": "2", "selector": "#c"}]
    }));
    assert_eq!(r.fill_inputs(W1, &req), 1);
    assert!(log
        .borrow()
        .calls
        .iter()
        .any(|c| matches!(c, Call::Script(id, js) if *id == s2 && js.contains("\"#c\""))));
}

#[test]
fn fill_inputs_submit_modes() {
    let (mut r, log) = reconciler();
    three_panels(&mut r);
    let s0 = r.surface_id(W1, "0").unwrap();
    let s1 = r.surface_id(W1, "1").unwrap();
    let req = FillInputsRequest::from_value(&json!({
        "text": "go",
        "selectors": [{"id": "0", "selector": "#a"}, {"id": "1", "selector": "#b"}],
        "submit": true,
        "submitSelectors": {"0": "button.send"}
    }));
    r.fill_inputs(W1, &req);

    let log = log.borrow();
    let script_for = |sid: SurfaceId| {
        log.calls
            .iter()
            .find_map(|c| match c {
                Call::Script(id, js) if *id == sid => Some(js.clone()),
                _ => None,
            })
            .unwrap()
    };
    assert!(script_for(s0).contains(r#""button.send", 150);"#));
    assert!(script_for(s1).contains(r##""#b", "", 150);"##));
}

#[test]
fn fill_inputs_unknown_window_is_noop() {
    let (mut r, _log) = reconciler();
    let req = FillInputsRequest::from_value(&json!({"text": "x", "selectors": [{"id": "0", "selector": "#a"}]}));
    assert_eq!(r.fill_inputs(W2, &req), 0);
}

#[test]
fn wheel_relays_to_owning_window() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(W2, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    let sid = r.surface_id(W2, "0").unwrap();

    assert!(r.relay_wheel(sid, &json!({"deltaX": 42.0})));
    let log = log.borrow();
    let ui = &log.ui;
    assert_eq!(ui.len(), 1);
    assert_eq!(ui[0].0, W2);
    assert_eq!(ui[0].1.payload(), json!({"deltaX": 42.0}));
}

#[test]
fn zero_or_unknown_wheel_is_not_relayed() {
    let (mut r, log) = reconciler();
    r.apply_snapshot(W1, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    let sid = r.surface_id(W1, "0").unwrap();

    assert!(!r.relay_wheel(sid, &json!({"deltaX": 0})));
    assert!(!r.relay_wheel(sid, &json!({})));
    assert!(!r.relay_wheel(SurfaceId(999), &json!({"deltaX": 5})));
    assert!(log.borrow().ui.is_empty());
}

// =============================================================================
// TEARDOWN
// =============================================================================

#[test]
fn close_window_destroys_everything() {
    let (mut r, log) = reconciler();
    three_panels(&mut r);
    r.apply_snapshot(W2, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    let ids: Vec<SurfaceId> = ["0", "1", "2"]
        .iter()
        .filter_map(|id| r.surface_id(W1, id))
        .collect();

    assert_eq!(r.close_window(W1), 3);
    assert_eq!(r.reverse_len(), 1);
    for sid in &ids {
        assert!(r.owner_of(*sid).is_none());
        assert!(log.borrow().calls.contains(&Call::Close(*sid)));
    }

    let before = log.borrow().calls.len();
    r.reload(W1, "0");
    r.reload(W1, "2");
    assert_eq!(log.borrow().calls.len(), before);
    assert!(!r.relay_wheel(ids[0], &json!({"deltaX": 3})));
}

#[test]
fn close_all_empties_every_scope() {
    let (mut r, _log) = reconciler();
    three_panels(&mut r);
    r.apply_snapshot(W2, &json!([item("0", "https://a/", 0.0, 0.0, 1.0, 1.0)]));
    r.close_all();
    assert_eq!(r.surface_count(), 0);
    assert_eq!(r.reverse_len(), 0);
    assert!(r.windows().is_empty());
    assert_eq!(r.close_window(W1), 0);
}
