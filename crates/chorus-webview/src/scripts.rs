//! Scripts injected into panel surfaces.
//!
//! Every script is a fixed template wrapped in an IIFE. Arguments are
//! spliced in as JSON literals so page content can never break out of them.

use serde_json::Value;

/// Fill every element matching `selector` with `text`.
///
/// Inputs and textareas get their `value` set through the native setter so
/// framework-managed inputs notice the change. Any other element with a
/// `value` property gets it assigned directly. Contenteditable nodes get
/// `textContent`. Both fire bubbling `input` and `change` events. The script
/// evaluates to the number of matched elements, or `-1` if it threw.
///
/// When `submit` is `Some`, the submit step runs `delay_ms` after filling:
/// a non-empty selector clicks the first match, an empty one dispatches an
/// Enter key sequence on the focused element.
pub fn fill_inputs_script(text: &str, selector: &str, submit: Option<&str>, delay_ms: u64) -> String {
    let submit_arg = match submit {
        Some(sel) => Value::String(sel.to_string()),
        None => Value::Null,
    };
    format!(
        r#"(function(text, selector, submitSelector, delayMs) {{
  try {{
    var nodes = document.querySelectorAll(selector);
    var last = null;
    for (var i = 0; i < nodes.length; i++) {{
      var el = nodes[i];
      if (el instanceof HTMLInputElement || el instanceof HTMLTextAreaElement) {{
        var proto = el instanceof HTMLInputElement ? HTMLInputElement.prototype : HTMLTextAreaElement.prototype;
        var desc = Object.getOwnPropertyDescriptor(proto, 'value');
        if (desc && desc.set) {{ desc.set.call(el, text); }} else {{ el.value = text; }}
      }} else if ('value' in el) {{
        el.value = text;
      }} else if (el.isContentEditable) {{
        el.textContent = text;
      }} else {{
        continue;
      }}
      el.dispatchEvent(new Event('input', {{ bubbles: true }}));
      el.dispatchEvent(new Event('change', {{ bubbles: true }}));
      last = el;
    }}
    if (last && typeof last.focus === 'function') {{ last.focus(); }}
    if (submitSelector !== null) {{
      setTimeout(function() {{
        try {{
          if (submitSelector) {{
            var button = document.querySelector(submitSelector);
            if (button) {{ button.click(); return; }}
          }}
          var target = document.activeElement && document.activeElement !== document.body ? document.activeElement : last;
          if (!target) {{ return; }}
          ['keydown', 'keypress', 'keyup'].forEach(function(type) {{
            target.dispatchEvent(new KeyboardEvent(type, {{
              key: 'Enter', code: 'Enter', keyCode: 13, which: 13, bubbles: true, cancelable: true
            }}));
          }});
        }} catch (e) {{}}
      }}, delayMs);
    }}
    return nodes.length;
  }} catch (e) {{
    return -1;
  }}
}})({text}, {selector}, {submit}, {delay});"#,
        text = json_literal(text),
        selector = json_literal(selector),
        submit = submit_arg,
        delay = delay_ms,
    )
}

fn json_literal(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Parse the result of a fill script. `None` when the script threw or the
/// result was not a number.
pub fn parse_fill_result(raw: &str) -> Option<u64> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    let n = value.as_i64()?;
    u64::try_from(n).ok()
}

/// Forwards horizontal wheel gestures the page cannot consume to the host.
///
/// Mostly vertical gestures are ignored; shift+vertical counts as
/// horizontal. A gesture is skipped when an ancestor of the target or the
/// document itself can still scroll in that direction.
pub const WHEEL_BRIDGE_SCRIPT: &str = r#"
(function() {
    if (window.__chorusWheelBridge) { return; }
    window.__chorusWheelBridge = true;

    function horizontalDelta(e) {
        var dx = e.deltaX;
        var dy = e.deltaY;
        if (e.shiftKey && dx === 0 && dy !== 0) { return dy; }
        if (Math.abs(dx) < Math.abs(dy) * 0.5) { return 0; }
        return dx;
    }

    function canScroll(el, dx) {
        var style = window.getComputedStyle(el);
        var overflow = style.overflowX;
        if (overflow !== 'auto' && overflow !== 'scroll') { return false; }
        if (el.scrollWidth <= el.clientWidth) { return false; }
        if (dx < 0) { return el.scrollLeft > 0; }
        return el.scrollLeft + el.clientWidth < el.scrollWidth - 1;
    }

    function documentCanScroll(dx) {
        var root = document.scrollingElement || document.documentElement;
        if (!root || root.scrollWidth <= root.clientWidth) { return false; }
        if (dx < 0) { return root.scrollLeft > 0; }
        return root.scrollLeft + root.clientWidth < root.scrollWidth - 1;
    }

    window.addEventListener('wheel', function(e) {
        var dx = horizontalDelta(e);
        if (!dx) { return; }
        var node = e.target instanceof Element ? e.target : null;
        while (node && node !== document.body && node !== document.documentElement) {
            if (canScroll(node, dx)) { return; }
            node = node.parentElement;
        }
        if (documentCanScroll(dx)) { return; }
        if (window.ipc && typeof window.ipc.postMessage === 'function') {
            window.ipc.postMessage(JSON.stringify({ kind: 'wheel', payload: { deltaX: dx } }));
        }
    }, { passive: true, capture: true });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_are_json_escaped() {
        let js = fill_inputs_script("say \"hi\"\n</script>", "div[data-x='1']", None, 0);
        assert!(js.contains(r#""say \"hi\"\n</script>""#));
        assert!(js.contains(r#""div[data-x='1']""#));
        assert!(js.starts_with("(function(text, selector, submitSelector, delayMs)"));
    }

    #[test]
    fn any_value_bearing_element_is_filled() {
        let js = fill_inputs_script("x", "select", None, 0);
        let value_branch = js.find("'value' in el").unwrap();
        let editable_branch = js.find("el.isContentEditable").unwrap();
        assert!(value_branch < editable_branch);
        assert!(js.contains("el.value = text;"));
    }

    #[test]
    fn no_submit_passes_null() {
        let js = fill_inputs_script("x", "#p", None, 150);
        assert!(js.trim_end().ends_with(r##"("x", "#p", null, 150);"##));
    }

    #[test]
    fn submit_without_button_passes_empty_string() {
        let js = fill_inputs_script("x", "#p", Some(""), 150);
        assert!(js.trim_end().ends_with(r##"("x", "#p", "", 150);"##));
    }

    #[test]
    fn submit_with_button_selector() {
        let js = fill_inputs_script("x", "#p", Some("button[data-testid=\"send\"]"), 200);
        assert!(js.contains(r#""button[data-testid=\"send\"]", 200);"#));
        assert!(js.contains("'keydown', 'keypress', 'keyup'"));
    }

    #[test]
    fn fill_result_parsing() {
        assert_eq!(parse_fill_result("3"), Some(3));
        assert_eq!(parse_fill_result(" 0 "), Some(0));
        assert_eq!(parse_fill_result("-1"), None);
        assert_eq!(parse_fill_result("null"), None);
        assert_eq!(parse_fill_result(""), None);
    }

    #[test]
    fn wheel_bridge_posts_wheel_kind() {
        assert!(WHEEL_BRIDGE_SCRIPT.contains("kind: 'wheel'"));
        assert!(WHEEL_BRIDGE_SCRIPT.contains("deltaX: dx"));
    }
}
