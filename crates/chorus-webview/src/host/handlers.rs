use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use chorus_common::SurfaceId;
use tracing::{debug, warn};
use wry::http::Response;
use wry::WebViewBuilder;

use crate::content::{request_path, ContentProvider, CONTENT_SCHEME};
use crate::events::{PageLoadState, SurfaceEvent};
use crate::origins::AllowedOrigins;

// =============================================================================
// POLICY
// =============================================================================

/// URL prefixes the shell webview may navigate to.
///
/// WebView2 rewrites `chorus://localhost/...` to `http://chorus.localhost/...`.
pub const SHELL_NAV_PREFIXES: &[&str] = &[
    "chorus://",
    "http://chorus.localhost/",
    "https://chorus.localhost/",
    "about:blank",
];

pub fn is_shell_navigation_allowed(url: &str) -> bool {
    SHELL_NAV_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// Whether an IPC message from a panel page should reach the host.
///
/// The page must sit on an origin some panel navigated to, and the body
/// must be JSON.
pub(crate) fn accept_surface_ipc(origins: &AllowedOrigins, page_url: &str, body: &str) -> bool {
    origins.allows_url(page_url) && serde_json::from_str::<serde_json::Value>(body).is_ok()
}

fn push(events: &Mutex<Vec<SurfaceEvent>>, event: SurfaceEvent) {
    if let Ok(mut evts) = events.lock() {
        evts.push(event);
    }
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

pub(super) fn attach_surface_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
    origins: AllowedOrigins,
    surface: SurfaceId,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let page_url = request.uri().to_string();
        let body = request.body().to_string();
        if !accept_surface_ipc(&origins, &page_url, &body) {
            warn!(%surface, url = %page_url, body_len = body.len(), "surface IPC rejected");
            return;
        }
        push(&events, SurfaceEvent::Ipc { surface, body });
    })
}

pub(super) fn attach_shell_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
    surface: SurfaceId,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let page_url = request.uri().to_string();
        let body = request.body().to_string();
        if !is_shell_navigation_allowed(&page_url)
            || serde_json::from_str::<serde_json::Value>(&body).is_err()
        {
            warn!(%surface, url = %page_url, "shell IPC rejected");
            return;
        }
        push(&events, SurfaceEvent::Ipc { surface, body });
    })
}

pub(super) fn attach_page_load_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
    surface: SurfaceId,
) -> WebViewBuilder<'a> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(%surface, ?state, url = %url, "page load");
        push(&events, SurfaceEvent::PageLoad { surface, state, url });
    })
}

pub(super) fn attach_title_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
    surface: SurfaceId,
) -> WebViewBuilder<'a> {
    builder.with_document_title_changed_handler(move |title| {
        push(&events, SurfaceEvent::TitleChanged { surface, title });
    })
}

pub(super) fn attach_shell_navigation_handler(
    builder: WebViewBuilder<'_>,
    surface: SurfaceId,
) -> WebViewBuilder<'_> {
    builder.with_navigation_handler(move |url| {
        if !is_shell_navigation_allowed(&url) {
            warn!(%surface, url = %url, "shell navigation blocked");
            return false;
        }
        true
    })
}

pub(super) fn attach_content_protocol(
    builder: WebViewBuilder<'_>,
    provider: Arc<ContentProvider>,
) -> WebViewBuilder<'_> {
    builder.with_custom_protocol(CONTENT_SCHEME.to_string(), move |_wv_id, request| {
        let uri = request.uri().to_string();
        let path = request_path(&uri);
        match provider.resolve(path) {
            Some((mime, data)) => {
                protocol_response(200, mime.as_ref(), Cow::Owned(data.into_owned()))
            }
            None => {
                warn!(path = %path, "content protocol: asset not found");
                protocol_response(404, "text/plain", Cow::Borrowed(&b"Not Found"[..]))
            }
        }
    })
}

fn protocol_response(
    status: u16,
    mime: &str,
    body: Cow<'static, [u8]>,
) -> Response<Cow<'static, [u8]>> {
    Response::builder()
        .status(status)
        .header("Content-Type", mime)
        .header("Access-Control-Allow-Origin", "chorus://localhost")
        .body(body)
        .unwrap_or_else(|e| {
            warn!(error = %e, "content protocol: failed to build response");
            Response::new(Cow::Borrowed(&[][..]))
        })
}

// =============================================================================
// TESTS
// =============================================================================
