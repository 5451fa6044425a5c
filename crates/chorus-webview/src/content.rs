//! Bundled content served over the `chorus://` custom protocol.
//!
//! The shell page and its assets load from a base directory without a local
//! HTTP server.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub const CONTENT_SCHEME: &str = "chorus";

/// URL of the shell page.
pub const SHELL_URL: &str = "chorus://localhost/shell/index.html";

pub struct ContentProvider {
    base_dir: PathBuf,
}

impl ContentProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve a request path to its MIME type and bytes.
    pub fn resolve(&self, path: &str) -> Option<(Cow<'_, str>, Cow<'_, [u8]>)> {
        let clean = path.split(['?', '#']).next().unwrap_or("").trim_start_matches('/');

        let file_path = self.base_dir.join(clean);

        // Canonicalize both sides so `..` and symlinks cannot leave the base.
        let canonical_base = std::fs::canonicalize(&self.base_dir).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) || !canonical_file.is_file() {
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        Some((
            Cow::Borrowed(mime_from_extension(&canonical_file)),
            Cow::Owned(data),
        ))
    }
}

/// Strip the scheme and host from a `chorus://` request URI.
///
/// WebView2 rewrites custom schemes to `http://chorus.localhost/...`, which
/// is handled too.
pub fn request_path(uri: &str) -> &str {
    const PREFIXES: &[&str] = &[
        "chorus://localhost/",
        "chorus://localhost",
        "http://chorus.localhost/",
        "https://chorus.localhost/",
        "chorus:///",
        "chorus://",
    ];
    PREFIXES
        .iter()
        .find_map(|prefix| uri.strip_prefix(prefix))
        .unwrap_or("")
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
