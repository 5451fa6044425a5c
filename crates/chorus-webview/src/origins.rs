//! Allowed-origins set shared between the reconciler and IPC handlers.
//!
//! Grows as panels navigate to parsable URLs and never shrinks during a
//! session. Pages whose origin is in the set may use the surface IPC channel.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// `scheme://host[:port]` of a URL, `None` when unparsable or opaque.
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(origin.ascii_serialization())
}

#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins {
    inner: Arc<RwLock<HashSet<String>>>,
}

impl AllowedOrigins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the origin of `url`. Returns `true` if it was new.
    pub fn record_url(&self, url: &str) -> bool {
        match origin_of(url) {
            Some(origin) => self.insert(origin),
            None => false,
        }
    }

    pub fn insert(&self, origin: String) -> bool {
        match self.inner.write() {
            Ok(mut set) => set.insert(origin),
            Err(_) => false,
        }
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.inner
            .read()
            .map(|set| set.contains(origin))
            .unwrap_or(false)
    }

    /// Whether a page at `url` belongs to an allowed origin.
    pub fn allows_url(&self, url: &str) -> bool {
        origin_of(url).is_some_and(|origin| self.contains(&origin))
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|set| set.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_strips_path_and_default_port() {
        assert_eq!(
            origin_of("https://chatgpt.com/c/123?x=1"),
            Some("https://chatgpt.com".to_string())
        );
        assert_eq!(
            origin_of("https://claude.ai:443/new"),
            Some("https://claude.ai".to_string())
        );
        assert_eq!(
            origin_of("http://localhost:3000/"),
            Some("http://localhost:3000".to_string())
        );
    }

    #[test]
    fn opaque_and_invalid_have_no_origin() {
        assert_eq!(origin_of("about:blank"), None);
        assert_eq!(origin_of("data:text/html,hi"), None);
        assert_eq!(origin_of("not a url"), None);
        assert_eq!(origin_of(""), None);
    }

    #[test]
    fn set_grows_monotonically() {
        let origins = AllowedOrigins::new();
        assert!(origins.record_url("https://gemini.google.com/app"));
        assert!(!origins.record_url("https://gemini.google.com/other"));
        assert!(!origins.record_url("::garbage::"));
        assert_eq!(origins.len(), 1);
        assert!(origins.allows_url("https://gemini.google.com/app/abc"));
        assert!(!origins.allows_url("https://accounts.google.com/"));
    }

    #[test]
    fn clones_share_state() {
        let a = AllowedOrigins::new();
        let b = a.clone();
        a.record_url("https://claude.ai");
        assert!(b.contains("https://claude.ai"));
        assert_eq!(b.len(), 1);
    }
}
