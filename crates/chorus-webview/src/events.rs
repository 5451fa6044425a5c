//! Surface event types.

use chorus_common::SurfaceId;
use serde::{Deserialize, Serialize};

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded.
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events emitted by surfaces, queued for the main loop.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    /// Page load state changed. Carries the URL.
    PageLoad {
        surface: SurfaceId,
        state: PageLoadState,
        url: String,
    },
    /// Document title changed.
    TitleChanged { surface: SurfaceId, title: String },
    /// An IPC message was received from the page.
    Ipc { surface: SurfaceId, body: String },
}
