//! Embedded content surfaces for Chorus.
//!
//! - `ViewReconciler` keeps one surface per layout slot in each window,
//!   driven by full layout snapshots from the UI
//! - `WryHost` backs surfaces with `wry` child webviews
//! - Fan-out script injection for broadcasting a prompt
//! - Wheel relay from surfaces back to the owning window's UI
//! - Bundled shell content over the `chorus://` custom protocol

pub mod content;
pub mod events;
pub mod host;
pub mod ipc;
pub mod origins;
pub mod reconciler;
pub mod scripts;
pub mod surface;

pub use content::ContentProvider;
pub use events::{PageLoadState, SurfaceEvent};
pub use host::{ShellView, WryHost, WrySurface};
pub use ipc::{IpcMessage, IpcPayload};
pub use origins::AllowedOrigins;
pub use reconciler::ViewReconciler;
pub use surface::{ScriptCallback, Surface, SurfaceHost, SurfaceOptions};
