//! Panel layout for the host UI and the reporter that publishes it.
//!
//! `StripLayout` is the geometry the UI renders: a horizontally scrolling
//! row of panels with a header above each content placeholder.
//! `LayoutReporter` observes that geometry and pushes full snapshots to
//! the view reconciler, at most once per frame.

pub mod reporter;
pub mod strip;

pub use reporter::{
    FrameHandle, FrameScheduler, LayoutReporter, PanelDescriptor, PlaceholderGeometry,
    ScrollContainer, SnapshotSink,
};
pub use strip::{PanelFrame, StripLayout, StripMetrics};
