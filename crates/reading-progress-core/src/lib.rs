//! Core of the reading progress indicator.
//!
//! - `metrics`: the clamped percentage computation.
//! - `tracker`: the event-driven progress owner and its scoped activation.
//! - `toc`: table-of-contents overlay state and anchor navigation.
//! - `viewport`: traits the host implements.
//! - `host`: in-memory implementations of those traits.

pub mod host;
pub mod metrics;
pub mod toc;
pub mod tracker;
pub mod viewport;

pub use host::{HostDocument, HostViewport, ScrollRequest, TimerQueue};
pub use metrics::{Progress, ScrollMetrics};
pub use toc::{Navigation, OverlayState, TableOfContents, TocEntry};
pub use tracker::{ActiveTracker, DEFAULT_SETTLE_DELAY, ObserverId, ProgressTracker};
pub use viewport::{
    Anchor, Callback, Document, ListenerId, ScrollBehavior, Scheduler, TimerId, Viewport,
    ViewportEvent,
};
