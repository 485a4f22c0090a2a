//! Collaborator seams between the core and whatever hosts the page.
//!
//! Everything here runs on a single UI event loop, so the traits take `&self`
//! and implementations are expected to use interior mutability. Callbacks are
//! reference-counted closures and are never sent across threads.

use serde::Serialize;
use std::rc::Rc;
use std::time::Duration;

/// Callback registered with a [`Viewport`] or [`Scheduler`].
pub type Callback = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportEvent {
    Scroll,
    Resize,
}

/// Handle returned by [`Viewport::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Handle returned by [`Scheduler::schedule_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// An identified element in the document and where its top edge sits inside
/// the scrollable content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    pub id: String,
    pub top: f32,
}

impl Anchor {
    pub fn new(id: impl Into<String>, top: f32) -> Self {
        Self { id: id.into(), top }
    }
}

pub trait Viewport {
    /// Current vertical scroll position. May be slightly negative on hosts
    /// that report overscroll.
    fn scroll_offset(&self) -> f32;

    fn viewport_height(&self) -> f32;

    fn subscribe(&self, event: ViewportEvent, listener: Callback) -> ListenerId;

    /// Returns `false` when the id was not registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;

    /// Fire-and-forget; duration and easing belong to the implementation.
    fn scroll_into_view(&self, anchor: &Anchor, behavior: ScrollBehavior);
}

pub trait Document {
    /// Total height of the scrollable content.
    fn content_height(&self) -> f32;

    fn element_by_id(&self, id: &str) -> Option<Anchor>;
}

pub trait Scheduler {
    fn schedule_once(&self, delay: Duration, task: Callback) -> TimerId;

    /// Returns `false` when the timer already fired or never existed.
    fn cancel(&self, id: TimerId) -> bool;
}

impl<T: Viewport + ?Sized> Viewport for Rc<T> {
    fn scroll_offset(&self) -> f32 {
        (**self).scroll_offset()
    }

    fn viewport_height(&self) -> f32 {
        (**self).viewport_height()
    }

    fn subscribe(&self, event: ViewportEvent, listener: Callback) -> ListenerId {
        (**self).subscribe(event, listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        (**self).unsubscribe(id)
    }

    fn scroll_into_view(&self, anchor: &Anchor, behavior: ScrollBehavior) {
        (**self).scroll_into_view(anchor, behavior)
    }
}

impl<T: Document + ?Sized> Document for Rc<T> {
    fn content_height(&self) -> f32 {
        (**self).content_height()
    }

    fn element_by_id(&self, id: &str) -> Option<Anchor> {
        (**self).element_by_id(id)
    }
}
