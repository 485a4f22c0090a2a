//! Event-driven reading progress.
//!
//! [`ProgressTracker`] owns the current [`Progress`] value and an observer
//! list. [`ProgressTracker::activate`] wires it to a viewport and returns an
//! [`ActiveTracker`] guard; the viewport listeners and the pending settle
//! recompute live exactly as long as that guard.

use crate::metrics::{Progress, ScrollMetrics};
use crate::viewport::{
    Callback, Document, ListenerId, Scheduler, TimerId, Viewport, ViewportEvent,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Delay before the one-off recompute that catches late layout changes.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Rc<dyn Fn(Progress)>;

#[derive(Default)]
struct Shared {
    progress: Cell<Progress>,
    observers: RefCell<Vec<(ObserverId, Observer)>>,
    next_observer: Cell<u64>,
}

impl Shared {
    fn store(&self, next: Progress) {
        let previous = self.progress.replace(next);
        if previous == next {
            return;
        }
        debug!(
            from = previous.percent(),
            to = next.percent(),
            "Reading progress changed"
        );
        // Observers may register or drop observers while being notified.
        let observers: Vec<Observer> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer(next);
        }
    }
}

/// Owner of the reading progress value.
///
/// Cloning yields another handle to the same state.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    shared: Rc<Shared>,
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("progress", &self.shared.progress.get())
            .field("observers", &self.shared.observers.borrow().len())
            .finish()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> Progress {
        self.shared.progress.get()
    }

    /// Registers a callback invoked whenever the stored value changes.
    pub fn observe(&self, observer: impl Fn(Progress) + 'static) -> ObserverId {
        let id = ObserverId(self.shared.next_observer.get());
        self.shared.next_observer.set(id.0 + 1);
        self.shared
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));
        id
    }

    /// Drops the stored value back to [`Progress::START`], notifying
    /// observers if it was anything else.
    pub fn reset(&self) {
        self.shared.store(Progress::START);
    }

    pub fn unobserve(&self, id: ObserverId) -> bool {
        let mut observers = self.shared.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Subscribes to scroll and resize notifications and schedules one
    /// deferred recompute after `settle_delay`.
    ///
    /// Collaborators are held weakly, so the guard never keeps the page alive.
    pub fn activate<V, D, S>(
        &self,
        viewport: &Rc<V>,
        document: &Rc<D>,
        scheduler: &Rc<S>,
        settle_delay: Duration,
    ) -> ActiveTracker
    where
        V: Viewport + 'static,
        D: Document + 'static,
        S: Scheduler + 'static,
    {
        let alive = Rc::new(Cell::new(true));

        let recompute: Callback = {
            let shared = Rc::downgrade(&self.shared);
            let viewport = Rc::downgrade(viewport);
            let document = Rc::downgrade(document);
            let alive = Rc::clone(&alive);
            Rc::new(move || {
                if !alive.get() {
                    return;
                }
                let (Some(shared), Some(viewport), Some(document)) =
                    (shared.upgrade(), viewport.upgrade(), document.upgrade())
                else {
                    return;
                };
                let metrics = ScrollMetrics::new(
                    viewport.scroll_offset(),
                    viewport.viewport_height(),
                    document.content_height(),
                );
                let progress = metrics.progress();
                trace!(
                    offset = metrics.scroll_offset,
                    viewport_height = metrics.viewport_height,
                    document_height = metrics.document_height,
                    percent = progress.percent(),
                    "Recomputed reading progress"
                );
                shared.store(progress);
            })
        };

        let scroll = viewport.subscribe(ViewportEvent::Scroll, Rc::clone(&recompute));
        let resize = viewport.subscribe(ViewportEvent::Resize, Rc::clone(&recompute));
        let settle_timer = scheduler.schedule_once(settle_delay, Rc::clone(&recompute));
        info!(
            settle_delay_ms = settle_delay.as_millis() as u64,
            "Progress tracking activated"
        );

        let teardown: Box<dyn FnOnce()> = {
            let viewport = Rc::downgrade(viewport);
            let scheduler = Rc::downgrade(scheduler);
            let alive = Rc::clone(&alive);
            Box::new(move || {
                alive.set(false);
                let removed = viewport
                    .upgrade()
                    .map(|viewport| {
                        usize::from(viewport.unsubscribe(scroll))
                            + usize::from(viewport.unsubscribe(resize))
                    })
                    .unwrap_or(0);
                let settle_cancelled = scheduler
                    .upgrade()
                    .map(|scheduler| scheduler.cancel(settle_timer))
                    .unwrap_or(false);
                info!(removed, settle_cancelled, "Progress tracking deactivated");
            })
        };

        ActiveTracker {
            recompute,
            teardown: Some(teardown),
            listeners: [scroll, resize],
            settle_timer,
        }
    }
}

/// Scoped registration produced by [`ProgressTracker::activate`].
///
/// Dropping the guard removes both listeners and cancels the settle recompute
/// if it is still pending. Teardown runs once.
#[must_use = "dropping the guard immediately stops progress tracking"]
pub struct ActiveTracker {
    recompute: Callback,
    teardown: Option<Box<dyn FnOnce()>>,
    listeners: [ListenerId; 2],
    settle_timer: TimerId,
}

impl fmt::Debug for ActiveTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveTracker")
            .field("listeners", &self.listeners)
            .field("settle_timer", &self.settle_timer)
            .field("active", &self.teardown.is_some())
            .finish()
    }
}

impl ActiveTracker {
    /// Recomputes immediately from the current metrics.
    pub fn refresh(&self) {
        (self.recompute)();
    }

    pub fn listeners(&self) -> [ListenerId; 2] {
        self.listeners
    }

    pub fn settle_timer(&self) -> TimerId {
        self.settle_timer
    }

    pub fn deactivate(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for ActiveTracker {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostDocument, HostViewport, TimerQueue};

    struct Page {
        viewport: Rc<HostViewport>,
        document: Rc<HostDocument>,
        timers: Rc<TimerQueue>,
    }

    fn page(viewport_height: f32, document_height: f32) -> Page {
        Page {
            viewport: Rc::new(HostViewport::new(viewport_height)),
            document: Rc::new(HostDocument::new(document_height)),
            timers: Rc::new(TimerQueue::new()),
        }
    }

    fn activate(tracker: &ProgressTracker, page: &Page) -> ActiveTracker {
        tracker.activate(
            &page.viewport,
            &page.document,
            &page.timers,
            DEFAULT_SETTLE_DELAY,
        )
    }

    #[test]
    fn activation_registers_scroll_and_resize_listeners() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let guard = activate(&tracker, &page);

        assert_eq!(page.viewport.listener_count(ViewportEvent::Scroll), 1);
        assert_eq!(page.viewport.listener_count(ViewportEvent::Resize), 1);
        assert_eq!(page.timers.pending(), 1);
        drop(guard);
    }

    #[test]
    fn scroll_events_update_progress() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let _guard = activate(&tracker, &page);

        page.viewport.scroll_to(1_000.0);
        assert_eq!(tracker.progress().percent(), 50);

        page.viewport.scroll_to(5_000.0);
        assert_eq!(tracker.progress(), Progress::END);
    }

    #[test]
    fn resize_recomputes_against_new_viewport() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let _guard = activate(&tracker, &page);

        page.viewport.scroll_to(1_000.0);
        assert_eq!(tracker.progress().percent(), 50);

        page.viewport.resize(1_800.0);
        assert_eq!(tracker.progress(), Progress::END);
    }

    #[test]
    fn settle_recompute_catches_late_layout() {
        let page = page(800.0, 800.0);
        let tracker = ProgressTracker::new();
        let _guard = activate(&tracker, &page);

        page.viewport.scroll_to(0.0);
        // Layout grows without any viewport event; only the deferred recompute sees it.
        page.viewport.set_offset_silently(600.0);
        page.document.set_content_height(2_000.0);
        assert_eq!(tracker.progress(), Progress::START);

        page.timers.advance(Duration::from_millis(99));
        assert_eq!(tracker.progress(), Progress::START);
        page.timers.advance(Duration::from_millis(1));
        assert_eq!(tracker.progress().percent(), 50);
        assert_eq!(page.timers.pending(), 0);
    }

    #[test]
    fn observers_fire_only_on_change() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        tracker.observe(move |progress| sink.borrow_mut().push(progress.percent()));
        let _guard = activate(&tracker, &page);

        page.viewport.scroll_to(1_000.0);
        page.viewport.scroll_to(1_001.0);
        page.viewport.scroll_to(2_000.0);

        assert_eq!(*seen.borrow(), vec![50, 100]);
    }

    #[test]
    fn unobserve_stops_notifications() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let hits = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&hits);
        let id = tracker.observe(move |_| counter.set(counter.get() + 1));
        let _guard = activate(&tracker, &page);

        page.viewport.scroll_to(400.0);
        assert!(tracker.unobserve(id));
        assert!(!tracker.unobserve(id));
        page.viewport.scroll_to(800.0);

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn deactivation_stops_updates_and_releases_listeners() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let guard = activate(&tracker, &page);

        page.viewport.scroll_to(1_000.0);
        assert_eq!(tracker.progress().percent(), 50);

        guard.deactivate();
        assert_eq!(page.viewport.listener_count(ViewportEvent::Scroll), 0);
        assert_eq!(page.viewport.listener_count(ViewportEvent::Resize), 0);
        assert_eq!(page.timers.pending(), 0);

        page.viewport.scroll_to(2_000.0);
        page.viewport.resize(400.0);
        page.timers.advance(Duration::from_secs(1));
        assert_eq!(tracker.progress().percent(), 50);
    }

    #[test]
    fn teardown_releases_the_reported_ids() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let guard = activate(&tracker, &page);
        let [scroll, resize] = guard.listeners();
        let timer = guard.settle_timer();
        assert_ne!(scroll, resize);

        drop(guard);
        assert!(!page.viewport.unsubscribe(scroll));
        assert!(!page.viewport.unsubscribe(resize));
        assert!(!page.timers.cancel(timer));
    }

    #[test]
    fn reset_returns_to_start_and_notifies() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        tracker.observe(move |progress| sink.borrow_mut().push(progress.percent()));

        let guard = activate(&tracker, &page);
        page.viewport.scroll_to(1_000.0);
        guard.deactivate();
        tracker.reset();
        tracker.reset();

        assert_eq!(tracker.progress(), Progress::START);
        assert_eq!(*seen.borrow(), vec![50, 0]);
    }

    #[test]
    fn dropping_guard_before_settle_cancels_the_timer() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        page.viewport.set_offset_silently(1_000.0);
        {
            let _guard = activate(&tracker, &page);
        }
        page.timers.advance(Duration::from_secs(1));
        assert_eq!(tracker.progress(), Progress::START);
    }

    #[test]
    fn teardown_leaves_foreign_listeners_alone() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let foreign_hits = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&foreign_hits);
        page.viewport.subscribe(
            ViewportEvent::Scroll,
            Rc::new(move || counter.set(counter.get() + 1)),
        );

        let guard = activate(&tracker, &page);
        assert_eq!(page.viewport.listener_count(ViewportEvent::Scroll), 2);
        drop(guard);
        assert_eq!(page.viewport.listener_count(ViewportEvent::Scroll), 1);

        page.viewport.scroll_to(10.0);
        assert_eq!(foreign_hits.get(), 1);
    }

    #[test]
    fn refresh_recomputes_on_demand() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let guard = activate(&tracker, &page);

        page.viewport.set_offset_silently(2_000.0);
        assert_eq!(tracker.progress(), Progress::START);
        guard.refresh();
        assert_eq!(tracker.progress(), Progress::END);
    }

    #[test]
    fn reactivation_after_teardown_tracks_again() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        activate(&tracker, &page).deactivate();

        let _guard = activate(&tracker, &page);
        page.viewport.scroll_to(500.0);
        assert_eq!(tracker.progress().percent(), 25);
        assert_eq!(page.viewport.listener_count(ViewportEvent::Scroll), 1);
    }

    #[test]
    fn guard_outliving_the_page_tears_down_quietly() {
        let page = page(800.0, 2_800.0);
        let tracker = ProgressTracker::new();
        let guard = activate(&tracker, &page);
        drop(page);

        guard.refresh();
        drop(guard);
        assert_eq!(tracker.progress(), Progress::START);
    }
}
