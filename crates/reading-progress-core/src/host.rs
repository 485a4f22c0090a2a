//! In-memory collaborators for a single-threaded event loop.
//!
//! A host (the desktop shell, or a test) feeds measured geometry into these
//! types; they dispatch listener callbacks, queue scroll requests for the host
//! to act on, and fire timers when the host advances the clock.

use crate::viewport::{
    Anchor, Callback, Document, ListenerId, ScrollBehavior, Scheduler, TimerId, Viewport,
    ViewportEvent,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, trace};

/// A scroll-into-view request waiting for the host to perform it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRequest {
    pub anchor: Anchor,
    pub behavior: ScrollBehavior,
}

struct Registration {
    id: ListenerId,
    event: ViewportEvent,
    listener: Callback,
}

pub struct HostViewport {
    offset: Cell<f32>,
    height: Cell<f32>,
    listeners: RefCell<Vec<Registration>>,
    next_listener: Cell<u64>,
    requests: RefCell<VecDeque<ScrollRequest>>,
}

impl HostViewport {
    pub fn new(height: f32) -> Self {
        Self {
            offset: Cell::new(0.0),
            height: Cell::new(height),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            requests: RefCell::new(VecDeque::new()),
        }
    }

    /// Records a new scroll position and notifies scroll listeners.
    pub fn scroll_to(&self, offset: f32) {
        self.offset.set(offset);
        self.dispatch(ViewportEvent::Scroll);
    }

    /// Records a new viewport height and notifies resize listeners.
    pub fn resize(&self, height: f32) {
        self.height.set(height);
        self.dispatch(ViewportEvent::Resize);
    }

    /// Updates the offset without notifying anyone, e.g. when mirroring a
    /// position the host applied itself.
    pub fn set_offset_silently(&self, offset: f32) {
        self.offset.set(offset);
    }

    pub fn listener_count(&self, event: ViewportEvent) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|registration| registration.event == event)
            .count()
    }

    /// Drains queued scroll requests in the order they were issued.
    pub fn take_scroll_requests(&self) -> Vec<ScrollRequest> {
        self.requests.borrow_mut().drain(..).collect()
    }

    pub fn has_scroll_requests(&self) -> bool {
        !self.requests.borrow().is_empty()
    }

    fn dispatch(&self, event: ViewportEvent) {
        // Snapshot first so listeners may unsubscribe while being called.
        let listeners: Vec<Callback> = self
            .listeners
            .borrow()
            .iter()
            .filter(|registration| registration.event == event)
            .map(|registration| Callback::clone(&registration.listener))
            .collect();
        trace!(?event, listeners = listeners.len(), "Dispatching viewport event");
        for listener in listeners {
            listener();
        }
    }
}

impl Viewport for HostViewport {
    fn scroll_offset(&self) -> f32 {
        self.offset.get()
    }

    fn viewport_height(&self) -> f32 {
        self.height.get()
    }

    fn subscribe(&self, event: ViewportEvent, listener: Callback) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(Registration {
            id,
            event,
            listener,
        });
        debug!(?event, id = id.0, "Viewport listener added");
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(position) = listeners
            .iter()
            .position(|registration| registration.id == id)
        else {
            return false;
        };
        let removed = listeners.remove(position);
        debug!(event = ?removed.event, id = id.0, "Viewport listener removed");
        true
    }

    fn scroll_into_view(&self, anchor: &Anchor, behavior: ScrollBehavior) {
        debug!(id = %anchor.id, top = anchor.top, ?behavior, "Scroll into view requested");
        self.requests.borrow_mut().push_back(ScrollRequest {
            anchor: anchor.clone(),
            behavior,
        });
    }
}

/// Content height plus the positions of identified elements.
pub struct HostDocument {
    height: Cell<f32>,
    anchors: RefCell<Vec<Anchor>>,
}

impl HostDocument {
    pub fn new(height: f32) -> Self {
        Self {
            height: Cell::new(height),
            anchors: RefCell::new(Vec::new()),
        }
    }

    pub fn set_content_height(&self, height: f32) {
        self.height.set(height);
    }

    /// Replaces all anchors; later duplicates of an id are ignored on lookup.
    pub fn set_anchors(&self, anchors: Vec<Anchor>) {
        *self.anchors.borrow_mut() = anchors;
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.borrow().len()
    }
}

impl Document for HostDocument {
    fn content_height(&self) -> f32 {
        self.height.get()
    }

    fn element_by_id(&self, id: &str) -> Option<Anchor> {
        self.anchors
            .borrow()
            .iter()
            .find(|anchor| anchor.id == id)
            .cloned()
    }
}

struct PendingTimer {
    id: TimerId,
    deadline: Duration,
    task: Callback,
}

/// Manually clocked one-shot timers.
///
/// The host calls [`TimerQueue::advance`] from its tick; timers whose deadline
/// has passed fire in deadline order.
pub struct TimerQueue {
    clock: Cell<Duration>,
    pending: RefCell<Vec<PendingTimer>>,
    next_timer: Cell<u64>,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            clock: Cell::new(Duration::ZERO),
            pending: RefCell::new(Vec::new()),
            next_timer: Cell::new(0),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn advance(&self, elapsed: Duration) -> usize {
        let now = self.clock.get().saturating_add(elapsed);
        self.clock.set(now);

        let mut due: Vec<PendingTimer> = Vec::new();
        self.pending.borrow_mut().retain(|timer| {
            if timer.deadline <= now {
                due.push(PendingTimer {
                    id: timer.id,
                    deadline: timer.deadline,
                    task: Callback::clone(&timer.task),
                });
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| (timer.deadline, timer.id));

        for timer in &due {
            trace!(id = timer.id.0, "Timer fired");
            (timer.task)();
        }
        due.len()
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&self, delay: Duration, task: Callback) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        let deadline = self.clock.get().saturating_add(delay);
        self.pending.borrow_mut().push(PendingTimer { id, deadline, task });
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|timer| timer.id != id);
        pending.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn listeners_only_hear_their_event() {
        let viewport = HostViewport::new(600.0);
        let scrolls = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&scrolls);
        viewport.subscribe(
            ViewportEvent::Scroll,
            Rc::new(move || counter.set(counter.get() + 1)),
        );

        viewport.scroll_to(12.0);
        viewport.resize(700.0);

        assert_eq!(scrolls.get(), 1);
        assert_eq!(viewport.scroll_offset(), 12.0);
        assert_eq!(viewport.viewport_height(), 700.0);
    }

    #[test]
    fn unsubscribe_is_exact_and_once() {
        let viewport = HostViewport::new(600.0);
        let first = viewport.subscribe(ViewportEvent::Resize, Rc::new(|| {}));
        let second = viewport.subscribe(ViewportEvent::Resize, Rc::new(|| {}));

        assert!(viewport.unsubscribe(first));
        assert!(!viewport.unsubscribe(first));
        assert_eq!(viewport.listener_count(ViewportEvent::Resize), 1);
        assert!(viewport.unsubscribe(second));
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_dispatch() {
        let viewport = Rc::new(HostViewport::new(600.0));
        let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let handle = Rc::downgrade(&viewport);
        let own_id = Rc::clone(&slot);
        let id = viewport.subscribe(
            ViewportEvent::Scroll,
            Rc::new(move || {
                if let (Some(viewport), Some(id)) = (handle.upgrade(), own_id.get()) {
                    viewport.unsubscribe(id);
                }
            }),
        );
        slot.set(Some(id));

        viewport.scroll_to(1.0);
        assert_eq!(viewport.listener_count(ViewportEvent::Scroll), 0);
    }

    #[test]
    fn scroll_requests_drain_in_order() {
        let viewport = HostViewport::new(600.0);
        viewport.scroll_into_view(&Anchor::new("a", 10.0), ScrollBehavior::Smooth);
        viewport.scroll_into_view(&Anchor::new("b", 20.0), ScrollBehavior::Instant);

        let requests = viewport.take_scroll_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].anchor.id, "a");
        assert_eq!(requests[1].behavior, ScrollBehavior::Instant);
        assert!(!viewport.has_scroll_requests());
    }

    #[test]
    fn document_lookup_returns_first_match() {
        let document = HostDocument::new(1_000.0);
        document.set_anchors(vec![
            Anchor::new("intro", 0.0),
            Anchor::new("typography", 480.0),
            Anchor::new("typography", 900.0),
        ]);
        assert_eq!(document.anchor_count(), 3);

        assert_eq!(
            document.element_by_id("typography"),
            Some(Anchor::new("typography", 480.0))
        );
        assert_eq!(document.element_by_id("missing"), None);
    }

    #[test]
    fn timers_fire_in_deadline_order_and_only_once() {
        let timers = TimerQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (label, delay) in [("late", 50u64), ("early", 10)] {
            let log = Rc::clone(&log);
            timers.schedule_once(
                Duration::from_millis(delay),
                Rc::new(move || log.borrow_mut().push(label)),
            );
        }

        assert_eq!(timers.advance(Duration::from_millis(5)), 0);
        assert_eq!(timers.advance(Duration::from_millis(100)), 2);
        assert_eq!(timers.advance(Duration::from_millis(100)), 0);
        assert_eq!(*log.borrow(), vec!["early", "late"]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let timers = TimerQueue::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let id = timers.schedule_once(Duration::from_millis(1), Rc::new(move || flag.set(true)));

        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        timers.advance(Duration::from_secs(1));
        assert!(!fired.get());
        assert!(timers.is_idle());
    }
}
