use super::layout::PageGeometry;
use super::messages::Message;
use crate::config::AppConfig;
use crate::document::LoadedDocument;
use iced::Task;
use iced::widget::scrollable::Id as ScrollId;
use once_cell::sync::Lazy;
use reading_progress_core::{
    ActiveTracker, Document, HostDocument, HostViewport, ProgressTracker, TableOfContents,
    TimerQueue, Viewport,
};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Page layout constants shared by the view and the geometry estimate.
pub(crate) const SECTION_SPACING_PX: f32 = 48.0;
pub(crate) const PARAGRAPH_SPACING_PX: f32 = 16.0;
pub(crate) const HEADING_LINE_HEIGHT: f32 = 1.3;
pub(crate) const INDICATOR_BOTTOM_OFFSET_PX: u16 = 20;
pub(crate) const TOC_PANEL_WIDTH_PX: f32 = 256.0;
pub(crate) static PAGE_SCROLL_ID: Lazy<ScrollId> = Lazy::new(|| ScrollId::new("page-scroll"));

/// In-flight smooth scroll toward a navigation target.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScrollAnimation {
    pub(crate) from: f32,
    pub(crate) to: f32,
    pub(crate) started_at: Instant,
    pub(crate) duration: Duration,
    /// Last offset this animation applied, used to notice user takeover.
    pub(crate) last_applied: f32,
}

impl ScrollAnimation {
    /// Ease-out cubic position at `now`, plus whether the animation is done.
    pub(crate) fn sample(&self, now: Instant) -> (f32, bool) {
        if self.duration.is_zero() {
            return (self.to, true);
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        (self.from + (self.to - self.from) * eased, t >= 1.0)
    }
}

/// Core application state.
pub struct App {
    pub(super) config: AppConfig,
    pub(super) document: LoadedDocument,
    pub(super) viewport: Rc<HostViewport>,
    pub(super) page: Rc<HostDocument>,
    pub(super) timers: Rc<TimerQueue>,
    pub(super) tracker: ProgressTracker,
    pub(super) tracking: Option<ActiveTracker>,
    pub(super) toc: TableOfContents,
    pub(super) geometry: PageGeometry,
    pub(super) viewport_width: f32,
    pub(super) measured_content_height: Option<f32>,
    pub(super) animation: Option<ScrollAnimation>,
    pub(super) last_tick: Option<Instant>,
}

impl App {
    pub(super) fn bootstrap(document: LoadedDocument, config: AppConfig) -> (App, Task<Message>) {
        let config = config.sanitized();
        let geometry = PageGeometry::estimate(&document, &config, config.window_width);
        let viewport = Rc::new(HostViewport::new(config.window_height));
        let page = Rc::new(HostDocument::new(geometry.content_height));
        page.set_anchors(geometry.anchors_for(geometry.content_height));

        let tracker = ProgressTracker::new();
        tracker.observe(|progress| debug!(percent = progress.percent(), "Progress label updated"));

        let mut app = App {
            toc: TableOfContents::new(document.outline.iter().cloned()),
            viewport_width: config.window_width,
            config,
            document,
            viewport,
            page,
            timers: Rc::new(TimerQueue::new()),
            tracker,
            tracking: None,
            geometry,
            measured_content_height: None,
            animation: None,
            last_tick: None,
        };

        if app.config.show_progress {
            app.mount_indicator();
        }
        info!(
            title = %app.document.title,
            sections = app.document.sections.len(),
            toc_entries = app.toc.entries().len(),
            estimated_height = app.geometry.content_height,
            "Initialized app state"
        );

        (app, Task::none())
    }

    /// Starts tracking; a no-op when already mounted.
    pub(super) fn mount_indicator(&mut self) {
        if self.tracking.is_some() {
            return;
        }
        let guard = self.tracker.activate(
            &self.viewport,
            &self.page,
            &self.timers,
            self.config.settle_delay(),
        );
        self.tracking = Some(guard);
        self.last_tick.get_or_insert_with(Instant::now);
    }

    /// Drops the tracking guard, releasing its listeners. The next mount
    /// starts from a closed index at 0%.
    pub(super) fn unmount_indicator(&mut self) {
        if let Some(guard) = self.tracking.take() {
            guard.deactivate();
        }
        self.tracker.reset();
        self.toc.close();
    }

    pub(super) fn indicator_mounted(&self) -> bool {
        self.tracking.is_some()
    }

    /// Re-estimates section positions for the current width and pushes them
    /// to the page, scaled to the best known content height.
    pub(super) fn refresh_geometry(&mut self) {
        let previous_estimate = self.geometry.content_height;
        self.geometry = PageGeometry::estimate(&self.document, &self.config, self.viewport_width);
        let content_height = match self.measured_content_height {
            Some(measured) if previous_estimate > 0.0 => {
                // Keep the last measured/estimated ratio until a fresh measurement lands.
                self.geometry.content_height * (measured / previous_estimate)
            }
            _ => self.geometry.content_height,
        };
        self.apply_content_height(content_height);
    }

    pub(super) fn apply_content_height(&mut self, content_height: f32) {
        self.page.set_content_height(content_height);
        self.page.set_anchors(self.geometry.anchors_for(content_height));
    }

    pub(super) fn title(&self) -> String {
        self.document.title.clone()
    }

    pub(super) fn max_scroll_offset(&self) -> f32 {
        (self.page.content_height() - self.viewport.viewport_height()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_eases_out_and_finishes() {
        let started_at = Instant::now();
        let animation = ScrollAnimation {
            from: 0.0,
            to: 1_000.0,
            started_at,
            duration: Duration::from_millis(400),
            last_applied: 0.0,
        };

        let (early, done_early) = animation.sample(started_at + Duration::from_millis(100));
        let (late, done_late) = animation.sample(started_at + Duration::from_millis(500));

        // Ease-out covers more than a linear quarter in the first quarter.
        assert!(early > 250.0 && early < 1_000.0);
        assert!(!done_early);
        assert_eq!(late, 1_000.0);
        assert!(done_late);
    }

    #[test]
    fn zero_duration_animation_jumps() {
        let animation = ScrollAnimation {
            from: 10.0,
            to: 20.0,
            started_at: Instant::now(),
            duration: Duration::ZERO,
            last_applied: 10.0,
        };
        assert_eq!(animation.sample(Instant::now()), (20.0, true));
    }
}
