use super::super::state::App;
use super::Effect;
use reading_progress_core::{ScrollBehavior, Viewport};
use std::time::Instant;
use tracing::{debug, trace};

/// Offsets further than this from what the animation applied mean the user
/// grabbed the scrollbar mid-flight.
const USER_TAKEOVER_TOLERANCE_PX: f32 = 2.0;

impl App {
    pub(super) fn handle_scrolled(
        &mut self,
        offset_y: f32,
        viewport_width: f32,
        viewport_height: f32,
        content_height: f32,
    ) {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        // Negative overscroll is passed through; the tracker clamps it.
        let offset = if offset_y.is_finite() { offset_y } else { 0.0 };
        let viewport_width = sanitize(viewport_width);
        let viewport_height = sanitize(viewport_height);
        let content_height = sanitize(content_height);

        if let Some(animation) = self.animation {
            if (offset - animation.last_applied).abs() > USER_TAKEOVER_TOLERANCE_PX {
                debug!(offset, target = animation.to, "User scroll interrupted navigation");
                self.animation = None;
            }
        }

        let width_changed = viewport_width > 0.0 && (viewport_width - self.viewport_width).abs() >= 1.0;
        if width_changed {
            self.viewport_width = viewport_width;
        }

        let content_changed = content_height > 0.0
            && self
                .measured_content_height
                .is_none_or(|measured| (measured - content_height).abs() >= 0.5);
        if content_changed {
            self.measured_content_height = Some(content_height);
            if width_changed {
                self.geometry = super::super::layout::PageGeometry::estimate(
                    &self.document,
                    &self.config,
                    self.viewport_width,
                );
            }
            debug!(content_height, "Measured content height");
            self.apply_content_height(content_height);
        } else if width_changed {
            self.refresh_geometry();
        }

        let height_changed = viewport_height > 0.0
            && (viewport_height - self.viewport.viewport_height()).abs() >= 0.5;
        if height_changed {
            self.viewport.set_offset_silently(offset);
            self.viewport.resize(viewport_height);
        } else {
            self.viewport.scroll_to(offset);
        }
    }

    pub(super) fn handle_window_resized(&mut self, width: f32, height: f32) {
        if !width.is_finite() || !height.is_finite() {
            return;
        }
        let width = width.clamp(320.0, 7680.0);
        let height = height.clamp(240.0, 4320.0);

        if (self.viewport_width - width).abs() >= 1.0 {
            self.viewport_width = width;
            self.refresh_geometry();
        }
        debug!(width, height, "Window size changed");
        self.viewport.resize(height);
    }

    pub(super) fn handle_tick(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let elapsed = self
            .last_tick
            .map(|previous| now.saturating_duration_since(previous))
            .unwrap_or_default();
        self.last_tick = Some(now);

        let fired = self.timers.advance(elapsed);
        if fired > 0 {
            trace!(fired, "Timers fired on tick");
        }

        if let Some(mut animation) = self.animation {
            let (offset, done) = animation.sample(now);
            animation.last_applied = offset;
            self.animation = if done { None } else { Some(animation) };
            effects.push(Effect::ScrollTo(offset));
        }

        if !self.needs_ticks() {
            self.last_tick = None;
        }
    }

    /// Turns scroll-into-view requests queued on the viewport into effects.
    pub(super) fn drain_scroll_requests(&mut self, effects: &mut Vec<Effect>) {
        for request in self.viewport.take_scroll_requests() {
            let target = request.anchor.top.clamp(0.0, self.max_scroll_offset());
            let effect = match request.behavior {
                ScrollBehavior::Smooth if self.config.smooth_scroll => {
                    Effect::AnimateScrollTo(target)
                }
                _ => Effect::ScrollTo(target),
            };
            debug!(id = %request.anchor.id, target, ?effect, "Scheduling scroll");
            effects.push(effect);
        }
    }

    pub(super) fn start_scroll_animation(&mut self, target: f32) {
        let from = self.viewport.scroll_offset().max(0.0);
        let duration = self.config.scroll_animation();
        // A newer request replaces whatever animation is in flight.
        self.animation = Some(super::super::state::ScrollAnimation {
            from,
            to: target,
            started_at: Instant::now(),
            duration,
            last_applied: from,
        });
        self.last_tick.get_or_insert_with(Instant::now);
        debug!(from, to = target, duration_ms = duration.as_millis() as u64, "Scroll animation started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::document::LoadedDocument;
    use std::time::Duration;

    fn build_test_app() -> App {
        let (mut app, _task) = App::bootstrap(LoadedDocument::sample(), AppConfig::default());
        app.viewport.resize(600.0);
        app.apply_content_height(3_000.0);
        app.measured_content_height = Some(3_000.0);
        app
    }

    #[test]
    fn targets_past_the_end_are_clamped() {
        let mut app = build_test_app();
        app.apply_content_height(700.0);
        app.viewport.scroll_into_view(
            &reading_progress_core::Anchor::new("color", 5_000.0),
            ScrollBehavior::Instant,
        );

        let mut effects = Vec::new();
        app.drain_scroll_requests(&mut effects);
        assert_eq!(effects, vec![Effect::ScrollTo(100.0)]);
    }

    #[test]
    fn animation_steps_toward_target_and_stops() {
        let mut app = build_test_app();
        app.start_scroll_animation(1_000.0);
        let started_at = app
            .animation
            .map(|animation| animation.started_at)
            .unwrap_or_else(Instant::now);

        let mut effects = Vec::new();
        app.handle_tick(started_at + Duration::from_millis(100), &mut effects);
        let Some(Effect::ScrollTo(first)) = effects.first().cloned() else {
            panic!("expected a scroll step, got {effects:?}");
        };
        assert!(first > 0.0 && first < 1_000.0);
        assert!(app.animation.is_some());

        effects.clear();
        app.handle_tick(started_at + Duration::from_secs(2), &mut effects);
        assert_eq!(effects, vec![Effect::ScrollTo(1_000.0)]);
        assert!(app.animation.is_none());
    }

    #[test]
    fn user_scroll_cancels_animation() {
        let mut app = build_test_app();
        app.start_scroll_animation(2_000.0);

        app.handle_scrolled(900.0, 1_024.0, 600.0, 3_000.0);
        assert!(app.animation.is_none());
        assert_eq!(app.tracker.progress().percent(), 38);
    }

    #[test]
    fn new_navigation_replaces_in_flight_animation() {
        let mut app = build_test_app();
        app.start_scroll_animation(2_000.0);
        app.start_scroll_animation(300.0);
        assert_eq!(app.animation.map(|animation| animation.to), Some(300.0));
    }

    #[test]
    fn measured_height_moves_anchors() {
        let mut app = build_test_app();
        let before = reading_progress_core::Document::element_by_id(&*app.page, "spacing")
            .map(|anchor| anchor.top)
            .unwrap_or_default();

        app.handle_scrolled(0.0, 1_024.0, 600.0, 6_000.0);
        let after = reading_progress_core::Document::element_by_id(&*app.page, "spacing")
            .map(|anchor| anchor.top)
            .unwrap_or_default();

        assert!((after - before * 2.0).abs() < 1.0);
        assert_eq!(app.measured_content_height, Some(6_000.0));
    }
}
