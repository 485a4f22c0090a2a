use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use tracing::{debug, info};

impl App {
    pub(super) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::ToggleToc => self.handle_toggle_toc(),
            Message::NavigateTo(id) => self.handle_navigate_to(&id),
            Message::ToggleProgress => self.handle_toggle_progress(),
            Message::RefreshProgress => self.handle_refresh_progress(),
            Message::SafeQuit => effects.push(Effect::QuitSafely),
            Message::Scrolled {
                offset_y,
                viewport_width,
                viewport_height,
                content_height,
            } => self.handle_scrolled(offset_y, viewport_width, viewport_height, content_height),
            Message::WindowResized { width, height } => {
                self.handle_window_resized(width, height);
            }
            Message::KeyPressed { key, modifiers } => {
                if let Some(shortcut) = self.shortcut_message_for_key(key, modifiers) {
                    effects.extend(self.reduce(shortcut));
                }
            }
            Message::Tick(now) => self.handle_tick(now, &mut effects),
            Message::PollSystemSignals => self.handle_poll_system_signals(&mut effects),
        }

        self.drain_scroll_requests(&mut effects);
        effects
    }

    fn handle_toggle_progress(&mut self) {
        if self.indicator_mounted() {
            self.unmount_indicator();
            info!("Progress indicator hidden");
        } else {
            self.mount_indicator();
            info!("Progress indicator shown");
        }
    }

    fn handle_refresh_progress(&mut self) {
        match &self.tracking {
            Some(guard) => {
                guard.refresh();
                debug!(percent = self.tracker.progress().percent(), "Manual progress refresh");
            }
            None => debug!("Ignoring refresh while the indicator is hidden"),
        }
    }

    fn handle_poll_system_signals(&mut self, effects: &mut Vec<Effect>) {
        if crate::take_sigint_requested() {
            effects.push(Effect::QuitSafely);
        }
    }
}
