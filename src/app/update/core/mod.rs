mod reducer;
mod runtime;
mod shortcuts;

use super::super::messages::Message;
use super::super::state::App;
use iced::event;
use iced::time;
use iced::{Subscription, Task};
use std::time::Duration;

/// Frame interval for the scroll animation and timer clock.
const TICK_INTERVAL: Duration = Duration::from_millis(16);
const SIGNAL_POLL_INTERVAL: Duration = Duration::from_millis(250);

impl App {
    pub fn subscription(app: &App) -> Subscription<Message> {
        let mut subscriptions: Vec<Subscription<Message>> = vec![
            event::listen_with(runtime::runtime_event_to_message),
            time::every(SIGNAL_POLL_INTERVAL).map(|_| Message::PollSystemSignals),
        ];

        if app.needs_ticks() {
            subscriptions.push(time::every(TICK_INTERVAL).map(Message::Tick));
        }

        Subscription::batch(subscriptions)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let effects = self.reduce(message);
        if effects.is_empty() {
            Task::none()
        } else {
            Task::batch(effects.into_iter().map(|effect| self.run_effect(effect)))
        }
    }

    pub(super) fn needs_ticks(&self) -> bool {
        self.animation.is_some() || !self.timers.is_idle()
    }
}
