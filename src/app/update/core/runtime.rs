use super::super::super::messages::Message;
use super::super::super::state::{App, PAGE_SCROLL_ID};
use super::super::Effect;
use iced::Event;
use iced::Task;
use iced::event;
use iced::keyboard;
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::window;
use tracing::info;

impl App {
    pub(super) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::ScrollTo(offset) => self.scroll_page_to(offset),
            Effect::AnimateScrollTo(target) => {
                if !self.config.smooth_scroll || self.config.scroll_animation().is_zero() {
                    return self.scroll_page_to(target);
                }
                self.start_scroll_animation(target);
                Task::none()
            }
            Effect::QuitSafely => {
                info!("Safe quit requested; releasing progress tracking");
                self.animation = None;
                self.unmount_indicator();
                iced::exit()
            }
        }
    }

    /// Moves both the tracked viewport and the on-screen scrollable.
    fn scroll_page_to(&mut self, offset: f32) -> Task<Message> {
        let y = offset.clamp(0.0, self.max_scroll_offset());
        self.viewport.scroll_to(y);
        scrollable::scroll_to(PAGE_SCROLL_ID.clone(), AbsoluteOffset { x: 0.0, y })
    }
}

pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized {
            width: size.width,
            height: size.height,
        }),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        _ => None,
    }
}
