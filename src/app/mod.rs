mod layout;
mod messages;
mod state;
mod update;
mod view;

pub use state::App;

use crate::config::AppConfig;
use crate::document::LoadedDocument;
use crate::theme::Theme;
use iced::{Size, window};

/// Opens the reader window on `document`.
pub fn run_app(document: LoadedDocument, config: AppConfig) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        ..window::Settings::default()
    };
    iced::application(App::title, App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(|app: &App| Theme::from(app.config.theme).into())
        .run_with(move || App::bootstrap(document, config))
}
