//! Maps the configured reading mode onto iced's built-in palettes.

use crate::config::ThemeMode;
use iced::Theme as IcedTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl From<ThemeMode> for Theme {
    fn from(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Night => Theme::Dark,
            ThemeMode::Day => Theme::Light,
        }
    }
}

impl From<Theme> for IcedTheme {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => IcedTheme::Light,
            Theme::Dark => IcedTheme::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_mode_uses_dark_palette() {
        assert_eq!(Theme::from(ThemeMode::Night), Theme::Dark);
        assert_eq!(IcedTheme::from(Theme::from(ThemeMode::Day)), IcedTheme::Light);
    }
}
