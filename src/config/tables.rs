use super::defaults;
use super::models::{AppConfig, LogLevel, ThemeMode};
use serde::Deserialize;

/// On-disk layout of `conf/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub(super) struct ConfigTables {
    #[serde(default)]
    appearance: AppearanceConfig,
    #[serde(default)]
    window: WindowConfig,
    #[serde(default)]
    progress: ProgressConfig,
    #[serde(default)]
    navigation: NavigationConfig,
    #[serde(default)]
    keys: KeysConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            theme: tables.appearance.theme,
            font_size: tables.appearance.font_size,
            heading_size: tables.appearance.heading_size,
            line_spacing: tables.appearance.line_spacing,
            content_max_width: tables.appearance.content_max_width,
            content_padding: tables.appearance.content_padding,
            window_width: tables.window.width,
            window_height: tables.window.height,
            settle_delay_ms: tables.progress.settle_delay_ms,
            show_progress: tables.progress.show_progress,
            smooth_scroll: tables.navigation.smooth_scroll,
            scroll_animation_ms: tables.navigation.scroll_animation_ms,
            log_level: tables.logging.log_level,
            key_toggle_toc: tables.keys.toggle_toc,
            key_toggle_progress: tables.keys.toggle_progress,
            key_refresh: tables.keys.refresh,
            key_quit: tables.keys.quit,
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct AppearanceConfig {
    #[serde(default)]
    theme: ThemeMode,
    #[serde(default = "defaults::default_font_size")]
    font_size: u32,
    #[serde(default = "defaults::default_heading_size")]
    heading_size: u32,
    #[serde(default = "defaults::default_line_spacing")]
    line_spacing: f32,
    #[serde(default = "defaults::default_content_max_width")]
    content_max_width: f32,
    #[serde(default = "defaults::default_content_padding")]
    content_padding: u16,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            font_size: defaults::default_font_size(),
            heading_size: defaults::default_heading_size(),
            line_spacing: defaults::default_line_spacing(),
            content_max_width: defaults::default_content_max_width(),
            content_padding: defaults::default_content_padding(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct WindowConfig {
    #[serde(default = "defaults::default_window_width")]
    width: f32,
    #[serde(default = "defaults::default_window_height")]
    height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: defaults::default_window_width(),
            height: defaults::default_window_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ProgressConfig {
    #[serde(default = "defaults::default_settle_delay_ms")]
    settle_delay_ms: u64,
    #[serde(default = "defaults::default_show_progress")]
    show_progress: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: defaults::default_settle_delay_ms(),
            show_progress: defaults::default_show_progress(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct NavigationConfig {
    #[serde(default = "defaults::default_smooth_scroll")]
    smooth_scroll: bool,
    #[serde(default = "defaults::default_scroll_animation_ms")]
    scroll_animation_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            smooth_scroll: defaults::default_smooth_scroll(),
            scroll_animation_ms: defaults::default_scroll_animation_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct KeysConfig {
    #[serde(default = "defaults::default_key_toggle_toc")]
    toggle_toc: String,
    #[serde(default = "defaults::default_key_toggle_progress")]
    toggle_progress: String,
    #[serde(default = "defaults::default_key_refresh")]
    refresh: String,
    #[serde(default = "defaults::default_key_quit")]
    quit: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            toggle_toc: defaults::default_key_toggle_toc(),
            toggle_progress: defaults::default_key_toggle_progress(),
            refresh: defaults::default_key_refresh(),
            quit: defaults::default_key_quit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::default_log_level(),
        }
    }
}
