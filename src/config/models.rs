use serde::Deserialize;
use std::time::Duration;

/// Limits applied when a configuration is put to use.
pub(crate) const MIN_FONT_SIZE: u32 = 10;
pub(crate) const MAX_FONT_SIZE: u32 = 40;
pub(crate) const MAX_SETTLE_DELAY_MS: u64 = 5_000;
pub(crate) const MAX_SCROLL_ANIMATION_MS: u64 = 3_000;

/// High-level app configuration; built from the TOML tables.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "crate::config::defaults::default_font_size")]
    pub font_size: u32,
    #[serde(default = "crate::config::defaults::default_heading_size")]
    pub heading_size: u32,
    #[serde(default = "crate::config::defaults::default_line_spacing")]
    pub line_spacing: f32,
    #[serde(default = "crate::config::defaults::default_content_max_width")]
    pub content_max_width: f32,
    #[serde(default = "crate::config::defaults::default_content_padding")]
    pub content_padding: u16,
    #[serde(default = "crate::config::defaults::default_window_width")]
    pub window_width: f32,
    #[serde(default = "crate::config::defaults::default_window_height")]
    pub window_height: f32,
    #[serde(default = "crate::config::defaults::default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "crate::config::defaults::default_show_progress")]
    pub show_progress: bool,
    #[serde(default = "crate::config::defaults::default_smooth_scroll")]
    pub smooth_scroll: bool,
    #[serde(default = "crate::config::defaults::default_scroll_animation_ms")]
    pub scroll_animation_ms: u64,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_key_toggle_toc")]
    pub key_toggle_toc: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_progress")]
    pub key_toggle_progress: String,
    #[serde(default = "crate::config::defaults::default_key_refresh")]
    pub key_refresh: String,
    #[serde(default = "crate::config::defaults::default_key_quit")]
    pub key_quit: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: ThemeMode::default(),
            font_size: crate::config::defaults::default_font_size(),
            heading_size: crate::config::defaults::default_heading_size(),
            line_spacing: crate::config::defaults::default_line_spacing(),
            content_max_width: crate::config::defaults::default_content_max_width(),
            content_padding: crate::config::defaults::default_content_padding(),
            window_width: crate::config::defaults::default_window_width(),
            window_height: crate::config::defaults::default_window_height(),
            settle_delay_ms: crate::config::defaults::default_settle_delay_ms(),
            show_progress: crate::config::defaults::default_show_progress(),
            smooth_scroll: crate::config::defaults::default_smooth_scroll(),
            scroll_animation_ms: crate::config::defaults::default_scroll_animation_ms(),
            log_level: crate::config::defaults::default_log_level(),
            key_toggle_toc: crate::config::defaults::default_key_toggle_toc(),
            key_toggle_progress: crate::config::defaults::default_key_toggle_progress(),
            key_refresh: crate::config::defaults::default_key_refresh(),
            key_quit: crate::config::defaults::default_key_quit(),
        }
    }
}

impl AppConfig {
    /// Pulls every numeric setting back into a range the UI can render.
    pub fn sanitized(mut self) -> Self {
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.heading_size = self.heading_size.clamp(self.font_size, MAX_FONT_SIZE * 2);
        self.line_spacing = if self.line_spacing.is_finite() {
            self.line_spacing.clamp(0.8, 3.0)
        } else {
            crate::config::defaults::default_line_spacing()
        };
        self.content_max_width = if self.content_max_width.is_finite() {
            self.content_max_width.clamp(240.0, 4_096.0)
        } else {
            crate::config::defaults::default_content_max_width()
        };
        self.content_padding = self.content_padding.min(200);
        if !self.window_width.is_finite() || self.window_width < 200.0 {
            self.window_width = crate::config::defaults::default_window_width();
        }
        if !self.window_height.is_finite() || self.window_height < 200.0 {
            self.window_height = crate::config::defaults::default_window_height();
        }
        self.settle_delay_ms = self.settle_delay_ms.min(MAX_SETTLE_DELAY_MS);
        self.scroll_animation_ms = self.scroll_animation_ms.min(MAX_SCROLL_ANIMATION_MS);
        self
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn scroll_animation(&self) -> Duration {
        Duration::from_millis(self.scroll_animation_ms)
    }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Default, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Day,
    #[default]
    Night,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Default, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
