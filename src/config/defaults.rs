pub(crate) fn default_font_size() -> u32 {
    17
}

pub(crate) fn default_heading_size() -> u32 {
    26
}

pub(crate) fn default_line_spacing() -> f32 {
    1.5
}

pub(crate) fn default_content_max_width() -> f32 {
    768.0
}

pub(crate) fn default_content_padding() -> u16 {
    32
}

pub(crate) fn default_window_width() -> f32 {
    1024.0
}

pub(crate) fn default_window_height() -> f32 {
    768.0
}

pub(crate) fn default_settle_delay_ms() -> u64 {
    100
}

pub(crate) fn default_show_progress() -> bool {
    true
}

pub(crate) fn default_smooth_scroll() -> bool {
    true
}

pub(crate) fn default_scroll_animation_ms() -> u64 {
    450
}

pub(crate) fn default_log_level() -> super::models::LogLevel {
    super::models::LogLevel::Debug
}

pub(crate) fn default_key_toggle_toc() -> String {
    "i".to_string()
}

pub(crate) fn default_key_toggle_progress() -> String {
    "p".to_string()
}

pub(crate) fn default_key_refresh() -> String {
    "ctrl+r".to_string()
}

pub(crate) fn default_key_quit() -> String {
    "q".to_string()
}
