//! Estimated page geometry.
//!
//! iced does not report where individual widgets land inside a scrollable, so
//! section tops are estimated from text line weights and then scaled so the
//! estimated total agrees with the measured content height.

use super::state::{HEADING_LINE_HEIGHT, PARAGRAPH_SPACING_PX, SECTION_SPACING_PX};
use crate::config::AppConfig;
use crate::document::LoadedDocument;
use reading_progress_core::Anchor;

#[derive(Debug, Clone, Default)]
pub(crate) struct PageGeometry {
    /// Estimated top of each section, in document order.
    pub(crate) tops: Vec<(String, f32)>,
    pub(crate) content_height: f32,
}

impl PageGeometry {
    pub(crate) fn estimate(
        document: &LoadedDocument,
        config: &AppConfig,
        viewport_width: f32,
    ) -> Self {
        let padding = f32::from(config.content_padding);
        let column_width = (viewport_width - padding * 2.0)
            .min(config.content_max_width)
            .max(1.0);
        let body_line = config.font_size as f32 * config.line_spacing;
        let heading_line = config.heading_size as f32 * HEADING_LINE_HEIGHT;

        let mut y = padding;
        let mut tops = Vec::with_capacity(document.sections.len());
        for (idx, section) in document.sections.iter().enumerate() {
            if idx > 0 {
                y += SECTION_SPACING_PX;
            }
            tops.push((section.id.clone(), y));

            let heading_lines = estimated_lines(&section.title, config.heading_size, column_width);
            y += heading_lines * heading_line;
            for paragraph in &section.paragraphs {
                y += PARAGRAPH_SPACING_PX;
                y += estimated_lines(paragraph, config.font_size, column_width) * body_line;
            }
        }
        y += padding;

        Self {
            tops,
            content_height: y.max(1.0),
        }
    }

    /// Anchors scaled so their positions agree with `content_height`.
    pub(crate) fn anchors_for(&self, content_height: f32) -> Vec<Anchor> {
        let scale = if content_height.is_finite() && content_height > 0.0 {
            content_height / self.content_height
        } else {
            1.0
        };
        self.tops
            .iter()
            .map(|(id, top)| Anchor::new(id.clone(), top * scale))
            .collect()
    }
}

fn estimated_lines(text: &str, font_size: u32, column_width: f32) -> f32 {
    let glyph_width = (font_size.max(1) as f32 * 0.55).max(1.0);
    let max_units_per_line = (column_width / glyph_width).max(8.0);

    let mut lines = 1.0f32;
    let mut line_units = 0.0f32;
    for word in text.split_whitespace() {
        let units = word
            .chars()
            .map(|ch| {
                if ch.is_ascii_punctuation() {
                    0.55
                } else if ch.is_ascii() {
                    1.0
                } else {
                    1.8
                }
            })
            .sum::<f32>();
        let needed = if line_units > 0.0 { units + 0.45 } else { units };
        if line_units + needed > max_units_per_line && line_units > 0.0 {
            lines += 1.0;
            line_units = units;
        } else {
            line_units += needed;
        }
    }
    lines
}
