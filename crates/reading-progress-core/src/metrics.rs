//! Scroll metrics and the percentage they map to.

use serde::Serialize;
use std::fmt;

/// Floor for the scrollable range so the ratio never divides by zero when the
/// document is not taller than the viewport.
pub const MIN_SCROLLABLE_RANGE: f32 = 1.0;

/// Raw viewport/document measurements, read fresh for every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_offset: f32,
    pub viewport_height: f32,
    pub document_height: f32,
}

impl ScrollMetrics {
    pub fn new(scroll_offset: f32, viewport_height: f32, document_height: f32) -> Self {
        Self {
            scroll_offset,
            viewport_height,
            document_height,
        }
    }

    /// `document_height - viewport_height`, floored at [`MIN_SCROLLABLE_RANGE`].
    pub fn scrollable_range(&self) -> f32 {
        let document = finite_or_zero(self.document_height);
        let viewport = finite_or_zero(self.viewport_height);
        (document - viewport).max(MIN_SCROLLABLE_RANGE)
    }

    pub fn progress(&self) -> Progress {
        let offset = finite_or_zero(self.scroll_offset).max(0.0);
        let raw = offset / self.scrollable_range() * 100.0;
        let clamped = raw.clamp(0.0, 100.0);
        Progress(clamped.round() as u8)
    }
}

/// Whole-number reading progress, always within `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const START: Progress = Progress(0);
    pub const END: Progress = Progress(100);

    /// Saturates at 100.
    pub fn new(percent: u8) -> Self {
        Progress(percent.min(100))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self.0 == 100
    }
}

impl From<ScrollMetrics> for Progress {
    fn from(metrics: ScrollMetrics) -> Self {
        metrics.progress()
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent(offset: f32, viewport: f32, document: f32) -> u8 {
        ScrollMetrics::new(offset, viewport, document)
            .progress()
            .percent()
    }

    #[test]
    fn progress_stays_in_bounds_for_any_metrics() {
        let heights = [1.0f32, 10.0, 599.5, 600.0, 800.0, 1_000.0, 25_000.0];
        let offsets = [0.0f32, 0.4, 1.0, 199.0, 200.0, 5_000.0, 1.0e9];
        for viewport in heights {
            for document in heights {
                for offset in offsets {
                    let value = percent(offset, viewport, document);
                    assert!(
                        value <= 100,
                        "offset={offset} viewport={viewport} document={document} gave {value}"
                    );
                }
            }
        }
    }

    #[test]
    fn progress_is_monotonic_in_offset() {
        let (viewport, document) = (800.0f32, 3_200.0f32);
        let mut previous = 0u8;
        let mut offset = 0.0f32;
        while offset <= 3_000.0 {
            let value = percent(offset, viewport, document);
            assert!(
                value >= previous,
                "progress went backwards at offset {offset}: {previous} -> {value}"
            );
            previous = value;
            offset += 7.5;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn short_document_resolves_to_zero_at_rest() {
        assert_eq!(percent(0.0, 800.0, 600.0), 0);
        assert_eq!(percent(0.0, 800.0, 800.0), 0);
    }

    #[test]
    fn short_document_never_leaves_bounds() {
        for offset in [0.0f32, 0.25, 0.5, 1.0, 40.0] {
            let value = percent(offset, 800.0, 600.0);
            assert!(value <= 100);
        }
        assert_eq!(percent(1.0, 800.0, 600.0), 100);
    }

    #[test]
    fn boundary_offsets_map_to_the_ends() {
        assert_eq!(percent(0.0, 800.0, 2_800.0), 0);
        assert_eq!(percent(2_000.0, 800.0, 2_800.0), 100);
        assert_eq!(percent(2_600.0, 800.0, 2_800.0), 100);
        assert_eq!(percent(1_000.0, 800.0, 2_800.0), 50);
    }

    #[test]
    fn rounds_to_nearest_whole_percent() {
        // 0.4% and 0.6% of a 1000px range.
        assert_eq!(percent(4.0, 500.0, 1_500.0), 0);
        assert_eq!(percent(6.0, 500.0, 1_500.0), 1);
    }

    #[test]
    fn negative_overscroll_counts_as_top() {
        assert_eq!(percent(-12.0, 800.0, 2_800.0), 0);
    }

    #[test]
    fn non_finite_inputs_do_not_escape_bounds() {
        assert_eq!(percent(f32::NAN, 800.0, 2_800.0), 0);
        assert_eq!(percent(100.0, f32::NAN, f32::INFINITY), 100);
        assert!(percent(f32::INFINITY, 800.0, 2_800.0) <= 100);
    }

    #[test]
    fn progress_new_saturates() {
        assert_eq!(Progress::new(250), Progress::END);
        assert_eq!(Progress::new(42).to_string(), "42%");
        assert!(Progress::END.is_complete());
    }
}
