mod core;
mod navigation;
mod scroll;

/// Describes work that must be performed outside the pure reducer.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Effect {
    /// Jump straight to an absolute offset.
    ScrollTo(f32),
    /// Ease toward an absolute offset over the configured duration.
    AnimateScrollTo(f32),
    QuitSafely,
}
