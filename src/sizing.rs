//! Screen-relative sizing: fractional frames and step resizing.
//!
//! Both operations measure in fractions of the usable screen area, so the
//! same binding gives proportionally the same result on every display.

use crate::anchor::{position_for, Anchor};
use crate::geometry::{Rect, Size};
use std::fmt;

/// Step size, as a fraction of the screen, used when no configuration says
/// otherwise.
pub const DEFAULT_INCREMENT: f64 = 0.1;

/// Frame covering `width_fraction × height_fraction` of `screen`, placed at
/// `origin`.
///
/// The frame is first sized to the fraction of the screen minus `margin` on
/// both sides of each axis (never below zero), then moved with
/// [`position_for`] using the same `margin`.  `window` supplies the current
/// origin for single-axis anchors.
pub fn fraction_frame(
    screen: Rect,
    window: Rect,
    width_fraction: f64,
    height_fraction: f64,
    origin: Anchor,
    margin: f64,
) -> Rect {
    let size = Size::new(
        screen.width * width_fraction - 2.0 * margin,
        screen.height * height_fraction - 2.0 * margin,
    )
    .clamped();
    let frame = window.with_size(size);
    frame.with_origin(position_for(origin, screen, frame, margin))
}

/// `size` grown by `dx` of the screen width and `dy` of the screen height.
///
/// Negative multipliers shrink.  The result never has a negative dimension.
pub fn resize_by(size: Size, screen: Rect, dx: f64, dy: f64) -> Size {
    Size::new(
        size.width + screen.width * dx,
        size.height + screen.height * dy,
    )
    .clamped()
}

/// One step of the width/height resize bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeStep {
    IncreaseWidth,
    DecreaseWidth,
    IncreaseHeight,
    DecreaseHeight,
}

impl ResizeStep {
    /// Signed `(dx, dy)` screen fractions for this step.
    ///
    /// Increasing adds `increment`, decreasing subtracts it.
    pub fn multiplier(self, increment: f64) -> (f64, f64) {
        match self {
            ResizeStep::IncreaseWidth => (increment, 0.0),
            ResizeStep::DecreaseWidth => (-increment, 0.0),
            ResizeStep::IncreaseHeight => (0.0, increment),
            ResizeStep::DecreaseHeight => (0.0, -increment),
        }
    }

    /// Apply this step to `size`.
    pub fn apply(self, size: Size, screen: Rect, increment: f64) -> Size {
        let (dx, dy) = self.multiplier(increment);
        resize_by(size, screen, dx, dy)
    }
}

impl fmt::Display for ResizeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeStep::IncreaseWidth => write!(f, "increase width"),
            ResizeStep::DecreaseWidth => write!(f, "decrease width"),
            ResizeStep::IncreaseHeight => write!(f, "increase height"),
            ResizeStep::DecreaseHeight => write!(f, "decrease height"),
        }
    }
}
