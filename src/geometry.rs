//! Window geometry primitives and the bounds-correction math.
//!
//! Some platforms do not honor window placement requests exactly: the
//! rectangle reported back after `set_bounds` can differ from the one asked
//! for by a small, systematic offset. [`placement_error`] measures that
//! offset so the controller can pre-compensate the next request.

use crate::constants::{MIN_WIDGET_HEIGHT, MIN_WIDGET_WIDTH, WIDGET_EDGE_MARGIN};

/// Signed window rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns this rectangle shifted component-wise by `delta`.
    pub fn shifted_by(self, delta: BoundsDelta) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            width: self.width + delta.width,
            height: self.height + delta.height,
        }
    }
}

/// Component-wise difference between two rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundsDelta {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundsDelta {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Measures the placement error after a `set_bounds` attempt.
///
/// `applied` is the rectangle handed to the platform (already carrying any
/// prior correction) and `actual` is the rectangle the platform reports back.
/// Adding the returned delta to the next request cancels a constant offset:
/// after one observation the requested-vs-applied error converges to zero.
pub fn placement_error(applied: Bounds, actual: Bounds) -> BoundsDelta {
    BoundsDelta {
        x: applied.x - actual.x,
        y: applied.y - actual.y,
        width: applied.width - actual.width,
        height: applied.height - actual.height,
    }
}

/// Initial widget placement: anchored near the bottom-left corner of the
/// main application window with a fixed margin, at minimum widget size.
pub fn anchored_widget_bounds(main_window: Bounds) -> Bounds {
    Bounds {
        x: main_window.x + WIDGET_EDGE_MARGIN,
        y: main_window.y + main_window.height - MIN_WIDGET_HEIGHT - WIDGET_EDGE_MARGIN,
        width: MIN_WIDGET_WIDTH,
        height: MIN_WIDGET_HEIGHT,
    }
}

/// Resizes `current` to the requested size while keeping its bottom-left
/// corner fixed, clamping to the minimum widget dimensions.
///
/// The widget grows upward: increasing the height moves the top edge up so
/// the window stays anchored above the main window's bottom edge.
pub fn resized_keeping_bottom(current: Bounds, width: i32, height: i32) -> Bounds {
    let width = width.max(MIN_WIDGET_WIDTH);
    let height = height.max(MIN_WIDGET_HEIGHT);
    Bounds {
        x: current.x,
        y: current.y + (current.height - height),
        width,
        height,
    }
}
