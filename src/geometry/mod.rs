//! Screen-space geometry
//!
//! Plain value types for the region of interest (ROI) and its container.
//! All coordinates are screen units with a top-left origin and y growing down.

pub mod clamp;
pub mod resize;

pub use clamp::clamp_rect;
pub use resize::remap_rect;

use serde::{Deserialize, Serialize};

/// Default gap between the ROI and the container edges
pub const DEFAULT_MARGIN: f32 = 16.0;
/// Margin used when re-fitting the ROI after a container size change
pub const DEFAULT_RESIZE_MARGIN: f32 = 8.0;
/// Default minimum ROI width and height once a gesture has ended
pub const DEFAULT_MIN_BOX_SIZE: f32 = 100.0;

/// A point in screen space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width/height pair, used both for containers and minimum sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Square size with both sides equal to `side`
    pub const fn square(side: f32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// True when either side is zero, negative or not finite.
    ///
    /// Containers report this before their first layout pass.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0)
    }
}

/// Cumulative gesture offset since the gesture began
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub dx: f32,
    pub dy: f32,
}

impl Translation {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

/// Axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` centred in `container`
    pub fn centered_in(container: Size, size: Size) -> Self {
        Self {
            x: (container.width - size.width) / 2.0,
            y: (container.height - size.height) / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Copy of this rectangle moved by `translation`
    pub fn offset_by(&self, translation: Translation) -> Self {
        Self {
            x: self.x + translation.dx,
            y: self.y + translation.dy,
            ..*self
        }
    }

    /// Shrink every side by `amount`. Extents may go negative.
    pub fn inset_by(&self, amount: f32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: self.width - 2.0 * amount,
            height: self.height - 2.0 * amount,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.y >= self.y && point.x <= self.max_x() && point.y <= self.max_y()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Margin and minimum-size constraints applied to the ROI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampPolicy {
    /// Minimum gap to every container edge
    pub margin: f32,
    /// Minimum size at rest
    pub min_size: Size,
}

impl Default for ClampPolicy {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            min_size: Size::square(DEFAULT_MIN_BOX_SIZE),
        }
    }
}

impl ClampPolicy {
    pub fn new(margin: f32, min_box_size: f32) -> Self {
        Self {
            margin,
            min_size: Size::square(min_box_size),
        }
    }

    /// Policy used by the orientation-change remap
    pub fn for_resize() -> Self {
        Self::new(DEFAULT_RESIZE_MARGIN, DEFAULT_MIN_BOX_SIZE)
    }
}

/// Clamp `value` into `[lo, hi]`; `lo` wins when the range is empty.
///
/// Unlike `f32::clamp` this never panics on an inverted range.
pub(crate) fn clamp_low_wins(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi).max(lo)
}

/// Clamp `value` into `[lo, hi]`; `hi` wins when the range is empty.
pub(crate) fn clamp_high_wins(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}
