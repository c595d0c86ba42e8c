//! Screen-space primitives
//!
//! Screen coordinates are pixels with the origin at the top-left of the
//! viewport and y increasing downward.

use std::ops::Add;

/// Point in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new screen point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for ScreenPoint {
    type Output = ScreenPoint;

    fn add(self, rhs: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Axis-aligned rectangle occupied by a label
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CollisionBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CollisionBox {
    /// Create a box from its corners
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box of the given size centered on `center`
    pub fn centered(center: ScreenPoint, width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        )
    }

    /// Grow the box by `margin` on every side
    pub fn padded(&self, margin: f64) -> Self {
        Self::new(
            self.x1 - margin,
            self.y1 - margin,
            self.x2 + margin,
            self.y2 + margin,
        )
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Two boxes overlap unless they are strictly separated on x or y
    ///
    /// Boxes that merely touch count as overlapping.
    pub fn overlaps(&self, other: &CollisionBox) -> bool {
        !(other.x2 < self.x1 || self.x2 < other.x1 || other.y2 < self.y1 || self.y2 < other.y1)
    }
}
