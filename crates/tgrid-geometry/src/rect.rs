#![forbid(unsafe_code)]

//! Axis-aligned pixel rectangle for activity bars and hit testing.

use serde::{Deserialize, Serialize};

use crate::point::Point;
use crate::side::AnchorSide;

/// An axis-aligned rectangle in chart pixel space.
///
/// Derived per-activity per-render; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Center point.
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Check whether a point lies inside (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Midpoint of the requested edge, used as a dependency endpoint.
    #[must_use]
    pub const fn anchor(&self, side: AnchorSide) -> Point {
        match side {
            AnchorSide::Left => Point::new(self.left, self.top + self.height / 2.0),
            AnchorSide::Right => Point::new(self.right(), self.top + self.height / 2.0),
            AnchorSide::Top => Point::new(self.left + self.width / 2.0, self.top),
            AnchorSide::Bottom => Point::new(self.left + self.width / 2.0, self.bottom()),
        }
    }
}
