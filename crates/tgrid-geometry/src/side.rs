#![forbid(unsafe_code)]

//! Anchor sides: the four cardinal edges of an activity rectangle.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// One of the four cardinal edges of an activity rectangle.
///
/// Dependencies attach to the midpoint of a side; the router uses the
/// side to decide which direction a connector leaves the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl AnchorSide {
    /// All sides, in the fixed iteration order used by snap scanning.
    pub const ALL: [AnchorSide; 4] = [
        AnchorSide::Left,
        AnchorSide::Right,
        AnchorSide::Top,
        AnchorSide::Bottom,
    ];

    /// True for `Left`/`Right` (the side's normal is horizontal).
    #[inline]
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// True for `Top`/`Bottom`.
    #[inline]
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// Push a point outward along this side's normal by `distance`.
    ///
    /// This is the router's "step-out": the connector visibly leaves the
    /// bar before its first turn.
    #[must_use]
    pub const fn step_out(self, p: Point, distance: f32) -> Point {
        match self {
            Self::Left => Point::new(p.x - distance, p.y),
            Self::Right => Point::new(p.x + distance, p.y),
            Self::Top => Point::new(p.x, p.y - distance),
            Self::Bottom => Point::new(p.x, p.y + distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation() {
        assert!(AnchorSide::Left.is_horizontal());
        assert!(AnchorSide::Right.is_horizontal());
        assert!(AnchorSide::Top.is_vertical());
        assert!(AnchorSide::Bottom.is_vertical());
    }

    #[test]
    fn step_out_moves_along_normal() {
        let p = Point::new(100.0, 50.0);
        assert_eq!(AnchorSide::Left.step_out(p, 12.0), Point::new(88.0, 50.0));
        assert_eq!(AnchorSide::Right.step_out(p, 12.0), Point::new(112.0, 50.0));
        assert_eq!(AnchorSide::Top.step_out(p, 12.0), Point::new(100.0, 38.0));
        assert_eq!(AnchorSide::Bottom.step_out(p, 12.0), Point::new(100.0, 62.0));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&AnchorSide::Left).unwrap();
        assert_eq!(json, "\"left\"");
        let side: AnchorSide = serde_json::from_str("\"bottom\"").unwrap();
        assert_eq!(side, AnchorSide::Bottom);
    }
}
