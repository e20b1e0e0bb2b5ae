#![forbid(unsafe_code)]

//! Orthogonal dependency routing between anchor points.
//!
//! # Invariants
//!
//! 1. Every returned polyline starts exactly at the source anchor and
//!    ends exactly at the target anchor.
//! 2. Every consecutive point pair shares an x or a y coordinate — no
//!    diagonal segments.
//! 3. The first segment always leaves the bar along the source side's
//!    normal by [`STEP_OUT`] pixels before the path turns.
//!
//! When both sides are horizontal (or both vertical) and the step-out
//! points cross each other against the direction the sides imply, the
//! straight Z/S path would cut through the bars. Those "backward" cases
//! take a six-point detour that jogs past the source bar at half a row
//! height of clearance before travelling to the target.

use crate::point::Point;
use crate::side::AnchorSide;

/// Clearance a connector travels away from its anchor before turning.
pub const STEP_OUT: f32 = 12.0;

/// Route an orthogonal polyline between two anchors.
///
/// `row_height` only sets the detour clearance (half a row, so backward
/// routes travel through the gap between rows).
#[must_use]
pub fn route(
    from: Point,
    from_side: AnchorSide,
    to: Point,
    to_side: AnchorSide,
    row_height: f32,
) -> Vec<Point> {
    let a = from_side.step_out(from, STEP_OUT);
    let b = to_side.step_out(to, STEP_OUT);
    let clearance = row_height / 2.0;

    match (from_side.is_horizontal(), to_side.is_horizontal()) {
        (true, true) => {
            let backward = (from_side == AnchorSide::Right
                && to_side == AnchorSide::Left
                && a.x >= b.x)
                || (from_side == AnchorSide::Left && to_side == AnchorSide::Right && a.x <= b.x);

            if backward {
                // Jog past the source bar toward the target's vertical side.
                let detour_y = if to.y >= from.y {
                    from.y + clearance
                } else {
                    from.y - clearance
                };
                return vec![
                    from,
                    a,
                    Point::new(a.x, detour_y),
                    Point::new(b.x, detour_y),
                    b,
                    to,
                ];
            }

            let mid_x = (a.x + b.x) / 2.0;
            vec![
                from,
                a,
                Point::new(mid_x, a.y),
                Point::new(mid_x, b.y),
                b,
                to,
            ]
        }
        (false, false) => {
            let backward = (from_side == AnchorSide::Bottom
                && to_side == AnchorSide::Top
                && a.y >= b.y)
                || (from_side == AnchorSide::Top && to_side == AnchorSide::Bottom && a.y <= b.y);

            if backward {
                let detour_x = if to.x >= from.x {
                    from.x + clearance
                } else {
                    from.x - clearance
                };
                return vec![
                    from,
                    a,
                    Point::new(detour_x, a.y),
                    Point::new(detour_x, b.y),
                    b,
                    to,
                ];
            }

            let mid_y = (a.y + b.y) / 2.0;
            vec![
                from,
                a,
                Point::new(a.x, mid_y),
                Point::new(b.x, mid_y),
                b,
                to,
            ]
        }
        // Mixed exits: a single corner joining the two step-out axes.
        (true, false) => vec![from, a, Point::new(b.x, a.y), b, to],
        (false, true) => vec![from, a, Point::new(a.x, b.y), b, to],
    }
}

/// Simplified ghost path from an anchor to the live pointer position,
/// used while a connect drag has no snap target.
#[must_use]
pub fn route_to_pointer(from: Point, from_side: AnchorSide, pointer: Point) -> Vec<Point> {
    let a = from_side.step_out(from, STEP_OUT);
    if from_side.is_horizontal() {
        vec![from, a, Point::new(pointer.x, a.y), pointer]
    } else {
        vec![from, a, Point::new(a.x, pointer.y), pointer]
    }
}

/// Serialize a polyline as an SVG-style path description.
#[must_use]
pub fn path_data(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(if i == 0 { 'M' } else { 'L' });
        out.push_str(&format!("{},{}", p.x, p.y));
    }
    out
}
