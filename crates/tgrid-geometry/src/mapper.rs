#![forbid(unsafe_code)]

//! Coordinate mapper: domain time-units to pixel rectangles and back.
//!
//! # Invariants
//!
//! 1. A bar rectangle is never narrower than half a unit, so zero- and
//!    near-zero-duration bars stay clickable.
//! 2. Milestones map to a fixed small square centered in their cell,
//!    independent of duration.
//! 3. Pixel→unit conversion never returns a negative unit and never
//!    divides by zero: a non-positive `unit_width` is a precondition
//!    violation and yields unit 0 instead of panicking.
//!
//! The floor/round split between [`unit_at`] and [`nearest_unit`] is
//! intentional: floor tracks the cell under the pointer while a drag is
//! live, round maps the release point to the nearest boundary at commit.

use crate::rect::Rect;

/// Vertical padding between a bar and its row's edges.
pub const BAR_PADDING: f32 = 4.0;

/// Upper bound on the milestone square's side length.
pub const MILESTONE_MAX_SIZE: f32 = 22.0;

/// Minimum bar width, as a fraction of the unit width.
pub const MIN_BAR_WIDTH_FACTOR: f32 = 0.5;

/// Rectangle for a normal (non-milestone) activity bar.
///
/// `row_y` is the pixel offset of the activity's anchor row; `row_span`
/// stretches the bar over 1 or 2 rows.
#[must_use]
pub fn bar_rect(
    start_unit: u32,
    duration_units: u32,
    unit_width: f32,
    row_y: f32,
    row_span: u8,
    row_height: f32,
) -> Rect {
    let width = (duration_units as f32 * unit_width).max(unit_width * MIN_BAR_WIDTH_FACTOR);
    Rect::new(
        start_unit as f32 * unit_width,
        row_y + BAR_PADDING,
        width,
        f32::from(row_span) * row_height - 2.0 * BAR_PADDING,
    )
}

/// Rectangle for a milestone: a small square centered in its cell.
#[must_use]
pub fn milestone_rect(start_unit: u32, unit_width: f32, row_y: f32, row_height: f32) -> Rect {
    let size = (row_height * 0.55).min(MILESTONE_MAX_SIZE);
    let cx = start_unit as f32 * unit_width + unit_width / 2.0;
    let cy = row_y + row_height / 2.0;
    Rect::new(cx - size / 2.0, cy - size / 2.0, size, size)
}

/// Rectangle for an activity, dispatching on the milestone flag.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn activity_rect(
    start_unit: u32,
    duration_units: u32,
    is_milestone: bool,
    row_span: u8,
    unit_width: f32,
    row_y: f32,
    row_height: f32,
) -> Rect {
    if is_milestone {
        milestone_rect(start_unit, unit_width, row_y, row_height)
    } else {
        bar_rect(
            start_unit,
            duration_units,
            unit_width,
            row_y,
            row_span,
            row_height,
        )
    }
}

/// Unit column containing the given pixel offset (floor).
///
/// Use while a drag is live so the ghost tracks the cell under the
/// pointer. Negative offsets clamp to unit 0.
#[must_use]
pub fn unit_at(px: f32, unit_width: f32) -> u32 {
    if unit_width <= f32::EPSILON {
        return 0;
    }
    (px / unit_width).floor().max(0.0) as u32
}

/// Unit boundary nearest to the given pixel offset (round).
///
/// Use at commit so the release point maps to the nearest boundary, not
/// always the lower one.
#[must_use]
pub fn nearest_unit(px: f32, unit_width: f32) -> u32 {
    if unit_width <= f32::EPSILON {
        return 0;
    }
    (px / unit_width).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::side::AnchorSide;

    const UNIT: f32 = 80.0;
    const ROW: f32 = 40.0;

    #[test]
    fn bar_rect_maps_units_to_pixels() {
        let r = bar_rect(2, 3, UNIT, 120.0, 1, ROW);
        assert_eq!(r.left, 160.0);
        assert_eq!(r.top, 124.0);
        assert_eq!(r.width, 240.0);
        assert_eq!(r.height, 32.0);
    }

    #[test]
    fn bar_rect_spans_two_rows() {
        let r = bar_rect(0, 1, UNIT, 40.0, 2, ROW);
        assert_eq!(r.height, 72.0);
        assert_eq!(r.top, 44.0);
    }

    #[test]
    fn bar_width_has_half_unit_floor() {
        let r = bar_rect(0, 0, UNIT, 0.0, 1, ROW);
        assert_eq!(r.width, 40.0);
    }

    #[test]
    fn milestone_is_centered_square() {
        let r = milestone_rect(1, UNIT, 40.0, ROW);
        // 40 * 0.55 = 22, capped at MILESTONE_MAX_SIZE
        assert_eq!(r.width, 22.0);
        assert_eq!(r.height, 22.0);
        assert_eq!(r.center(), Point::new(120.0, 60.0));
    }

    #[test]
    fn small_rows_shrink_the_milestone() {
        let r = milestone_rect(0, UNIT, 0.0, 28.0);
        assert_eq!(r.width, 28.0 * 0.55);
    }

    #[test]
    fn activity_rect_dispatches_on_milestone_flag() {
        let bar = activity_rect(0, 5, false, 1, UNIT, 0.0, ROW);
        let mile = activity_rect(0, 5, true, 1, UNIT, 0.0, ROW);
        assert_eq!(bar.width, 400.0);
        assert_eq!(mile.width, 22.0);
    }

    #[test]
    fn milestone_anchors_sit_on_the_square() {
        let r = milestone_rect(0, UNIT, 0.0, ROW);
        assert_eq!(r.anchor(AnchorSide::Right).x, r.right());
        assert_eq!(r.anchor(AnchorSide::Top).y, r.top);
    }

    #[test]
    fn unit_at_floors_and_nearest_rounds() {
        // 239px at 80px/unit: floor says unit 2, round says boundary 3.
        assert_eq!(unit_at(239.0, UNIT), 2);
        assert_eq!(nearest_unit(239.0, UNIT), 3);
        assert_eq!(unit_at(241.0, UNIT), 3);
        assert_eq!(nearest_unit(201.0, UNIT), 3);
        assert_eq!(nearest_unit(199.0, UNIT), 2);
    }

    #[test]
    fn conversions_clamp_negative_pixels() {
        assert_eq!(unit_at(-15.0, UNIT), 0);
        assert_eq!(nearest_unit(-15.0, UNIT), 0);
    }

    #[test]
    fn zero_unit_width_does_not_panic() {
        assert_eq!(unit_at(500.0, 0.0), 0);
        assert_eq!(nearest_unit(500.0, -1.0), 0);
    }
}
