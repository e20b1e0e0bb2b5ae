#![forbid(unsafe_code)]

//! Hit testing: which interactive target sits under a pointer position.
//!
//! Zones inside a bar are disjoint by construction: the 12px edge bands
//! claim resize (horizontal) and span (vertical) drags, horizontal
//! winning in the corners, and everything between is the movable body.
//! Milestones expose only their body. In dependency mode the anchor
//! dots are tested first, so a connect drag can start even where a dot
//! overlaps a neighboring bar.

use tgrid_core::layout::RowLayout;
use tgrid_core::model::{Activity, ActivityId, Chart, RowId};
use tgrid_core::view::ViewSettings;
use tgrid_geometry::{AnchorSide, Point, Rect, mapper};

use crate::GestureConfig;
use crate::drag_resize::ResizeEdge;
use crate::drag_span::SpanEdge;

/// The interactive target under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    /// An anchor dot, only reported in dependency mode.
    Anchor {
        activity: ActivityId,
        side: AnchorSide,
    },
    /// A bar's left or right edge band.
    ResizeHandle {
        activity: ActivityId,
        edge: ResizeEdge,
    },
    /// A bar's top or bottom edge band.
    SpanHandle {
        activity: ActivityId,
        edge: SpanEdge,
    },
    /// The draggable interior of a bar or milestone.
    Body { activity: ActivityId },
    /// Empty timeline space inside a row.
    Cell { row: RowId },
    /// Nothing interactive.
    Outside,
}

/// Resolve the target under `point` against a layout snapshot.
#[must_use]
pub fn hit_test(
    point: Point,
    chart: &Chart,
    layout: &RowLayout,
    view: &ViewSettings,
    config: &GestureConfig,
) -> Hit {
    let unit_width = view.unit_width();
    let row_height = layout.row_height();

    if view.dependency_mode
        && let Some(hit) = nearest_anchor(point, chart, layout, unit_width, config.anchor_hit_radius)
    {
        return hit;
    }

    // Topmost activity wins where bars overlap.
    let mut candidates: Vec<(&Activity, Rect)> = Vec::new();
    for band in layout.bands() {
        for id in &band.activity_ids {
            let Some(activity) = chart.activity(*id) else {
                continue;
            };
            let rect = mapper::activity_rect(
                activity.start_unit,
                activity.duration_units,
                activity.is_milestone,
                activity.row_span,
                unit_width,
                band.y,
                row_height,
            );
            if rect.contains(point) {
                candidates.push((activity, rect));
            }
        }
    }
    candidates.sort_by_key(|(a, _)| std::cmp::Reverse(a.order));

    if let Some((activity, rect)) = candidates.first() {
        return zone_within(activity, *rect, point, config.edge_zone);
    }

    if point.x >= 0.0
        && let Some(band) = layout.row_at(point.y)
    {
        return Hit::Cell { row: band.row_id };
    }
    Hit::Outside
}

fn zone_within(activity: &Activity, rect: Rect, point: Point, edge_zone: f32) -> Hit {
    let id = activity.id;
    if activity.is_milestone {
        return Hit::Body { activity: id };
    }
    if point.x <= rect.left + edge_zone {
        return Hit::ResizeHandle {
            activity: id,
            edge: ResizeEdge::Left,
        };
    }
    if point.x >= rect.right() - edge_zone {
        return Hit::ResizeHandle {
            activity: id,
            edge: ResizeEdge::Right,
        };
    }
    if point.y <= rect.top + edge_zone {
        return Hit::SpanHandle {
            activity: id,
            edge: SpanEdge::Top,
        };
    }
    if point.y >= rect.bottom() - edge_zone {
        return Hit::SpanHandle {
            activity: id,
            edge: SpanEdge::Bottom,
        };
    }
    Hit::Body { activity: id }
}

fn nearest_anchor(
    point: Point,
    chart: &Chart,
    layout: &RowLayout,
    unit_width: f32,
    radius: f32,
) -> Option<Hit> {
    let mut best = radius;
    let mut hit = None;
    for band in layout.bands() {
        for id in &band.activity_ids {
            let Some(activity) = chart.activity(*id) else {
                continue;
            };
            let rect = mapper::activity_rect(
                activity.start_unit,
                activity.duration_units,
                activity.is_milestone,
                activity.row_span,
                unit_width,
                band.y,
                layout.row_height(),
            );
            for side in AnchorSide::ALL {
                let dist = point.distance(rect.anchor(side));
                if dist < best {
                    best = dist;
                    hit = Some(Hit::Anchor {
                        activity: *id,
                        side,
                    });
                }
            }
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tgrid_core::model::NewActivity;
    use tgrid_core::store::ChartStore;

    const ROW: f32 = 40.0;

    // One bar at units 1..4 on row 0: rect (80, 4) to (320, 36).
    fn setup() -> (ChartStore, RowLayout, ViewSettings, ActivityId) {
        let mut store = ChartStore::with_chart(Chart::named("t"));
        let row = store.add_row("r0");
        store.add_row("r1");
        let id = store.add_activity(
            NewActivity {
                start_unit: 1,
                duration_units: 3,
                ..NewActivity::default()
            },
            row,
        );
        let layout = RowLayout::assemble(store.chart(), ROW);
        (store, layout, ViewSettings::default(), id)
    }

    fn hit_at(store: &ChartStore, layout: &RowLayout, view: &ViewSettings, x: f32, y: f32) -> Hit {
        hit_test(
            Point::new(x, y),
            store.chart(),
            layout,
            view,
            &GestureConfig::default(),
        )
    }

    #[test]
    fn bar_interior_is_body() {
        let (store, layout, view, id) = setup();
        assert_eq!(
            hit_at(&store, &layout, &view, 200.0, 20.0),
            Hit::Body { activity: id }
        );
    }

    #[test]
    fn edge_bands_are_resize_handles() {
        let (store, layout, view, id) = setup();
        assert_eq!(
            hit_at(&store, &layout, &view, 85.0, 20.0),
            Hit::ResizeHandle {
                activity: id,
                edge: ResizeEdge::Left
            }
        );
        assert_eq!(
            hit_at(&store, &layout, &view, 315.0, 20.0),
            Hit::ResizeHandle {
                activity: id,
                edge: ResizeEdge::Right
            }
        );
    }

    #[test]
    fn top_and_bottom_bands_are_span_handles() {
        let (store, layout, view, id) = setup();
        assert_eq!(
            hit_at(&store, &layout, &view, 200.0, 8.0),
            Hit::SpanHandle {
                activity: id,
                edge: SpanEdge::Top
            }
        );
        assert_eq!(
            hit_at(&store, &layout, &view, 200.0, 33.0),
            Hit::SpanHandle {
                activity: id,
                edge: SpanEdge::Bottom
            }
        );
    }

    #[test]
    fn corners_prefer_horizontal_resize() {
        let (store, layout, view, id) = setup();
        // Top-left corner is in both the left and top bands.
        assert_eq!(
            hit_at(&store, &layout, &view, 85.0, 8.0),
            Hit::ResizeHandle {
                activity: id,
                edge: ResizeEdge::Left
            }
        );
    }

    #[test]
    fn milestones_expose_only_their_body() {
        let (mut store, _, view, id) = setup();
        store.set_milestone(id, true);
        let layout = RowLayout::assemble(store.chart(), ROW);
        // Milestone square for unit 1 is centered at (120, 20).
        assert_eq!(
            hit_at(&store, &layout, &view, 112.0, 20.0),
            Hit::Body { activity: id }
        );
    }

    #[test]
    fn empty_row_space_is_a_cell() {
        let (store, layout, view, _) = setup();
        let Hit::Cell { row } = hit_at(&store, &layout, &view, 500.0, 50.0) else {
            panic!("expected a cell hit");
        };
        assert_eq!(layout.band(1).unwrap().row_id, row);
    }

    #[test]
    fn outside_the_rows_is_outside() {
        let (store, layout, view, _) = setup();
        assert_eq!(hit_at(&store, &layout, &view, 100.0, -5.0), Hit::Outside);
        assert_eq!(hit_at(&store, &layout, &view, 100.0, 200.0), Hit::Outside);
        assert_eq!(hit_at(&store, &layout, &view, -10.0, 100.0), Hit::Outside);
    }

    #[test]
    fn dependency_mode_hits_anchors_first() {
        let (store, layout, mut view, id) = setup();
        view.dependency_mode = true;
        // The right anchor sits at (320, 20); just inside the bar, this
        // point would otherwise be a resize handle.
        assert_eq!(
            hit_at(&store, &layout, &view, 314.0, 20.0),
            Hit::Anchor {
                activity: id,
                side: AnchorSide::Right
            }
        );
    }

    #[test]
    fn dependency_mode_falls_back_past_anchor_radius() {
        let (store, layout, mut view, id) = setup();
        view.dependency_mode = true;
        assert_eq!(
            hit_at(&store, &layout, &view, 200.0, 20.0),
            Hit::Body { activity: id }
        );
    }

    proptest! {
        // Every point inside the bar's rectangle resolves to that bar,
        // whatever zone it lands in.
        #[test]
        fn points_inside_a_bar_always_hit_it(
            x in 80.0f32..320.0,
            y in 4.0f32..36.0,
        ) {
            let (store, layout, view, id) = setup();
            let hit = hit_at(&store, &layout, &view, x, y);
            let owner = match hit {
                Hit::ResizeHandle { activity, .. }
                | Hit::SpanHandle { activity, .. }
                | Hit::Body { activity } => activity,
                other => panic!("point inside the bar resolved to {other:?}"),
            };
            prop_assert_eq!(owner, id);
        }

        // Points below the last row never hit anything.
        #[test]
        fn points_below_the_rows_are_outside(x in -50.0f32..600.0, y in 80.0f32..400.0) {
            let (store, layout, view, _) = setup();
            prop_assert_eq!(hit_at(&store, &layout, &view, x, y), Hit::Outside);
        }
    }

    #[test]
    fn overlapping_bars_resolve_to_the_higher_order() {
        let (mut store, _, view, lower) = setup();
        let row = store.chart().rows_in_order()[0].id;
        let upper = store.add_activity(
            NewActivity {
                start_unit: 1,
                duration_units: 3,
                ..NewActivity::default()
            },
            row,
        );
        let layout = RowLayout::assemble(store.chart(), ROW);
        let hit = hit_at(&store, &layout, &view, 200.0, 20.0);
        assert_eq!(hit, Hit::Body { activity: upper });
        assert_ne!(hit, Hit::Body { activity: lower });
    }
}
