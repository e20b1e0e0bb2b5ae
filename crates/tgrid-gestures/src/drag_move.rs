#![forbid(unsafe_code)]

//! Drag-move: shift an activity bar horizontally by whole units.
//!
//! Arms on pointer-down over a bar's body (edge hit zones belong to the
//! resize and span machines). The live position is
//! `max(0, origin + round(Δx / unit_width))`, so a bar can never be
//! dragged to a negative start. Commit writes the start unit only when
//! it actually changed.

use tracing::debug;

use tgrid_core::model::{ActivityId, ActivityPatch};
use tgrid_core::store::ChartStore;
use tgrid_geometry::Point;

use crate::GestureConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
enum MoveState {
    Idle,
    Armed {
        activity: ActivityId,
        origin_start: u32,
        down: Point,
    },
    Dragging {
        activity: ActivityId,
        origin_start: u32,
        current_start: u32,
        down_x: f32,
    },
}

/// Gesture machine for moving activity bars.
#[derive(Debug, Clone)]
pub struct DragMove {
    config: GestureConfig,
    state: MoveState,
}

impl DragMove {
    /// New machine in the idle state.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: MoveState::Idle,
        }
    }

    /// Arm on pointer-down over the activity's body.
    pub fn pointer_down(&mut self, activity: ActivityId, origin_start: u32, pos: Point) {
        self.state = MoveState::Armed {
            activity,
            origin_start,
            down: pos,
        };
    }

    /// Track pointer movement; 4px of travel in any direction promotes
    /// to dragging.
    pub fn pointer_move(&mut self, pos: Point, unit_width: f32) {
        match self.state {
            MoveState::Armed {
                activity,
                origin_start,
                down,
            } if pos.chebyshev_distance(down) >= self.config.drag_threshold => {
                self.state = MoveState::Dragging {
                    activity,
                    origin_start,
                    current_start: shifted_start(origin_start, pos.x - down.x, unit_width),
                    down_x: down.x,
                };
            }
            MoveState::Dragging {
                activity,
                origin_start,
                down_x,
                ..
            } => {
                self.state = MoveState::Dragging {
                    activity,
                    origin_start,
                    current_start: shifted_start(origin_start, pos.x - down_x, unit_width),
                    down_x,
                };
            }
            _ => {}
        }
    }

    /// Live start unit for the preview, present only while dragging.
    #[must_use]
    pub fn preview(&self) -> Option<(ActivityId, u32)> {
        match self.state {
            MoveState::Dragging {
                activity,
                current_start,
                ..
            } => Some((activity, current_start)),
            _ => None,
        }
    }

    /// Commit on pointer-up. Writes the new start only when it differs
    /// from the original. Returns the activity when a write happened.
    pub fn pointer_up(
        &mut self,
        pos: Point,
        unit_width: f32,
        store: &mut ChartStore,
    ) -> Option<ActivityId> {
        let state = std::mem::replace(&mut self.state, MoveState::Idle);
        let MoveState::Dragging {
            activity,
            origin_start,
            down_x,
            ..
        } = state
        else {
            return None;
        };

        let new_start = shifted_start(origin_start, pos.x - down_x, unit_width);
        if new_start == origin_start {
            return None;
        }
        store.update_activity(activity, ActivityPatch::start(new_start));
        debug!(activity = activity.get(), start = new_start, "move commit");
        Some(activity)
    }

    /// Discard any transient state without committing.
    pub fn cancel(&mut self) {
        self.state = MoveState::Idle;
    }

    /// Whether the machine is past the drag threshold.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, MoveState::Dragging { .. })
    }
}

fn shifted_start(origin: u32, delta_x: f32, unit_width: f32) -> u32 {
    if unit_width <= f32::EPSILON {
        return origin;
    }
    let delta_units = (delta_x / unit_width).round() as i64;
    (i64::from(origin) + delta_units).max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgrid_core::model::{Chart, NewActivity, RowId};

    const UNIT: f32 = 80.0;

    fn setup(start_unit: u32) -> (DragMove, ChartStore, ActivityId) {
        let mut store = ChartStore::with_chart(Chart::named("t"));
        let row: RowId = store.add_row("r");
        let id = store.add_activity(
            NewActivity {
                start_unit,
                duration_units: 2,
                ..NewActivity::default()
            },
            row,
        );
        (DragMove::new(GestureConfig::default()), store, id)
    }

    #[test]
    fn drag_right_shifts_start() {
        let (mut gesture, mut store, id) = setup(2);
        gesture.pointer_down(id, 2, Point::new(200.0, 20.0));
        gesture.pointer_move(Point::new(360.0, 20.0), UNIT);
        assert_eq!(gesture.preview(), Some((id, 4)));

        let committed = gesture.pointer_up(Point::new(360.0, 20.0), UNIT, &mut store);
        assert_eq!(committed, Some(id));
        assert_eq!(store.chart().activity(id).unwrap().start_unit, 4);
    }

    #[test]
    fn start_clamps_at_zero() {
        let (mut gesture, mut store, id) = setup(1);
        gesture.pointer_down(id, 1, Point::new(100.0, 20.0));
        gesture.pointer_move(Point::new(-500.0, 20.0), UNIT);
        assert_eq!(gesture.preview(), Some((id, 0)));
        gesture.pointer_up(Point::new(-500.0, 20.0), UNIT, &mut store);
        assert_eq!(store.chart().activity(id).unwrap().start_unit, 0);
    }

    #[test]
    fn below_threshold_never_drags() {
        let (mut gesture, mut store, id) = setup(2);
        gesture.pointer_down(id, 2, Point::new(200.0, 20.0));
        gesture.pointer_move(Point::new(203.0, 21.0), UNIT);
        assert!(!gesture.is_dragging());
        assert!(
            gesture
                .pointer_up(Point::new(203.0, 21.0), UNIT, &mut store)
                .is_none()
        );
        assert_eq!(store.chart().activity(id).unwrap().start_unit, 2);
    }

    #[test]
    fn vertical_travel_counts_toward_threshold() {
        let (mut gesture, _, id) = setup(2);
        gesture.pointer_down(id, 2, Point::new(200.0, 20.0));
        gesture.pointer_move(Point::new(200.0, 26.0), UNIT);
        assert!(gesture.is_dragging());
    }

    #[test]
    fn returning_to_origin_commits_nothing() {
        let (mut gesture, mut store, id) = setup(2);
        gesture.pointer_down(id, 2, Point::new(200.0, 20.0));
        gesture.pointer_move(Point::new(300.0, 20.0), UNIT);
        gesture.pointer_move(Point::new(210.0, 20.0), UNIT);
        assert!(
            gesture
                .pointer_up(Point::new(210.0, 20.0), UNIT, &mut store)
                .is_none()
        );
        assert_eq!(store.chart().activity(id).unwrap().start_unit, 2);
    }

    #[test]
    fn sub_half_unit_drag_rounds_to_no_change() {
        let (mut gesture, mut store, id) = setup(2);
        gesture.pointer_down(id, 2, Point::new(200.0, 20.0));
        gesture.pointer_move(Point::new(235.0, 20.0), UNIT); // 35px < 40px
        assert_eq!(gesture.preview(), Some((id, 2)));
        assert!(
            gesture
                .pointer_up(Point::new(235.0, 20.0), UNIT, &mut store)
                .is_none()
        );
    }

    #[test]
    fn cancel_discards_state() {
        let (mut gesture, mut store, id) = setup(2);
        gesture.pointer_down(id, 2, Point::new(200.0, 20.0));
        gesture.pointer_move(Point::new(400.0, 20.0), UNIT);
        gesture.cancel();
        assert!(
            gesture
                .pointer_up(Point::new(400.0, 20.0), UNIT, &mut store)
                .is_none()
        );
        assert_eq!(store.chart().activity(id).unwrap().start_unit, 2);
    }
}
