#![forbid(unsafe_code)]

//! Drag-create: sketch a new activity across an empty row area.
//!
//! Arms on pointer-down over empty row space; promotes to dragging after
//! 20px of horizontal travel. While dragging, the ghost bar tracks the
//! cell under the pointer (floor conversion); the release point maps to
//! the nearest unit boundary (round conversion). A drag spanning less
//! than one full unit creates nothing.

use tracing::{debug, trace};

use tgrid_core::model::{ActivityId, NewActivity, RowId};
use tgrid_core::store::ChartStore;
use tgrid_geometry::mapper;

use crate::GestureConfig;

/// Transient preview rectangle for an in-progress create drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostBar {
    pub row: RowId,
    pub left: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CreateState {
    Idle,
    Armed {
        row: RowId,
        down_x: f32,
        start_unit: u32,
    },
    Dragging {
        row: RowId,
        start_unit: u32,
        current_unit: u32,
    },
}

/// Gesture machine for drag-creating activities.
#[derive(Debug, Clone)]
pub struct DragCreate {
    config: GestureConfig,
    state: CreateState,
}

impl DragCreate {
    /// New machine in the idle state.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: CreateState::Idle,
        }
    }

    /// Arm on pointer-down over an empty cell of `row`.
    ///
    /// `x` is the pointer's offset from the timeline's left edge. The
    /// start unit is fixed here and carried through the drag.
    pub fn pointer_down(&mut self, row: RowId, x: f32, unit_width: f32) {
        self.state = CreateState::Armed {
            row,
            down_x: x,
            start_unit: mapper::unit_at(x, unit_width),
        };
    }

    /// Track pointer movement; promotes Armed→Dragging past the threshold.
    pub fn pointer_move(&mut self, x: f32, unit_width: f32) {
        match self.state {
            CreateState::Armed {
                row,
                down_x,
                start_unit,
            } if (x - down_x).abs() >= self.config.create_threshold => {
                self.state = CreateState::Dragging {
                    row,
                    start_unit,
                    current_unit: mapper::unit_at(x, unit_width),
                };
            }
            CreateState::Dragging {
                row, start_unit, ..
            } => {
                let current_unit = mapper::unit_at(x, unit_width);
                trace!(current_unit, "create drag update");
                self.state = CreateState::Dragging {
                    row,
                    start_unit,
                    current_unit,
                };
            }
            _ => {}
        }
    }

    /// Ghost bar for the live preview, present only while dragging.
    #[must_use]
    pub fn ghost(&self, unit_width: f32) -> Option<GhostBar> {
        let CreateState::Dragging {
            row,
            start_unit,
            current_unit,
        } = self.state
        else {
            return None;
        };
        let lo = start_unit.min(current_unit);
        let span = start_unit.abs_diff(current_unit).max(1);
        Some(GhostBar {
            row,
            left: lo as f32 * unit_width,
            width: span as f32 * unit_width,
        })
    }

    /// Commit on pointer-up. Creates an activity only when the drag
    /// reached the Dragging state and spans at least one unit.
    pub fn pointer_up(
        &mut self,
        x: f32,
        unit_width: f32,
        store: &mut ChartStore,
    ) -> Option<ActivityId> {
        let state = std::mem::replace(&mut self.state, CreateState::Idle);
        let CreateState::Dragging {
            row, start_unit, ..
        } = state
        else {
            return None;
        };

        let end_unit = mapper::nearest_unit(x, unit_width);
        let lo = start_unit.min(end_unit);
        let duration = start_unit.abs_diff(end_unit);
        if duration < 1 {
            return None;
        }

        let id = store.add_activity(
            NewActivity {
                start_unit: lo,
                duration_units: duration,
                ..NewActivity::default()
            },
            row,
        );
        debug!(activity = id.get(), start = lo, duration, "create commit");
        Some(id)
    }

    /// Discard any transient state without committing.
    pub fn cancel(&mut self) {
        self.state = CreateState::Idle;
    }

    /// Whether the machine is past the drag threshold.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, CreateState::Dragging { .. })
    }

    /// Whether the machine holds any transient state.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, CreateState::Idle)
    }
}
