#![forbid(unsafe_code)]

//! Drag-resize: adjust a bar's start and duration from its edges.
//!
//! A left-edge drag moves start and duration symmetrically so the right
//! edge stays put; an update that would push duration below 1 or start
//! below 0 is rejected and the previous valid state is kept, rather
//! than aborting the gesture. A right-edge drag changes duration only,
//! floored at 1. Commit writes only when something changed, and reads
//! the last valid dragging state rather than recomputing from the
//! release position.

use tracing::debug;

use tgrid_core::model::{ActivityId, ActivityPatch};
use tgrid_core::store::ChartStore;

use crate::GestureConfig;

/// Which edge of the bar the resize started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ResizeState {
    Idle,
    Armed {
        activity: ActivityId,
        edge: ResizeEdge,
        origin_start: u32,
        origin_duration: u32,
        down_x: f32,
    },
    Dragging {
        activity: ActivityId,
        edge: ResizeEdge,
        origin_start: u32,
        origin_duration: u32,
        down_x: f32,
        start: u32,
        duration: u32,
    },
}

/// Gesture machine for resizing activity bars.
#[derive(Debug, Clone)]
pub struct DragResize {
    config: GestureConfig,
    state: ResizeState,
}

impl DragResize {
    /// New machine in the idle state.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: ResizeState::Idle,
        }
    }

    /// Arm on pointer-down in an edge hit zone.
    pub fn pointer_down(
        &mut self,
        activity: ActivityId,
        edge: ResizeEdge,
        origin_start: u32,
        origin_duration: u32,
        x: f32,
    ) {
        self.state = ResizeState::Armed {
            activity,
            edge,
            origin_start,
            origin_duration,
            down_x: x,
        };
    }

    /// Track pointer movement; 4px of horizontal travel promotes to
    /// dragging, after which each move proposes a new start/duration.
    pub fn pointer_move(&mut self, x: f32, unit_width: f32) {
        if let ResizeState::Armed {
            activity,
            edge,
            origin_start,
            origin_duration,
            down_x,
        } = self.state
            && (x - down_x).abs() >= self.config.drag_threshold
        {
            self.state = ResizeState::Dragging {
                activity,
                edge,
                origin_start,
                origin_duration,
                down_x,
                start: origin_start,
                duration: origin_duration,
            };
        }

        let ResizeState::Dragging {
            activity,
            edge,
            origin_start,
            origin_duration,
            down_x,
            start,
            duration,
        } = self.state
        else {
            return;
        };
        if unit_width <= f32::EPSILON {
            return;
        }

        let delta_units = ((x - down_x) / unit_width).round() as i64;
        let (start, duration) = match edge {
            ResizeEdge::Left => {
                let new_start = i64::from(origin_start) + delta_units;
                let new_duration = i64::from(origin_duration) - delta_units;
                if new_duration >= 1 && new_start >= 0 {
                    (new_start as u32, new_duration as u32)
                } else {
                    // Out of range: keep the previous valid state.
                    (start, duration)
                }
            }
            ResizeEdge::Right => {
                let new_duration = (i64::from(origin_duration) + delta_units).max(1);
                (start, new_duration as u32)
            }
        };

        self.state = ResizeState::Dragging {
            activity,
            edge,
            origin_start,
            origin_duration,
            down_x,
            start,
            duration,
        };
    }

    /// Live start/duration for the preview, present only while dragging.
    #[must_use]
    pub fn preview(&self) -> Option<(ActivityId, u32, u32)> {
        match self.state {
            ResizeState::Dragging {
                activity,
                start,
                duration,
                ..
            } => Some((activity, start, duration)),
            _ => None,
        }
    }

    /// Commit on pointer-up. Writes start and duration together when
    /// either differs from the original.
    pub fn pointer_up(&mut self, store: &mut ChartStore) -> Option<ActivityId> {
        let state = std::mem::replace(&mut self.state, ResizeState::Idle);
        let ResizeState::Dragging {
            activity,
            origin_start,
            origin_duration,
            start,
            duration,
            ..
        } = state
        else {
            return None;
        };

        if start == origin_start && duration == origin_duration {
            return None;
        }
        store.update_activity(activity, ActivityPatch::span(start, duration));
        debug!(
            activity = activity.get(),
            start, duration, "resize commit"
        );
        Some(activity)
    }

    /// Discard any transient state without committing.
    pub fn cancel(&mut self) {
        self.state = ResizeState::Idle;
    }

    /// Whether the machine is past the drag threshold.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging { .. })
    }
}
