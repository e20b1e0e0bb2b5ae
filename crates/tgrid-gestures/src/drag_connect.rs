#![forbid(unsafe_code)]

//! Drag-connect: draw a dependency from one anchor dot to another.
//!
//! Unlike the other machines this one has no arming threshold: the
//! anchor dots only exist in dependency mode, so a pointer-down on one
//! is already an unambiguous intent to connect. While dragging, the
//! nearest foreign anchor within the snap radius wins (strict nearest,
//! first found on a tie in row, then activity, then side order); the
//! connector preview routes to the snapped anchor, or trails the raw
//! pointer when nothing is in range. Release without a snap target
//! creates nothing.

use tracing::debug;

use tgrid_core::layout::RowLayout;
use tgrid_core::model::{ActivityId, Chart, DependencyId};
use tgrid_core::store::ChartStore;
use tgrid_geometry::{AnchorSide, Point, mapper, route};

use crate::GestureConfig;

/// The anchor the connector is currently snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub activity: ActivityId,
    pub side: AnchorSide,
    pub point: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ConnectState {
    Idle,
    Dragging {
        from: ActivityId,
        from_side: AnchorSide,
        from_point: Point,
        pointer: Point,
        snap: Option<SnapTarget>,
    },
}

/// Gesture machine for dependency connect drags.
#[derive(Debug, Clone)]
pub struct DragConnect {
    config: GestureConfig,
    state: ConnectState,
}

impl DragConnect {
    /// New machine in the idle state.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: ConnectState::Idle,
        }
    }

    /// Start dragging from an anchor dot. `from_point` is the anchor's
    /// position on the source activity's rectangle.
    pub fn pointer_down(
        &mut self,
        from: ActivityId,
        from_side: AnchorSide,
        from_point: Point,
        pointer: Point,
    ) {
        self.state = ConnectState::Dragging {
            from,
            from_side,
            from_point,
            pointer,
            snap: None,
        };
    }

    /// Track the pointer and re-resolve the snap target against the
    /// current chart snapshot.
    pub fn pointer_move(
        &mut self,
        pointer: Point,
        chart: &Chart,
        layout: &RowLayout,
        unit_width: f32,
    ) {
        let ConnectState::Dragging {
            from,
            from_side,
            from_point,
            ..
        } = self.state
        else {
            return;
        };

        let mut best = self.config.snap_radius;
        let mut snap = None;
        for band in layout.bands() {
            for id in &band.activity_ids {
                if *id == from {
                    continue;
                }
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
                    let point = rect.anchor(side);
                    let dist = pointer.distance(point);
                    if dist < best {
                        best = dist;
                        snap = Some(SnapTarget {
                            activity: *id,
                            side,
                            point,
                        });
                    }
                }
            }
        }

        self.state = ConnectState::Dragging {
            from,
            from_side,
            from_point,
            pointer,
            snap,
        };
    }

    /// The snapped anchor, if the pointer is in range of one.
    #[must_use]
    pub fn snap_target(&self) -> Option<SnapTarget> {
        match self.state {
            ConnectState::Dragging { snap, .. } => snap,
            ConnectState::Idle => None,
        }
    }

    /// Polyline for the live connector preview.
    #[must_use]
    pub fn preview(&self, row_height: f32) -> Option<Vec<Point>> {
        let ConnectState::Dragging {
            from_side,
            from_point,
            pointer,
            snap,
            ..
        } = self.state
        else {
            return None;
        };
        Some(match snap {
            Some(target) => route::route(from_point, from_side, target.point, target.side, row_height),
            None => route::route_to_pointer(from_point, from_side, pointer),
        })
    }

    /// Commit on pointer-up: create the dependency when snapped to a
    /// target. Self-loops and duplicates are refused by the store.
    pub fn pointer_up(&mut self, store: &mut ChartStore) -> Option<DependencyId> {
        let state = std::mem::replace(&mut self.state, ConnectState::Idle);
        let ConnectState::Dragging {
            from,
            from_side,
            snap,
            ..
        } = state
        else {
            return None;
        };

        let target = snap?;
        let id = store.add_dependency(from, target.activity, from_side, target.side)?;
        debug!(
            dependency = id.get(),
            from = from.get(),
            to = target.activity.get(),
            "connect commit"
        );
        Some(id)
    }

    /// Discard any transient state without committing.
    pub fn cancel(&mut self) {
        self.state = ConnectState::Idle;
    }

    /// Whether a connect drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ConnectState::Dragging { .. })
    }
}
