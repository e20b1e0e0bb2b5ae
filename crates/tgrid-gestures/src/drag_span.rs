#![forbid(unsafe_code)]

//! Drag-span: stretch a bar vertically over one or two rows.
//!
//! The bottom edge grows or shrinks the span downward within the rows
//! that exist below the anchor row. The top edge is the richer case:
//! dragging it moves the bar's top boundary, which can both change the
//! span and move the anchor row itself. A top-offset of +1 means the
//! anchor row moved one row down (span shrank from above); -1 means the
//! bar now starts one row up. Reparenting happens only at commit.

use tracing::debug;

use tgrid_core::layout::RowLayout;
use tgrid_core::model::{ActivityId, ActivityPatch, RowId};
use tgrid_core::store::ChartStore;

use crate::GestureConfig;

/// Maximum vertical span of a bar, in rows.
const MAX_ROW_SPAN: u8 = 2;

/// Which horizontal edge of the bar the span drag started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanEdge {
    Top,
    Bottom,
}

/// Live span geometry for the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanPreview {
    pub activity: ActivityId,
    /// Proposed row span, 1 or 2.
    pub span: u8,
    /// Rows the anchor row moved, relative to where the drag started.
    pub top_offset: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SpanState {
    Idle,
    Armed {
        activity: ActivityId,
        edge: SpanEdge,
        row_index: usize,
        origin_span: u8,
        rows_total: usize,
        down_y: f32,
    },
    Dragging {
        activity: ActivityId,
        edge: SpanEdge,
        row_index: usize,
        origin_span: u8,
        rows_total: usize,
        down_y: f32,
        span: u8,
        top_offset: i32,
    },
}

/// Gesture machine for vertical row-span drags.
#[derive(Debug, Clone)]
pub struct DragSpan {
    config: GestureConfig,
    state: SpanState,
}

impl DragSpan {
    /// New machine in the idle state.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: SpanState::Idle,
        }
    }

    /// Arm on pointer-down in a top/bottom edge hit zone.
    ///
    /// `row_index` is the visual index of the bar's anchor row and
    /// `rows_total` the number of rows in the layout snapshot.
    pub fn pointer_down(
        &mut self,
        activity: ActivityId,
        edge: SpanEdge,
        row_index: usize,
        origin_span: u8,
        rows_total: usize,
        y: f32,
    ) {
        self.state = SpanState::Armed {
            activity,
            edge,
            row_index,
            origin_span,
            rows_total,
            down_y: y,
        };
    }

    /// Track pointer movement; 4px of vertical travel promotes to
    /// dragging, after which the proposal snaps to whole rows.
    pub fn pointer_move(&mut self, y: f32, row_height: f32) {
        if let SpanState::Armed {
            activity,
            edge,
            row_index,
            origin_span,
            rows_total,
            down_y,
        } = self.state
            && (y - down_y).abs() >= self.config.drag_threshold
        {
            self.state = SpanState::Dragging {
                activity,
                edge,
                row_index,
                origin_span,
                rows_total,
                down_y,
                span: origin_span,
                top_offset: 0,
            };
        }

        let SpanState::Dragging {
            activity,
            edge,
            row_index,
            origin_span,
            rows_total,
            down_y,
            ..
        } = self.state
        else {
            return;
        };
        if row_height <= f32::EPSILON {
            return;
        }

        let row_delta = ((y - down_y) / row_height).round() as i32;
        let (span, top_offset) = match edge {
            SpanEdge::Bottom => {
                // Can only grow into rows that actually exist below.
                let rows_below = (rows_total - row_index) as i32;
                let max_span = i32::from(MAX_ROW_SPAN).min(rows_below).max(1);
                let span = (i32::from(origin_span) + row_delta).clamp(1, max_span);
                (span as u8, 0)
            }
            SpanEdge::Top => {
                // Down shrinks from above (and moves the anchor row down);
                // up grows from above (and moves the anchor row up).
                let lo = -i32::from(MAX_ROW_SPAN - origin_span).min(row_index as i32);
                let hi = i32::from(origin_span) - 1;
                let delta = row_delta.clamp(lo, hi);
                ((i32::from(origin_span) - delta) as u8, delta)
            }
        };

        self.state = SpanState::Dragging {
            activity,
            edge,
            row_index,
            origin_span,
            rows_total,
            down_y,
            span,
            top_offset,
        };
    }

    /// Live span proposal, present only while dragging.
    #[must_use]
    pub fn preview(&self) -> Option<SpanPreview> {
        match self.state {
            SpanState::Dragging {
                activity,
                span,
                top_offset,
                ..
            } => Some(SpanPreview {
                activity,
                span,
                top_offset,
            }),
            _ => None,
        }
    }

    /// Commit on pointer-up: write the new span, then reparent if the
    /// top offset moved the anchor row. Returns the activity and the
    /// row it moved to, or `None` when nothing changed.
    pub fn pointer_up(
        &mut self,
        store: &mut ChartStore,
        layout: &RowLayout,
    ) -> Option<(ActivityId, Option<RowId>)> {
        let state = std::mem::replace(&mut self.state, SpanState::Idle);
        let SpanState::Dragging {
            activity,
            row_index,
            origin_span,
            span,
            top_offset,
            ..
        } = state
        else {
            return None;
        };

        let new_row = if top_offset != 0 {
            let target = row_index as i32 + top_offset;
            usize::try_from(target)
                .ok()
                .and_then(|idx| layout.band(idx))
                .map(|band| band.row_id)
        } else {
            None
        };

        let span_changed = span != origin_span;
        if !span_changed && new_row.is_none() {
            return None;
        }
        if span_changed {
            store.update_activity(activity, ActivityPatch::row_span(span));
        }
        if let Some(row) = new_row {
            store.re_parent_activity(activity, row);
        }
        debug!(
            activity = activity.get(),
            span, top_offset, "span commit"
        );
        Some((activity, new_row))
    }

    /// Discard any transient state without committing.
    pub fn cancel(&mut self) {
        self.state = SpanState::Idle;
    }

    /// Whether the machine is past the drag threshold.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SpanState::Dragging { .. })
    }
}
