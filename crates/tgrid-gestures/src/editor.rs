#![forbid(unsafe_code)]

//! The editor facade: one pointer stream in, chart mutations out.
//!
//! [`TimelineEditor`] owns the five gesture machines and the double-tap
//! tracker, routes each pointer-down through hit testing to arm exactly
//! one machine, and surfaces what the host shell needs each frame: a
//! [`Preview`] to draw, [`Effects`] (cursor shape, selection
//! suppression), and a [`Commit`] when an interaction lands a mutation.
//!
//! # Failure Modes
//! Pointer capture loss tears down the armed machine without
//! committing. A half-dragged bar snaps back; nothing is written.

use web_time::Instant;

use tgrid_core::layout::RowLayout;
use tgrid_core::model::{ActivityId, DependencyId, NewActivity, RowId};
use tgrid_core::store::ChartStore;
use tgrid_core::view::ViewSettings;
use tgrid_geometry::{AnchorSide, Point, mapper};

use crate::GestureConfig;
use crate::drag_connect::DragConnect;
use crate::drag_create::{DragCreate, GhostBar};
use crate::drag_move::DragMove;
use crate::drag_resize::DragResize;
use crate::drag_span::{DragSpan, SpanPreview};
use crate::hit::{Hit, hit_test};
use crate::tap::TapTracker;

/// Logical identity of a tap target for double-tap pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TapKey {
    Row(RowId),
    Activity(ActivityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveGesture {
    Idle,
    Create,
    Move,
    Resize,
    Span,
    Connect,
}

/// A mutation that landed on pointer-up (or on a double tap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Commit {
    Created(ActivityId),
    Moved(ActivityId),
    Resized(ActivityId),
    SpanChanged {
        activity: ActivityId,
        reparented_to: Option<RowId>,
    },
    Connected(DependencyId),
}

/// Cursor the host shell should show this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Grabbing,
    ResizeHorizontal,
    ResizeVertical,
    Crosshair,
}

/// Frame-level hints for the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Effects {
    pub cursor: CursorStyle,
    /// True while a drag is live, so the release is not misread as a
    /// selection click.
    pub suppress_selection: bool,
}

/// What to draw on the overlay this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Ghost(GhostBar),
    Move {
        activity: ActivityId,
        start_unit: u32,
    },
    Resize {
        activity: ActivityId,
        start_unit: u32,
        duration_units: u32,
    },
    Span(SpanPreview),
    Connector(Vec<Point>),
}

/// Routes pointer events to the gesture machines.
#[derive(Debug, Clone)]
pub struct TimelineEditor {
    config: GestureConfig,
    taps: TapTracker<TapKey>,
    drag_create: DragCreate,
    drag_move: DragMove,
    drag_resize: DragResize,
    drag_span: DragSpan,
    drag_connect: DragConnect,
    active: ActiveGesture,
}

impl Default for TimelineEditor {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl TimelineEditor {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            taps: TapTracker::new(&config),
            drag_create: DragCreate::new(config.clone()),
            drag_move: DragMove::new(config.clone()),
            drag_resize: DragResize::new(config.clone()),
            drag_span: DragSpan::new(config.clone()),
            drag_connect: DragConnect::new(config.clone()),
            config,
            active: ActiveGesture::Idle,
        }
    }

    /// Handle pointer-down: hit-test, update selection, recognize double
    /// taps, and arm at most one gesture machine.
    ///
    /// Double taps mutate immediately (a cell double-tap creates a
    /// one-unit activity), so this can return a [`Commit`] directly.
    pub fn pointer_down(
        &mut self,
        point: Point,
        now: Instant,
        store: &mut ChartStore,
        layout: &RowLayout,
        view: &mut ViewSettings,
    ) -> Option<Commit> {
        let hit = hit_test(point, store.chart(), layout, view, &self.config);
        match hit {
            Hit::Cell { row } => {
                if self.taps.register(TapKey::Row(row), point, now) {
                    let id = store.add_activity(
                        NewActivity {
                            start_unit: mapper::unit_at(point.x, view.unit_width()),
                            ..NewActivity::default()
                        },
                        row,
                    );
                    view.select_activity(Some(id));
                    view.editing_activity = Some(id);
                    return Some(Commit::Created(id));
                }
                view.select_activity(None);
                view.select_dependency(None);
                self.drag_create.pointer_down(row, point.x, view.unit_width());
                self.active = ActiveGesture::Create;
            }
            Hit::Body { activity } => {
                if self.taps.register(TapKey::Activity(activity), point, now) {
                    view.editing_activity = Some(activity);
                    return None;
                }
                view.select_activity(Some(activity));
                if let Some(a) = store.chart().activity(activity) {
                    self.drag_move.pointer_down(activity, a.start_unit, point);
                    self.active = ActiveGesture::Move;
                }
            }
            Hit::ResizeHandle { activity, edge } => {
                self.taps.reset();
                view.select_activity(Some(activity));
                if let Some(a) = store.chart().activity(activity) {
                    self.drag_resize.pointer_down(
                        activity,
                        edge,
                        a.start_unit,
                        a.duration_units,
                        point.x,
                    );
                    self.active = ActiveGesture::Resize;
                }
            }
            Hit::SpanHandle { activity, edge } => {
                self.taps.reset();
                view.select_activity(Some(activity));
                if let (Some(a), Some(row_index)) = (
                    store.chart().activity(activity),
                    layout.activity_row(activity),
                ) {
                    self.drag_span.pointer_down(
                        activity,
                        edge,
                        row_index,
                        a.row_span,
                        layout.len(),
                        point.y,
                    );
                    self.active = ActiveGesture::Span;
                }
            }
            Hit::Anchor { activity, side } => {
                self.taps.reset();
                if let Some(anchor) =
                    anchor_point(store, layout, view.unit_width(), activity, side)
                {
                    self.drag_connect.pointer_down(activity, side, anchor, point);
                    self.active = ActiveGesture::Connect;
                }
            }
            Hit::Outside => {
                self.taps.reset();
                view.select_activity(None);
                view.select_dependency(None);
            }
        }
        None
    }

    /// Handle pointer movement, driving whichever machine is armed.
    pub fn pointer_move(
        &mut self,
        point: Point,
        store: &ChartStore,
        layout: &RowLayout,
        view: &ViewSettings,
    ) {
        match self.active {
            ActiveGesture::Create => self.drag_create.pointer_move(point.x, view.unit_width()),
            ActiveGesture::Move => self.drag_move.pointer_move(point, view.unit_width()),
            ActiveGesture::Resize => self.drag_resize.pointer_move(point.x, view.unit_width()),
            ActiveGesture::Span => self.drag_span.pointer_move(point.y, layout.row_height()),
            ActiveGesture::Connect => {
                self.drag_connect
                    .pointer_move(point, store.chart(), layout, view.unit_width());
            }
            ActiveGesture::Idle => {}
        }
        // Once a real drag is live the tap sequence is dead.
        if self.is_dragging() {
            self.taps.reset();
        }
    }

    /// Handle pointer-up: commit the active gesture, if it got far
    /// enough to change anything.
    pub fn pointer_up(
        &mut self,
        point: Point,
        store: &mut ChartStore,
        layout: &RowLayout,
        view: &mut ViewSettings,
    ) -> Option<Commit> {
        let active = std::mem::replace(&mut self.active, ActiveGesture::Idle);
        match active {
            ActiveGesture::Create => {
                let id = self
                    .drag_create
                    .pointer_up(point.x, view.unit_width(), store)?;
                // A freshly sketched bar goes straight into name editing.
                view.select_activity(Some(id));
                view.editing_activity = Some(id);
                Some(Commit::Created(id))
            }
            ActiveGesture::Move => self
                .drag_move
                .pointer_up(point, view.unit_width(), store)
                .map(Commit::Moved),
            ActiveGesture::Resize => self.drag_resize.pointer_up(store).map(Commit::Resized),
            ActiveGesture::Span => {
                self.drag_span
                    .pointer_up(store, layout)
                    .map(|(activity, reparented_to)| Commit::SpanChanged {
                        activity,
                        reparented_to,
                    })
            }
            ActiveGesture::Connect => self.drag_connect.pointer_up(store).map(Commit::Connected),
            ActiveGesture::Idle => None,
        }
    }

    /// Pointer capture was lost mid-interaction: abort everything.
    pub fn pointer_capture_lost(&mut self) {
        self.drag_create.cancel();
        self.drag_move.cancel();
        self.drag_resize.cancel();
        self.drag_span.cancel();
        self.drag_connect.cancel();
        self.taps.reset();
        self.active = ActiveGesture::Idle;
    }

    /// Overlay content for the current frame, if a drag is live.
    #[must_use]
    pub fn preview(&self, view: &ViewSettings) -> Option<Preview> {
        match self.active {
            ActiveGesture::Create => self
                .drag_create
                .ghost(view.unit_width())
                .map(Preview::Ghost),
            ActiveGesture::Move => self
                .drag_move
                .preview()
                .map(|(activity, start_unit)| Preview::Move {
                    activity,
                    start_unit,
                }),
            ActiveGesture::Resize => {
                self.drag_resize
                    .preview()
                    .map(|(activity, start_unit, duration_units)| Preview::Resize {
                        activity,
                        start_unit,
                        duration_units,
                    })
            }
            ActiveGesture::Span => self.drag_span.preview().map(Preview::Span),
            ActiveGesture::Connect => self
                .drag_connect
                .preview(view.row_height())
                .map(Preview::Connector),
            ActiveGesture::Idle => None,
        }
    }

    /// Cursor and selection hints for the current frame.
    #[must_use]
    pub fn effects(&self) -> Effects {
        let cursor = match self.active {
            ActiveGesture::Create if self.drag_create.is_dragging() => CursorStyle::Crosshair,
            ActiveGesture::Move if self.drag_move.is_dragging() => CursorStyle::Grabbing,
            ActiveGesture::Resize if self.drag_resize.is_dragging() => {
                CursorStyle::ResizeHorizontal
            }
            ActiveGesture::Span if self.drag_span.is_dragging() => CursorStyle::ResizeVertical,
            ActiveGesture::Connect if self.drag_connect.is_dragging() => CursorStyle::Crosshair,
            _ => CursorStyle::Default,
        };
        Effects {
            cursor,
            suppress_selection: self.is_dragging(),
        }
    }

    fn is_dragging(&self) -> bool {
        self.drag_create.is_dragging()
            || self.drag_move.is_dragging()
            || self.drag_resize.is_dragging()
            || self.drag_span.is_dragging()
            || self.drag_connect.is_dragging()
    }
}

fn anchor_point(
    store: &ChartStore,
    layout: &RowLayout,
    unit_width: f32,
    activity: ActivityId,
    side: AnchorSide,
) -> Option<Point> {
    let a = store.chart().activity(activity)?;
    let band = layout.band(layout.activity_row(activity)?)?;
    let rect = mapper::activity_rect(
        a.start_unit,
        a.duration_units,
        a.is_milestone,
        a.row_span,
        unit_width,
        band.y,
        layout.row_height(),
    );
    Some(rect.anchor(side))
}
