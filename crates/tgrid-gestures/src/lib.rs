#![forbid(unsafe_code)]

//! Gesture recognition: pointer events into chart mutations.
//!
//! # Role in timegrid
//! `tgrid-gestures` owns the five pointer-driven state machines that
//! turn raw pointer sequences into chart mutations:
//!
//! - [`DragCreate`](drag_create::DragCreate) — drag across an empty row
//!   to sketch a new bar (double-tap creates a one-unit bar directly).
//! - [`DragMove`](drag_move::DragMove) — drag a bar body horizontally.
//! - [`DragResize`](drag_resize::DragResize) — drag a bar's left/right
//!   edge.
//! - [`DragSpan`](drag_span::DragSpan) — drag a bar's top/bottom edge to
//!   change its row span or re-anchor it one row up/down.
//! - [`DragConnect`](drag_connect::DragConnect) — drag from an anchor
//!   dot to another activity's nearest anchor.
//!
//! # State machine
//! Each machine follows the same shape:
//!
//! ```text
//! Idle ──pointer-down──▶ Armed ──threshold──▶ Dragging ──pointer-up──▶ commit ▶ Idle
//!                          │
//!                          └──pointer-up before threshold──▶ Idle (no mutation)
//! ```
//!
//! The Armed→Idle escape is what distinguishes taps from drags: a
//! machine that never reaches Dragging never mutates, leaving the event
//! free to be reinterpreted (e.g. by the double-tap tracker).
//!
//! # Invariants
//! 1. A pointer-up at the pointer-down coordinates commits nothing, for
//!    every machine.
//! 2. No machine's transient state outlives its interaction: pointer-up,
//!    cancel, and capture loss all tear it down unconditionally.
//! 3. Capture loss aborts; it never commits a half-formed drag.
//! 4. Each machine is independently safe; the [`editor::TimelineEditor`]
//!    arms at most one per interaction because hit zones are disjoint.

pub mod drag_connect;
pub mod drag_create;
pub mod drag_move;
pub mod drag_resize;
pub mod drag_span;
pub mod editor;
pub mod hit;
pub mod tap;

use web_time::Duration;

/// Thresholds and radii for gesture recognition.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Horizontal movement before a create drag starts (default: 20px).
    pub create_threshold: f32,
    /// Movement before move/resize/span drags start (default: 4px).
    pub drag_threshold: f32,
    /// Width of the resize/span hit zones at a bar's edges (default: 12px).
    pub edge_zone: f32,
    /// Radius of the nearest-anchor search during a connect drag (default: 20px).
    pub snap_radius: f32,
    /// Hit radius of an anchor dot in dependency mode (default: 10px).
    pub anchor_hit_radius: f32,
    /// Time window for double-tap detection (default: 300ms).
    pub double_tap_timeout: Duration,
    /// Movement tolerance for double-tap detection (default: 25px).
    pub double_tap_radius: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            create_threshold: 20.0,
            drag_threshold: 4.0,
            edge_zone: 12.0,
            snap_radius: 20.0,
            anchor_hit_radius: 10.0,
            double_tap_timeout: Duration::from_millis(300),
            double_tap_radius: 25.0,
        }
    }
}

pub use drag_connect::{DragConnect, SnapTarget};
pub use drag_create::{DragCreate, GhostBar};
pub use drag_move::DragMove;
pub use drag_resize::{DragResize, ResizeEdge};
pub use drag_span::{DragSpan, SpanEdge, SpanPreview};
pub use editor::{Commit, CursorStyle, Effects, Preview, TimelineEditor};
pub use hit::{Hit, hit_test};
pub use tap::TapTracker;
