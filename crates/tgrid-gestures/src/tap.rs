#![forbid(unsafe_code)]

//! Double-tap detection keyed by logical target identity.
//!
//! The tracker pairs taps only when they land on the same logical target
//! (row id, activity id), not merely near the same coordinates. Without
//! the key, a tap on one row followed quickly by a tap on an adjacent
//! row could mis-register as a double tap on the second row.

use web_time::Instant;

use tgrid_geometry::Point;

use crate::GestureConfig;

#[derive(Debug, Clone)]
struct LastTap<K> {
    key: K,
    pos: Point,
    time: Instant,
}

/// Tracks the previous tap to recognize double taps on the same target.
///
/// `K` is the logical identity of the tap target. Call
/// [`register`](TapTracker::register) from the pointer-down handler; a
/// `true` return means this tap completed a double tap (and the slot is
/// cleared, so a third tap starts a fresh sequence).
#[derive(Debug, Clone)]
pub struct TapTracker<K> {
    timeout: web_time::Duration,
    radius: f32,
    last: Option<LastTap<K>>,
}

impl<K: PartialEq + Clone> TapTracker<K> {
    /// Create a tracker with the config's timing window and tolerance.
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            timeout: config.double_tap_timeout,
            radius: config.double_tap_radius,
            last: None,
        }
    }

    /// Record a tap; returns `true` when it completes a double tap.
    pub fn register(&mut self, key: K, pos: Point, now: Instant) -> bool {
        let is_double = self.last.as_ref().is_some_and(|last| {
            last.key == key
                && now.duration_since(last.time) < self.timeout
                && (pos.x - last.pos.x).abs() < self.radius
                && (pos.y - last.pos.y).abs() < self.radius
        });

        if is_double {
            self.last = None;
        } else {
            self.last = Some(LastTap {
                key,
                pos,
                time: now,
            });
        }
        is_double
    }

    /// Forget the pending tap (e.g. when a drag starts instead).
    pub fn reset(&mut self) {
        self.last = None;
    }
}
