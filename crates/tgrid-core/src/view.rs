#![forbid(unsafe_code)]

//! View settings: timeline scale, zoom, row sizing, and selection.

use serde::{Deserialize, Serialize};

use crate::model::{ActivityId, DependencyId};

pub const MIN_MONTH_WIDTH: f32 = 20.0;
pub const MAX_MONTH_WIDTH: f32 = 180.0;
pub const DEFAULT_MONTH_WIDTH: f32 = 80.0;

pub const MIN_WEEK_WIDTH: f32 = 10.0;
pub const MAX_WEEK_WIDTH: f32 = 60.0;
pub const DEFAULT_WEEK_WIDTH: f32 = 30.0;

pub const ZOOM_STEP: f32 = 10.0;
/// Step used below 20px so zooming stays usable at small widths.
pub const ZOOM_FINE_STEP: f32 = 2.0;

/// The timeline's atomic unit column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeScale {
    #[default]
    Months,
    Weeks,
}

/// Row height presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl RowSize {
    /// Row height in pixels.
    #[must_use]
    pub const fn height(self) -> f32 {
        match self {
            Self::Small => 28.0,
            Self::Medium => 40.0,
            Self::Large => 56.0,
        }
    }
}

/// Zoom, scale, and transient selection state for the timeline view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    scale: TimeScale,
    month_width: f32,
    week_width: f32,
    pub row_size: RowSize,
    /// When on, anchor dots render and connect drags may start.
    pub dependency_mode: bool,
    pub selected_activity: Option<ActivityId>,
    pub editing_activity: Option<ActivityId>,
    pub selected_dependency: Option<DependencyId>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            scale: TimeScale::Months,
            month_width: DEFAULT_MONTH_WIDTH,
            week_width: DEFAULT_WEEK_WIDTH,
            row_size: RowSize::Medium,
            dependency_mode: false,
            selected_activity: None,
            editing_activity: None,
            selected_dependency: None,
        }
    }
}

impl ViewSettings {
    /// Active timeline scale.
    #[inline]
    #[must_use]
    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    /// Pixel width of one unit column under the active scale.
    #[must_use]
    pub fn unit_width(&self) -> f32 {
        match self.scale {
            TimeScale::Months => self.month_width,
            TimeScale::Weeks => self.week_width,
        }
    }

    /// Row height under the current row-size preset.
    #[inline]
    #[must_use]
    pub fn row_height(&self) -> f32 {
        self.row_size.height()
    }

    /// Switch scale, clearing selection so stale ids don't linger.
    pub fn set_scale(&mut self, scale: TimeScale) {
        self.scale = scale;
        self.selected_activity = None;
        self.editing_activity = None;
        self.selected_dependency = None;
    }

    /// Widen the active scale's unit by one zoom step.
    pub fn zoom_in(&mut self) {
        match self.scale {
            TimeScale::Months => {
                let step = if self.month_width < 20.0 {
                    ZOOM_FINE_STEP
                } else {
                    ZOOM_STEP
                };
                self.month_width = (self.month_width + step).min(MAX_MONTH_WIDTH);
            }
            TimeScale::Weeks => {
                let step = if self.week_width < 20.0 {
                    ZOOM_FINE_STEP
                } else {
                    ZOOM_STEP
                };
                self.week_width = (self.week_width + step).min(MAX_WEEK_WIDTH);
            }
        }
    }

    /// Narrow the active scale's unit by one zoom step.
    pub fn zoom_out(&mut self) {
        match self.scale {
            TimeScale::Months => {
                let step = if self.month_width <= 20.0 {
                    ZOOM_FINE_STEP
                } else {
                    ZOOM_STEP
                };
                self.month_width = (self.month_width - step).max(MIN_MONTH_WIDTH);
            }
            TimeScale::Weeks => {
                let step = if self.week_width <= 20.0 {
                    ZOOM_FINE_STEP
                } else {
                    ZOOM_STEP
                };
                self.week_width = (self.week_width - step).max(MIN_WEEK_WIDTH);
            }
        }
    }

    /// Set the month width directly, clamped to the valid range.
    pub fn set_month_width(&mut self, width: f32) {
        self.month_width = width.clamp(MIN_MONTH_WIDTH, MAX_MONTH_WIDTH);
    }

    /// Set the week width directly, clamped to the valid range.
    pub fn set_week_width(&mut self, width: f32) {
        self.week_width = width.clamp(MIN_WEEK_WIDTH, MAX_WEEK_WIDTH);
    }

    /// Select an activity, clearing any dependency selection.
    pub fn select_activity(&mut self, selection: Option<ActivityId>) {
        self.selected_activity = selection;
        if selection.is_some() {
            self.selected_dependency = None;
        }
    }

    /// Select a dependency, clearing activity selection and edit mode.
    pub fn select_dependency(&mut self, selection: Option<DependencyId>) {
        self.selected_dependency = selection;
        if selection.is_some() {
            self.selected_activity = None;
            self.editing_activity = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_to_bounds() {
        let mut view = ViewSettings::default();
        for _ in 0..50 {
            view.zoom_in();
        }
        assert_eq!(view.unit_width(), MAX_MONTH_WIDTH);
        for _ in 0..50 {
            view.zoom_out();
        }
        assert_eq!(view.unit_width(), MIN_MONTH_WIDTH);
    }

    #[test]
    fn fine_step_below_twenty_pixels() {
        let mut view = ViewSettings::default();
        view.set_month_width(20.0);
        view.zoom_out();
        assert_eq!(view.unit_width(), 18.0);
        view.zoom_in();
        assert_eq!(view.unit_width(), 20.0);
    }

    #[test]
    fn scales_zoom_independently() {
        let mut view = ViewSettings::default();
        view.zoom_out();
        view.set_scale(TimeScale::Weeks);
        assert_eq!(view.unit_width(), DEFAULT_WEEK_WIDTH);
        view.zoom_in();
        assert_eq!(view.unit_width(), DEFAULT_WEEK_WIDTH + ZOOM_STEP);
        view.set_scale(TimeScale::Months);
        assert_eq!(view.unit_width(), DEFAULT_MONTH_WIDTH - ZOOM_STEP);
    }

    #[test]
    fn switching_scale_clears_selection() {
        let mut view = ViewSettings::default();
        view.select_activity(Some(ActivityId::new(1)));
        view.editing_activity = Some(ActivityId::new(1));
        view.set_scale(TimeScale::Weeks);
        assert_eq!(view.selected_activity, None);
        assert_eq!(view.editing_activity, None);
    }

    #[test]
    fn selections_are_mutually_exclusive() {
        let mut view = ViewSettings::default();
        view.select_activity(Some(ActivityId::new(1)));
        view.select_dependency(Some(DependencyId::new(2)));
        assert_eq!(view.selected_activity, None);
        assert!(view.selected_dependency.is_some());

        view.select_activity(Some(ActivityId::new(1)));
        assert_eq!(view.selected_dependency, None);
    }

    #[test]
    fn row_size_heights() {
        assert_eq!(RowSize::Small.height(), 28.0);
        assert_eq!(RowSize::Medium.height(), 40.0);
        assert_eq!(RowSize::Large.height(), 56.0);
    }
}
