#![forbid(unsafe_code)]

//! Chart entities: activities, rows, dependencies.
//!
//! All entities are plain serde-derivable data. Mutation goes through
//! [`crate::store::ChartStore`]; nothing here enforces invariants on its
//! own beyond field types.

use serde::{Deserialize, Serialize};

use tgrid_geometry::AnchorSide;

/// Default fill color for newly created activities.
pub const DEFAULT_ACTIVITY_COLOR: &str = "#3b82f6";

/// Default name for activities created by drag or double-tap.
pub const DEFAULT_ACTIVITY_NAME: &str = "New Activity";

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw id value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }
    };
}

entity_id! {
    /// Identifier of an [`Activity`].
    ActivityId
}
entity_id! {
    /// Identifier of a [`Row`].
    RowId
}
entity_id! {
    /// Identifier of a [`Dependency`].
    DependencyId
}

/// A bar or milestone on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    /// Fill color as a CSS hex string.
    pub color: String,
    /// First unit column (month or week, depending on the view scale).
    pub start_unit: u32,
    /// Duration in unit columns; always ≥ 1, and exactly 1 for milestones.
    pub duration_units: u32,
    /// Z-stacking order; higher draws on top.
    pub order: u32,
    #[serde(default)]
    pub is_milestone: bool,
    /// Vertical span in rows: 1 or 2.
    #[serde(default = "default_row_span")]
    pub row_span: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

const fn default_row_span() -> u8 {
    1
}

/// A horizontal band of the chart holding activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub name: String,
    /// Vertical position; rows render sorted by this.
    pub order: u32,
    /// Member activities, in insertion order.
    pub activity_ids: Vec<ActivityId>,
    /// Visual-only: this row's label cell merges with the row below.
    #[serde(default)]
    pub merged_with_next: bool,
}

/// A directional visual dependency between two activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: DependencyId,
    pub from_activity: ActivityId,
    pub to_activity: ActivityId,
    pub from_side: AnchorSide,
    pub to_side: AnchorSide,
}

/// The whole chart document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub name: String,
    pub rows: Vec<Row>,
    pub activities: Vec<Activity>,
    pub dependencies: Vec<Dependency>,
}

impl Chart {
    /// An empty chart with the given name and no rows.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            activities: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Look up an activity by id.
    #[must_use]
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Look up a row by id.
    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Look up a dependency by id.
    #[must_use]
    pub fn dependency(&self, id: DependencyId) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.id == id)
    }

    /// Rows sorted by their `order` field.
    #[must_use]
    pub fn rows_in_order(&self) -> Vec<&Row> {
        let mut rows: Vec<&Row> = self.rows.iter().collect();
        rows.sort_by_key(|r| r.order);
        rows
    }
}

/// Fields for creating an activity; id and z-order are store-assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub name: String,
    pub color: String,
    pub start_unit: u32,
    pub duration_units: u32,
    pub is_milestone: bool,
    pub row_span: u8,
}

impl Default for NewActivity {
    fn default() -> Self {
        Self {
            name: DEFAULT_ACTIVITY_NAME.to_owned(),
            color: DEFAULT_ACTIVITY_COLOR.to_owned(),
            start_unit: 0,
            duration_units: 1,
            is_milestone: false,
            row_span: 1,
        }
    }
}

/// Partial update for [`Activity`]; `None` fields are left untouched.
///
/// `annotation` is doubly optional so a patch can distinguish "leave it"
/// (`None`) from "clear it" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub start_unit: Option<u32>,
    pub duration_units: Option<u32>,
    pub order: Option<u32>,
    pub is_milestone: Option<bool>,
    pub row_span: Option<u8>,
    pub annotation: Option<Option<String>>,
}

impl ActivityPatch {
    /// A patch setting only the start unit.
    #[must_use]
    pub fn start(start_unit: u32) -> Self {
        Self {
            start_unit: Some(start_unit),
            ..Self::default()
        }
    }

    /// A patch setting start and duration.
    #[must_use]
    pub fn span(start_unit: u32, duration_units: u32) -> Self {
        Self {
            start_unit: Some(start_unit),
            duration_units: Some(duration_units),
            ..Self::default()
        }
    }

    /// A patch setting only the row span.
    #[must_use]
    pub fn row_span(row_span: u8) -> Self {
        Self {
            row_span: Some(row_span),
            ..Self::default()
        }
    }
}
