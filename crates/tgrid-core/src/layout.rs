#![forbid(unsafe_code)]

//! Row layout: ordered rows mapped to pixel y-bands.
//!
//! The gesture machines and the router never walk the chart's row list
//! directly; they consume an assembled [`RowLayout`] so that "which row
//! is the pointer over" and "which row holds this activity" are O(1)
//! lookups resolved against a single consistent snapshot.

use ahash::AHashMap;

use crate::model::{ActivityId, Chart, RowId};

/// One row's slice of the assembled layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBand {
    pub row_id: RowId,
    /// Pixel offset of the band's top edge.
    pub y: f32,
    /// Member activities, in the row's insertion order.
    pub activity_ids: Vec<ActivityId>,
}

/// Ordered row bands with reverse lookups.
///
/// Rebuild after any mutation that changes rows or memberships; bands
/// are positions at assembly time, not live views.
#[derive(Debug, Clone)]
pub struct RowLayout {
    bands: Vec<RowBand>,
    row_height: f32,
    index_by_row: AHashMap<RowId, usize>,
    row_of_activity: AHashMap<ActivityId, usize>,
}

impl RowLayout {
    /// Assemble the layout from the chart's rows sorted by order.
    #[must_use]
    pub fn assemble(chart: &Chart, row_height: f32) -> Self {
        let ordered = chart.rows_in_order();
        let mut bands = Vec::with_capacity(ordered.len());
        let mut index_by_row = AHashMap::with_capacity(ordered.len());
        let mut row_of_activity = AHashMap::new();

        for (idx, row) in ordered.iter().enumerate() {
            index_by_row.insert(row.id, idx);
            for id in &row.activity_ids {
                row_of_activity.insert(*id, idx);
            }
            bands.push(RowBand {
                row_id: row.id,
                y: idx as f32 * row_height,
                activity_ids: row.activity_ids.clone(),
            });
        }

        Self {
            bands,
            row_height,
            index_by_row,
            row_of_activity,
        }
    }

    /// All bands in visual order.
    #[inline]
    #[must_use]
    pub fn bands(&self) -> &[RowBand] {
        &self.bands
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// True when the chart has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Row height the layout was assembled with.
    #[inline]
    #[must_use]
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Band at a visual index.
    #[must_use]
    pub fn band(&self, index: usize) -> Option<&RowBand> {
        self.bands.get(index)
    }

    /// Band for a row id.
    #[must_use]
    pub fn band_for_row(&self, row_id: RowId) -> Option<&RowBand> {
        self.index_by_row.get(&row_id).map(|idx| &self.bands[*idx])
    }

    /// Visual index of a row id.
    #[must_use]
    pub fn index_of(&self, row_id: RowId) -> Option<usize> {
        self.index_by_row.get(&row_id).copied()
    }

    /// Band containing the given pixel y, if any.
    #[must_use]
    pub fn row_at(&self, y: f32) -> Option<&RowBand> {
        if y < 0.0 || self.row_height <= f32::EPSILON {
            return None;
        }
        let idx = (y / self.row_height).floor() as usize;
        self.bands.get(idx)
    }

    /// Visual index of the row holding the given activity.
    #[must_use]
    pub fn activity_row(&self, activity_id: ActivityId) -> Option<usize> {
        self.row_of_activity.get(&activity_id).copied()
    }
}
