#![forbid(unsafe_code)]

//! The chart store: the single mutation/query surface for chart data.
//!
//! # Invariants
//!
//! 1. Every mutation applies atomically and synchronously on the caller's
//!    thread; there is no partial state visible between calls.
//! 2. Mutations naming unknown ids are silent no-ops.
//! 3. Removing an activity or row cascades: row membership lists and
//!    dependencies never hold dangling ids.
//! 4. Dependencies never self-loop, and the exact
//!    `(from, to, from_side, to_side)` tuple is unique.
//! 5. Milestones always have `duration_units == 1`; the conversion is
//!    lossy and one-way (converting back does not restore the duration).

use tgrid_geometry::AnchorSide;
use tracing::debug;

use crate::model::{
    Activity, ActivityId, ActivityPatch, Chart, Dependency, DependencyId, NewActivity, Row, RowId,
};

/// Direction for [`ChartStore::move_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDirection {
    Up,
    Down,
}

/// Owns a [`Chart`] and applies all mutations to it.
#[derive(Debug, Clone)]
pub struct ChartStore {
    chart: Chart,
    next_id: u64,
}

impl Default for ChartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartStore {
    /// New store holding a chart with a single unnamed row.
    #[must_use]
    pub fn new() -> Self {
        let mut store = Self {
            chart: Chart::named("New Project"),
            next_id: 1,
        };
        store.add_row("");
        store
    }

    /// Adopt an existing chart (e.g. loaded by the host application).
    ///
    /// The id counter resumes past the highest id present.
    #[must_use]
    pub fn with_chart(chart: Chart) -> Self {
        let max_id = chart
            .rows
            .iter()
            .map(|r| r.id.get())
            .chain(chart.activities.iter().map(|a| a.id.get()))
            .chain(chart.dependencies.iter().map(|d| d.id.get()))
            .max()
            .unwrap_or(0);
        Self {
            chart,
            next_id: max_id + 1,
        }
    }

    /// Read access to the chart.
    #[inline]
    #[must_use]
    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // -----------------------------------------------------------------
    // Rows
    // -----------------------------------------------------------------

    /// Append a row at the bottom of the chart.
    pub fn add_row(&mut self, name: impl Into<String>) -> RowId {
        let id = RowId::new(self.fresh_id());
        let order = self
            .chart
            .rows
            .iter()
            .map(|r| r.order + 1)
            .max()
            .unwrap_or(0);
        self.chart.rows.push(Row {
            id,
            name: name.into(),
            order,
            activity_ids: Vec::new(),
            merged_with_next: false,
        });
        debug!(row = id.get(), order, "row added");
        id
    }

    /// Insert a row directly below the given row, shifting later rows down.
    ///
    /// Falls back to appending when `after` is unknown.
    pub fn insert_row_after(&mut self, after: RowId, name: impl Into<String>) -> RowId {
        let Some(after_order) = self.chart.row(after).map(|r| r.order) else {
            return self.add_row(name);
        };
        let insert_order = after_order + 1;
        for row in &mut self.chart.rows {
            if row.order >= insert_order {
                row.order += 1;
            }
        }
        let id = RowId::new(self.fresh_id());
        self.chart.rows.push(Row {
            id,
            name: name.into(),
            order: insert_order,
            activity_ids: Vec::new(),
            merged_with_next: false,
        });
        debug!(row = id.get(), order = insert_order, "row inserted");
        id
    }

    /// Rename a row.
    pub fn rename_row(&mut self, row_id: RowId, name: impl Into<String>) {
        if let Some(row) = self.chart.rows.iter_mut().find(|r| r.id == row_id) {
            row.name = name.into();
        }
    }

    /// Remove a row together with its activities and their dependencies.
    pub fn remove_row(&mut self, row_id: RowId) {
        let Some(row) = self.chart.row(row_id) else {
            return;
        };
        let removed: Vec<ActivityId> = row.activity_ids.clone();
        self.chart
            .activities
            .retain(|a| !removed.contains(&a.id));
        self.chart
            .dependencies
            .retain(|d| !removed.contains(&d.from_activity) && !removed.contains(&d.to_activity));

        // A merge pointing at the deleted row would dangle.
        let ordered: Vec<RowId> = self.chart.rows_in_order().iter().map(|r| r.id).collect();
        if let Some(idx) = ordered.iter().position(|id| *id == row_id)
            && idx > 0
        {
            let above = ordered[idx - 1];
            if let Some(above) = self.chart.rows.iter_mut().find(|r| r.id == above) {
                above.merged_with_next = false;
            }
        }

        self.chart.rows.retain(|r| r.id != row_id);
        debug!(row = row_id.get(), activities = removed.len(), "row removed");
    }

    /// Swap a row with its neighbor above or below.
    pub fn move_row(&mut self, row_id: RowId, direction: RowDirection) {
        let ordered: Vec<RowId> = self.chart.rows_in_order().iter().map(|r| r.id).collect();
        let Some(idx) = ordered.iter().position(|id| *id == row_id) else {
            return;
        };
        let swap_idx = match direction {
            RowDirection::Up if idx > 0 => idx - 1,
            RowDirection::Down if idx + 1 < ordered.len() => idx + 1,
            _ => return,
        };
        let other = ordered[swap_idx];
        let a = self.chart.row(row_id).map(|r| r.order);
        let b = self.chart.row(other).map(|r| r.order);
        if let (Some(a), Some(b)) = (a, b) {
            for row in &mut self.chart.rows {
                if row.id == row_id {
                    row.order = b;
                } else if row.id == other {
                    row.order = a;
                }
            }
        }
    }

    /// Toggle the visual merge between a row and the row below it.
    ///
    /// The last row has nothing to merge with and is left alone.
    pub fn toggle_row_merge(&mut self, row_id: RowId) {
        let ordered: Vec<RowId> = self.chart.rows_in_order().iter().map(|r| r.id).collect();
        let Some(idx) = ordered.iter().position(|id| *id == row_id) else {
            return;
        };
        let Some(row) = self.chart.rows.iter_mut().find(|r| r.id == row_id) else {
            return;
        };
        if !row.merged_with_next && idx + 1 >= ordered.len() {
            return;
        }
        row.merged_with_next = !row.merged_with_next;
    }

    // -----------------------------------------------------------------
    // Activities
    // -----------------------------------------------------------------

    /// Create an activity in the given row. Returns its id.
    ///
    /// The z-order is one past the current maximum so new bars draw on
    /// top. Milestones are normalized to a single unit of duration.
    pub fn add_activity(&mut self, new: NewActivity, row_id: RowId) -> ActivityId {
        let id = ActivityId::new(self.fresh_id());
        let order = self
            .chart
            .activities
            .iter()
            .map(|a| a.order + 1)
            .max()
            .unwrap_or(0);
        let duration = if new.is_milestone {
            1
        } else {
            new.duration_units.max(1)
        };
        self.chart.activities.push(Activity {
            id,
            name: new.name,
            color: new.color,
            start_unit: new.start_unit,
            duration_units: duration,
            order,
            is_milestone: new.is_milestone,
            row_span: new.row_span.clamp(1, 2),
            annotation: None,
        });
        if let Some(row) = self.chart.rows.iter_mut().find(|r| r.id == row_id) {
            row.activity_ids.push(id);
        }
        debug!(
            activity = id.get(),
            row = row_id.get(),
            start = new.start_unit,
            duration,
            "activity added"
        );
        id
    }

    /// Apply a partial update to an activity.
    pub fn update_activity(&mut self, activity_id: ActivityId, patch: ActivityPatch) {
        let Some(activity) = self
            .chart
            .activities
            .iter_mut()
            .find(|a| a.id == activity_id)
        else {
            return;
        };
        if let Some(name) = patch.name {
            activity.name = name;
        }
        if let Some(color) = patch.color {
            activity.color = color;
        }
        if let Some(start) = patch.start_unit {
            activity.start_unit = start;
        }
        if let Some(duration) = patch.duration_units {
            activity.duration_units = duration.max(1);
        }
        if let Some(order) = patch.order {
            activity.order = order;
        }
        if let Some(milestone) = patch.is_milestone {
            activity.is_milestone = milestone;
        }
        if let Some(span) = patch.row_span {
            activity.row_span = span.clamp(1, 2);
        }
        if let Some(annotation) = patch.annotation {
            activity.annotation = annotation;
        }
        debug!(activity = activity_id.get(), "activity updated");
    }

    /// Delete an activity, its row memberships, and its dependencies.
    pub fn remove_activity(&mut self, activity_id: ActivityId) {
        self.chart.activities.retain(|a| a.id != activity_id);
        for row in &mut self.chart.rows {
            row.activity_ids.retain(|id| *id != activity_id);
        }
        self.chart
            .dependencies
            .retain(|d| d.from_activity != activity_id && d.to_activity != activity_id);
        debug!(activity = activity_id.get(), "activity removed");
    }

    /// Move an activity's membership from its current row to another.
    pub fn re_parent_activity(&mut self, activity_id: ActivityId, to_row: RowId) {
        for row in &mut self.chart.rows {
            if let Some(idx) = row.activity_ids.iter().position(|id| *id == activity_id) {
                row.activity_ids.remove(idx);
                break;
            }
        }
        if let Some(target) = self.chart.rows.iter_mut().find(|r| r.id == to_row)
            && !target.activity_ids.contains(&activity_id)
        {
            target.activity_ids.push(activity_id);
        }
        debug!(
            activity = activity_id.get(),
            row = to_row.get(),
            "activity re-parented"
        );
    }

    /// Convert an activity to or from a milestone.
    ///
    /// Converting to a milestone forces the duration to one unit; the
    /// original duration is not remembered when converting back.
    pub fn set_milestone(&mut self, activity_id: ActivityId, is_milestone: bool) {
        let patch = if is_milestone {
            ActivityPatch {
                is_milestone: Some(true),
                duration_units: Some(1),
                ..ActivityPatch::default()
            }
        } else {
            ActivityPatch {
                is_milestone: Some(false),
                ..ActivityPatch::default()
            }
        };
        self.update_activity(activity_id, patch);
    }

    // -----------------------------------------------------------------
    // Dependencies
    // -----------------------------------------------------------------

    /// Create a dependency between two activity anchors.
    ///
    /// Returns `None` for a self-loop or when the exact
    /// `(from, to, from_side, to_side)` tuple already exists.
    pub fn add_dependency(
        &mut self,
        from: ActivityId,
        to: ActivityId,
        from_side: AnchorSide,
        to_side: AnchorSide,
    ) -> Option<DependencyId> {
        if from == to {
            return None;
        }
        let duplicate = self.chart.dependencies.iter().any(|d| {
            d.from_activity == from
                && d.to_activity == to
                && d.from_side == from_side
                && d.to_side == to_side
        });
        if duplicate {
            return None;
        }
        let id = DependencyId::new(self.fresh_id());
        self.chart.dependencies.push(Dependency {
            id,
            from_activity: from,
            to_activity: to,
            from_side,
            to_side,
        });
        debug!(
            dependency = id.get(),
            from = from.get(),
            to = to.get(),
            "dependency added"
        );
        Some(id)
    }

    /// Delete a dependency.
    pub fn remove_dependency(&mut self, dependency_id: DependencyId) {
        self.chart.dependencies.retain(|d| d.id != dependency_id);
        debug!(dependency = dependency_id.get(), "dependency removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store_with_rows(n: usize) -> (ChartStore, Vec<RowId>) {
        let mut store = ChartStore::with_chart(Chart::named("test"));
        let rows = (0..n).map(|i| store.add_row(format!("r{i}"))).collect();
        (store, rows)
    }

    #[test]
    fn new_store_has_one_empty_row() {
        let store = ChartStore::new();
        assert_eq!(store.chart().rows.len(), 1);
        assert!(store.chart().activities.is_empty());
    }

    #[test]
    fn add_activity_assigns_order_and_membership() {
        let (mut store, rows) = store_with_rows(1);
        let a = store.add_activity(NewActivity::default(), rows[0]);
        let b = store.add_activity(NewActivity::default(), rows[0]);
        assert_eq!(store.chart().activity(a).unwrap().order, 0);
        assert_eq!(store.chart().activity(b).unwrap().order, 1);
        assert_eq!(store.chart().row(rows[0]).unwrap().activity_ids, vec![a, b]);
    }

    #[test]
    fn add_activity_to_unknown_row_still_creates_it() {
        let (mut store, _) = store_with_rows(1);
        let a = store.add_activity(NewActivity::default(), RowId::new(999));
        assert!(store.chart().activity(a).is_some());
    }

    #[test]
    fn update_applies_only_patched_fields() {
        let (mut store, rows) = store_with_rows(1);
        let a = store.add_activity(NewActivity::default(), rows[0]);
        store.update_activity(a, ActivityPatch::span(4, 6));
        let activity = store.chart().activity(a).unwrap();
        assert_eq!(activity.start_unit, 4);
        assert_eq!(activity.duration_units, 6);
        assert_eq!(activity.name, "New Activity");
    }

    #[test]
    fn annotation_can_be_set_and_cleared() {
        let (mut store, rows) = store_with_rows(1);
        let a = store.add_activity(NewActivity::default(), rows[0]);
        store.update_activity(
            a,
            ActivityPatch {
                annotation: Some(Some("note".to_owned())),
                ..ActivityPatch::default()
            },
        );
        assert_eq!(
            store.chart().activity(a).unwrap().annotation.as_deref(),
            Some("note")
        );
        store.update_activity(
            a,
            ActivityPatch {
                annotation: Some(None),
                ..ActivityPatch::default()
            },
        );
        assert_eq!(store.chart().activity(a).unwrap().annotation, None);
    }

    #[test]
    fn remove_activity_cascades() {
        let (mut store, rows) = store_with_rows(1);
        let a = store.add_activity(NewActivity::default(), rows[0]);
        let b = store.add_activity(NewActivity::default(), rows[0]);
        store
            .add_dependency(a, b, AnchorSide::Right, AnchorSide::Left)
            .unwrap();

        store.remove_activity(a);
        assert!(store.chart().activity(a).is_none());
        assert_eq!(store.chart().row(rows[0]).unwrap().activity_ids, vec![b]);
        assert!(store.chart().dependencies.is_empty());
    }

    #[test]
    fn re_parent_moves_membership() {
        let (mut store, rows) = store_with_rows(2);
        let a = store.add_activity(NewActivity::default(), rows[0]);
        store.re_parent_activity(a, rows[1]);
        assert!(store.chart().row(rows[0]).unwrap().activity_ids.is_empty());
        assert_eq!(store.chart().row(rows[1]).unwrap().activity_ids, vec![a]);
    }

    #[test]
    fn milestone_conversion_is_lossy() {
        let (mut store, rows) = store_with_rows(1);
        let a = store.add_activity(
            NewActivity {
                duration_units: 5,
                ..NewActivity::default()
            },
            rows[0],
        );
        store.set_milestone(a, true);
        let activity = store.chart().activity(a).unwrap();
        assert!(activity.is_milestone);
        assert_eq!(activity.duration_units, 1);

        store.set_milestone(a, false);
        let activity = store.chart().activity(a).unwrap();
        assert!(!activity.is_milestone);
        assert_eq!(activity.duration_units, 1); // 5 is gone for good
    }

    #[test]
    fn dependency_rejects_self_loop() {
        let (mut store, rows) = store_with_rows(1);
        let a = store.add_activity(NewActivity::default(), rows[0]);
        assert_eq!(
            store.add_dependency(a, a, AnchorSide::Right, AnchorSide::Left),
            None
        );
    }

    #[test]
    fn dependency_rejects_exact_duplicate() {
        let (mut store, rows) = store_with_rows(1);
        let a = store.add_activity(NewActivity::default(), rows[0]);
        let b = store.add_activity(NewActivity::default(), rows[0]);

        let first = store.add_dependency(a, b, AnchorSide::Right, AnchorSide::Left);
        assert!(first.is_some());
        let second = store.add_dependency(a, b, AnchorSide::Right, AnchorSide::Left);
        assert_eq!(second, None);
        assert_eq!(store.chart().dependencies.len(), 1);

        // A different side tuple is a distinct dependency.
        let third = store.add_dependency(a, b, AnchorSide::Bottom, AnchorSide::Top);
        assert!(third.is_some());
    }

    #[test]
    fn remove_dependency_by_id() {
        let (mut store, rows) = store_with_rows(1);
        let a = store.add_activity(NewActivity::default(), rows[0]);
        let b = store.add_activity(NewActivity::default(), rows[0]);
        let dep = store
            .add_dependency(a, b, AnchorSide::Right, AnchorSide::Left)
            .unwrap();
        store.remove_dependency(dep);
        assert!(store.chart().dependencies.is_empty());
    }

    #[test]
    fn insert_row_after_shifts_orders() {
        let (mut store, rows) = store_with_rows(2);
        let mid = store.insert_row_after(rows[0], "mid");
        let ordered: Vec<RowId> = store
            .chart()
            .rows_in_order()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ordered, vec![rows[0], mid, rows[1]]);
    }

    #[test]
    fn move_row_swaps_neighbors_and_clamps_at_edges() {
        let (mut store, rows) = store_with_rows(3);
        store.move_row(rows[2], RowDirection::Up);
        let ordered: Vec<RowId> = store
            .chart()
            .rows_in_order()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ordered, vec![rows[0], rows[2], rows[1]]);

        store.move_row(rows[0], RowDirection::Up); // already on top
        let ordered: Vec<RowId> = store
            .chart()
            .rows_in_order()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ordered[0], rows[0]);
    }

    #[test]
    fn last_row_refuses_to_merge() {
        let (mut store, rows) = store_with_rows(2);
        store.toggle_row_merge(rows[1]);
        assert!(!store.chart().row(rows[1]).unwrap().merged_with_next);

        store.toggle_row_merge(rows[0]);
        assert!(store.chart().row(rows[0]).unwrap().merged_with_next);
    }

    #[test]
    fn remove_row_cascades_and_clears_dangling_merge() {
        let (mut store, rows) = store_with_rows(3);
        let a = store.add_activity(NewActivity::default(), rows[1]);
        let b = store.add_activity(NewActivity::default(), rows[0]);
        store
            .add_dependency(b, a, AnchorSide::Right, AnchorSide::Left)
            .unwrap();
        store.toggle_row_merge(rows[0]);

        store.remove_row(rows[1]);
        assert!(store.chart().row(rows[1]).is_none());
        assert!(store.chart().activity(a).is_none());
        assert!(store.chart().activity(b).is_some());
        assert!(store.chart().dependencies.is_empty());
        assert!(!store.chart().row(rows[0]).unwrap().merged_with_next);
    }

    #[derive(Debug, Clone)]
    enum Op {
        AddRow,
        RemoveRow(usize),
        AddActivity { row: usize, milestone: bool, span: u8 },
        RemoveActivity(usize),
        ReParent { activity: usize, row: usize },
        Connect { from: usize, to: usize },
        MoveRow { row: usize, up: bool },
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::AddRow),
            (0..8usize).prop_map(Op::RemoveRow),
            (0..8usize, any::<bool>(), 0..4u8)
                .prop_map(|(row, milestone, span)| Op::AddActivity { row, milestone, span }),
            (0..16usize).prop_map(Op::RemoveActivity),
            (0..16usize, 0..8usize).prop_map(|(activity, row)| Op::ReParent { activity, row }),
            (0..16usize, 0..16usize).prop_map(|(from, to)| Op::Connect { from, to }),
            (0..8usize, any::<bool>()).prop_map(|(row, up)| Op::MoveRow { row, up }),
        ]
    }

    fn apply(store: &mut ChartStore, op: Op) {
        let rows: Vec<RowId> = store.chart().rows.iter().map(|r| r.id).collect();
        let activities: Vec<ActivityId> = store.chart().activities.iter().map(|a| a.id).collect();
        match op {
            Op::AddRow => {
                store.add_row("row");
            }
            Op::RemoveRow(i) => {
                if let Some(id) = rows.get(i) {
                    store.remove_row(*id);
                }
            }
            Op::AddActivity { row, milestone, span } => {
                if let Some(id) = rows.get(row) {
                    store.add_activity(
                        NewActivity {
                            is_milestone: milestone,
                            duration_units: 3,
                            row_span: span,
                            ..NewActivity::default()
                        },
                        *id,
                    );
                }
            }
            Op::RemoveActivity(i) => {
                if let Some(id) = activities.get(i) {
                    store.remove_activity(*id);
                }
            }
            Op::ReParent { activity, row } => {
                if let (Some(a), Some(r)) = (activities.get(activity), rows.get(row)) {
                    store.re_parent_activity(*a, *r);
                }
            }
            Op::Connect { from, to } => {
                if let (Some(f), Some(t)) = (activities.get(from), activities.get(to)) {
                    store.add_dependency(*f, *t, AnchorSide::Right, AnchorSide::Left);
                }
            }
            Op::MoveRow { row, up } => {
                if let Some(id) = rows.get(row) {
                    let dir = if up { RowDirection::Up } else { RowDirection::Down };
                    store.move_row(*id, dir);
                }
            }
        }
    }

    proptest! {
        // Referential integrity holds under any mutation sequence: no
        // dangling membership, no dangling dependency endpoints, no
        // self-loops, field ranges respected.
        #[test]
        fn random_mutations_keep_the_chart_consistent(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut store = ChartStore::new();
            for op in ops {
                apply(&mut store, op);
            }
            let chart = store.chart();

            for row in &chart.rows {
                for id in &row.activity_ids {
                    prop_assert!(chart.activity(*id).is_some());
                }
            }
            for activity in &chart.activities {
                let memberships = chart
                    .rows
                    .iter()
                    .filter(|r| r.activity_ids.contains(&activity.id))
                    .count();
                prop_assert!(memberships <= 1);
                prop_assert!(activity.duration_units >= 1);
                prop_assert!((1..=2).contains(&activity.row_span));
                if activity.is_milestone {
                    prop_assert_eq!(activity.duration_units, 1);
                }
            }
            for dep in &chart.dependencies {
                prop_assert!(chart.activity(dep.from_activity).is_some());
                prop_assert!(chart.activity(dep.to_activity).is_some());
                prop_assert_ne!(dep.from_activity, dep.to_activity);
            }
            let mut orders: Vec<u32> = chart.rows.iter().map(|r| r.order).collect();
            orders.sort_unstable();
            orders.dedup();
            prop_assert_eq!(orders.len(), chart.rows.len());
        }
    }

    #[test]
    fn with_chart_resumes_id_counter() {
        let mut chart = Chart::named("c");
        chart.rows.push(Row {
            id: RowId::new(41),
            name: String::new(),
            order: 0,
            activity_ids: Vec::new(),
            merged_with_next: false,
        });
        let mut store = ChartStore::with_chart(chart);
        let row = store.add_row("next");
        assert_eq!(row.get(), 42);
    }
}
