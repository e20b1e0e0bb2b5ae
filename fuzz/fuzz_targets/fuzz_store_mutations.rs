#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tgrid_core::model::{ActivityId, NewActivity, RowId};
use tgrid_core::store::{ChartStore, RowDirection};
use tgrid_geometry::AnchorSide;

#[derive(Debug, Arbitrary)]
enum Op {
    AddRow,
    InsertRowAfter { row: u8 },
    RemoveRow { row: u8 },
    MoveRow { row: u8, up: bool },
    ToggleMerge { row: u8 },
    AddActivity { row: u8, start: u8, duration: u8, milestone: bool, span: u8 },
    RemoveActivity { activity: u8 },
    ReParent { activity: u8, row: u8 },
    SetMilestone { activity: u8, on: bool },
    Connect { from: u8, to: u8, from_side: u8, to_side: u8 },
    RemoveDependency { dependency: u8 },
}

fn side(raw: u8) -> AnchorSide {
    AnchorSide::ALL[usize::from(raw) % AnchorSide::ALL.len()]
}

fn row_at(store: &ChartStore, i: u8) -> Option<RowId> {
    let rows = &store.chart().rows;
    if rows.is_empty() {
        return None;
    }
    Some(rows[usize::from(i) % rows.len()].id)
}

fn activity_at(store: &ChartStore, i: u8) -> Option<ActivityId> {
    let activities = &store.chart().activities;
    if activities.is_empty() {
        return None;
    }
    Some(activities[usize::from(i) % activities.len()].id)
}

fuzz_target!(|ops: Vec<Op>| {
    let mut store = ChartStore::new();
    for op in ops {
        match op {
            Op::AddRow => {
                store.add_row("row");
            }
            Op::InsertRowAfter { row } => {
                if let Some(id) = row_at(&store, row) {
                    store.insert_row_after(id, "row");
                }
            }
            Op::RemoveRow { row } => {
                if let Some(id) = row_at(&store, row) {
                    store.remove_row(id);
                }
            }
            Op::MoveRow { row, up } => {
                if let Some(id) = row_at(&store, row) {
                    let dir = if up { RowDirection::Up } else { RowDirection::Down };
                    store.move_row(id, dir);
                }
            }
            Op::ToggleMerge { row } => {
                if let Some(id) = row_at(&store, row) {
                    store.toggle_row_merge(id);
                }
            }
            Op::AddActivity { row, start, duration, milestone, span } => {
                if let Some(id) = row_at(&store, row) {
                    store.add_activity(
                        NewActivity {
                            start_unit: u32::from(start),
                            duration_units: u32::from(duration),
                            is_milestone: milestone,
                            row_span: span,
                            ..NewActivity::default()
                        },
                        id,
                    );
                }
            }
            Op::RemoveActivity { activity } => {
                if let Some(id) = activity_at(&store, activity) {
                    store.remove_activity(id);
                }
            }
            Op::ReParent { activity, row } => {
                if let (Some(a), Some(r)) = (activity_at(&store, activity), row_at(&store, row)) {
                    store.re_parent_activity(a, r);
                }
            }
            Op::SetMilestone { activity, on } => {
                if let Some(id) = activity_at(&store, activity) {
                    store.set_milestone(id, on);
                }
            }
            Op::Connect { from, to, from_side, to_side } => {
                if let (Some(f), Some(t)) = (activity_at(&store, from), activity_at(&store, to)) {
                    store.add_dependency(f, t, side(from_side), side(to_side));
                }
            }
            Op::RemoveDependency { dependency } => {
                let deps = &store.chart().dependencies;
                if !deps.is_empty() {
                    let id = deps[usize::from(dependency) % deps.len()].id;
                    store.remove_dependency(id);
                }
            }
        }
    }

    // Post-conditions that must always hold:
    let chart = store.chart();
    for row in &chart.rows {
        for id in &row.activity_ids {
            assert!(chart.activity(*id).is_some(), "dangling membership");
        }
    }
    for activity in &chart.activities {
        assert!(activity.duration_units >= 1, "zero-duration activity");
        assert!((1..=2).contains(&activity.row_span), "row_span OOB");
        if activity.is_milestone {
            assert_eq!(activity.duration_units, 1, "long milestone");
        }
        let memberships = chart
            .rows
            .iter()
            .filter(|r| r.activity_ids.contains(&activity.id))
            .count();
        assert!(memberships <= 1, "activity in multiple rows");
    }
    for dep in &chart.dependencies {
        assert!(chart.activity(dep.from_activity).is_some(), "dangling from");
        assert!(chart.activity(dep.to_activity).is_some(), "dangling to");
        assert_ne!(dep.from_activity, dep.to_activity, "self-loop");
    }

    // Row orders stay unique, so the visual order is total.
    let mut orders: Vec<u32> = chart.rows.iter().map(|r| r.order).collect();
    orders.sort_unstable();
    orders.dedup();
    assert_eq!(orders.len(), chart.rows.len(), "duplicate row order");
});
