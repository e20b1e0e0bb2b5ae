#![forbid(unsafe_code)]

//! Core: chart domain model, mutation store, row layout, and view state.
//!
//! # Role in timegrid
//! `tgrid-core` owns the entities the gesture machines read and mutate:
//! activities, rows, and dependencies, plus the derived row layout and
//! the zoom/scale settings that determine unit width and row height.
//!
//! # Primary responsibilities
//! - **Model** ([`model`]): serde-round-trippable chart entities with
//!   newtype ids.
//! - **Store** ([`store`]): the single mutation/query surface. Every
//!   mutation applies atomically and synchronously; invalid requests
//!   (unknown ids, duplicate dependencies, self-loops) are no-ops rather
//!   than errors.
//! - **Layout** ([`layout`]): ordered rows to pixel y-bands, and reverse
//!   lookups from a pointer y or an activity id back to a row.
//! - **View** ([`view`]): timeline scale, zoom clamps, row sizing,
//!   dependency mode, and transient selection.

pub mod layout;
pub mod model;
pub mod store;
pub mod view;

pub use layout::{RowBand, RowLayout};
pub use model::{
    Activity, ActivityId, ActivityPatch, Chart, Dependency, DependencyId, NewActivity, Row, RowId,
};
pub use store::{ChartStore, RowDirection};
pub use view::{RowSize, TimeScale, ViewSettings};
