#![forbid(unsafe_code)]

//! Geometry: coordinate mapping and dependency routing for timegrid.
//!
//! # Role in timegrid
//! `tgrid-geometry` is the leaf crate. It owns the pixel-space primitives
//! and the two pure engines the rest of the system leans on:
//!
//! - **Coordinate mapper** ([`mapper`]): domain time-units (start unit,
//!   duration, row span) into axis-aligned pixel rectangles, plus the
//!   pixel⇄unit conversions the gesture machines use.
//! - **Path router** ([`route`]): orthogonal polylines between anchor
//!   points on activity rectangles, including the backward-route detour
//!   and the simplified ghost path used while a connect drag is live.
//!
//! # How it fits in the system
//! `tgrid-core` builds its row layout on these rectangles; the gesture
//! machines in `tgrid-gestures` convert pointer pixels into units through
//! [`mapper`] and feed anchor points through [`route`] for live previews.
//! Everything here is stateless and never allocates beyond the returned
//! polylines.

pub mod mapper;
pub mod point;
pub mod rect;
pub mod route;
pub mod side;

pub use point::Point;
pub use rect::Rect;
pub use side::AnchorSide;
