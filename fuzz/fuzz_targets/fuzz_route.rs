#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tgrid_geometry::route::{path_data, route, route_to_pointer};
use tgrid_geometry::{AnchorSide, Point};

#[derive(Debug, Arbitrary)]
struct Input {
    fx: i16,
    fy: i16,
    tx: i16,
    ty: i16,
    from_side: u8,
    to_side: u8,
    row_height: u8,
}

fn side(raw: u8) -> AnchorSide {
    AnchorSide::ALL[usize::from(raw) % AnchorSide::ALL.len()]
}

fuzz_target!(|input: Input| {
    let from = Point::new(f32::from(input.fx), f32::from(input.fy));
    let to = Point::new(f32::from(input.tx), f32::from(input.ty));
    let from_side = side(input.from_side);
    let to_side = side(input.to_side);
    let row_height = f32::from(input.row_height.max(1));

    let points = route(from, from_side, to, to_side, row_height);

    // Post-conditions that must always hold:
    assert!(points.len() >= 2, "route shorter than a segment");
    assert!(points.len() <= 6, "route longer than the detour shape");
    assert_eq!(points[0], from, "route does not start at the from anchor");
    assert_eq!(*points.last().unwrap(), to, "route does not end at the to anchor");
    for pair in points.windows(2) {
        let same_x = (pair[0].x - pair[1].x).abs() < 1e-3;
        let same_y = (pair[0].y - pair[1].y).abs() < 1e-3;
        assert!(same_x || same_y, "diagonal segment in {points:?}");
    }

    // Every point must survive serialization to SVG path data.
    let data = path_data(&points);
    assert!(data.starts_with('M'));

    let trail = route_to_pointer(from, from_side, to);
    assert_eq!(trail[0], from);
    assert_eq!(*trail.last().unwrap(), to);
});
