use crate::backend::native::{NativePolygon, NativeShape};
use crate::coord::Coordinate;

/// A square with a triangular hole.
pub(crate) fn with_hole() -> NativeShape {
    NativeShape::Polygon(NativePolygon {
        shell: vec![
            Coordinate::new(0., 0.),
            Coordinate::new(10., 0.),
            Coordinate::new(10., 10.),
            Coordinate::new(0., 10.),
            Coordinate::new(0., 0.),
        ],
        holes: vec![vec![
            Coordinate::new(2., 2.),
            Coordinate::new(4., 2.),
            Coordinate::new(4., 4.),
            Coordinate::new(2., 2.),
        ]],
    })
}
