use crate::backend::native::{NativePolygon, NativeShape};
use crate::coord::Coordinate;

fn triangle(offset: f64) -> NativePolygon {
    NativePolygon {
        shell: vec![
            Coordinate::new(offset, offset),
            Coordinate::new(offset + 1., offset),
            Coordinate::new(offset + 1., offset + 1.),
            Coordinate::new(offset, offset),
        ],
        holes: vec![],
    }
}

/// `MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)), ((2 2, 3 2, 3 3, 2 2)))`
pub(crate) fn two_triangles() -> NativeShape {
    NativeShape::MultiPolygon(vec![triangle(0.), triangle(2.)])
}
