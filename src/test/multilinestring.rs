use crate::backend::native::NativeShape;
use crate::coord::Coordinate;
use crate::test::point::{c0, c1, c2};

pub(crate) fn mls0() -> NativeShape {
    NativeShape::MultiLineString(vec![
        vec![c0(), c1()],
        vec![c2(), Coordinate::new(0., 0.)],
    ])
}

/// Every line at a different elevation.
pub(crate) fn mls_z() -> NativeShape {
    NativeShape::MultiLineString(vec![
        vec![Coordinate::new_z(0., 1., 10.), Coordinate::new_z(1., 2., 10.)],
        vec![Coordinate::new_z(3., 4., 20.), Coordinate::new_z(5., 6., 20.)],
    ])
}
