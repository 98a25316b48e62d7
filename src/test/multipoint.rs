use crate::backend::native::NativeShape;
use crate::test::point::{c0, c1};

pub(crate) fn mp0() -> NativeShape {
    NativeShape::MultiPoint(vec![c0(), c1()])
}
