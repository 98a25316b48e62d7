//! The neutral coordinate passed between the codecs and a [`ShapeBuilder`].
//!
//! [`ShapeBuilder`]: crate::ShapeBuilder

use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Which optional ordinates a coordinate carries.
///
/// Always derived from the data, never stored alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimensions {
    #[default]
    Xy,
    Xyz,
    Xym,
    Xyzm,
}

impl Dimensions {
    pub const fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => Dimensions::Xy,
            (true, false) => Dimensions::Xyz,
            (false, true) => Dimensions::Xym,
            (true, true) => Dimensions::Xyzm,
        }
    }

    pub const fn has_z(&self) -> bool {
        matches!(self, Dimensions::Xyz | Dimensions::Xyzm)
    }

    pub const fn has_m(&self) -> bool {
        matches!(self, Dimensions::Xym | Dimensions::Xyzm)
    }

    /// Number of ordinates, including x and y.
    pub const fn size(&self) -> usize {
        match self {
            Dimensions::Xy => 2,
            Dimensions::Xyz | Dimensions::Xym => 3,
            Dimensions::Xyzm => 4,
        }
    }

    /// The union of the dimensions of every coordinate yielded.
    pub fn of<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Self {
        coords
            .into_iter()
            .fold(Dimensions::Xy, |acc, coord| acc | coord.dim())
    }
}

impl BitOr for Dimensions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Dimensions::from_flags(self.has_z() || rhs.has_z(), self.has_m() || rhs.has_m())
    }
}

impl BitOrAssign for Dimensions {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// A single position with optional elevation (`z`) and measure (`m`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    pub const fn new_z(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    pub const fn new_m(x: f64, y: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: Some(m),
        }
    }

    pub const fn new_zm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: Some(m),
        }
    }

    pub const fn dim(&self) -> Dimensions {
        Dimensions::from_flags(self.z.is_some(), self.m.is_some())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dimensions_follow_present_ordinates() {
        assert_eq!(Coordinate::new(1., 2.).dim(), Dimensions::Xy);
        assert_eq!(Coordinate::new_z(1., 2., 3.).dim(), Dimensions::Xyz);
        assert_eq!(Coordinate::new_m(1., 2., 3.).dim(), Dimensions::Xym);
        assert_eq!(Coordinate::new_zm(1., 2., 3., 4.).dim(), Dimensions::Xyzm);
    }

    #[test]
    fn union_of_mixed_coordinates() {
        let coords = [
            Coordinate::new(0., 0.),
            Coordinate::new_z(1., 1., 5.),
            Coordinate::new_m(2., 2., 7.),
        ];
        assert_eq!(Dimensions::of(&coords), Dimensions::Xyzm);
        assert_eq!(Dimensions::of(&coords[..2]), Dimensions::Xyz);
        assert_eq!(Dimensions::of([]), Dimensions::Xy);
    }

    #[test]
    fn size_counts_x_and_y() {
        assert_eq!(Dimensions::Xy.size(), 2);
        assert_eq!(Dimensions::Xym.size(), 3);
        assert_eq!(Dimensions::Xyzm.size(), 4);
    }
}
