//! The [`ShapeBuilder`] trait, the only seam between the codecs and a geometry backend.

use crate::coord::Coordinate;
use crate::error::{GeoCodecError, Result};
use crate::json::{JsonValue, Properties};
use crate::kind::ShapeKind;

/// An axis-aligned bounding box given by two corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min: Coordinate,
    pub max: Coordinate,
}

/// A circle given by its center and radius, in the units of the shorthand text form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Coordinate,
    pub radius: f64,
}

/// The parts of a feature as they cross the builder boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureParts<S> {
    pub geometry: Option<S>,
    pub id: Option<JsonValue>,
    pub properties: Properties,
}

/// Construct and deconstruct the shapes of one geometry backend.
///
/// Every kind of shape has a `to_*` method that builds it from neutral coordinates and a
/// `from_*` method that extracts them again. Polygons are passed as a list of rings whose first
/// entry is the shell; an empty list (or `None` for a point) means the empty shape, and builders
/// must return their canonical empty instance for it.
///
/// Kinds a backend cannot represent are declined through [`supports`](Self::supports). The
/// methods for the optional kinds default to failing with
/// [`GeoCodecError::UnsupportedVariant`], so a builder only implements what it supports.
///
/// Builders are used through shared references and may be shared between threads if the
/// implementation is itself `Sync`.
pub trait ShapeBuilder {
    /// The backend's shape handle.
    type Shape;

    /// Identify the kind of a shape.
    ///
    /// Fails with [`GeoCodecError::Serialization`] for shapes that map onto no kind.
    fn kind_of(&self, shape: &Self::Shape) -> Result<ShapeKind>;

    /// Whether this backend can build and extract shapes of `kind`.
    fn supports(&self, kind: ShapeKind) -> bool;

    fn to_point(&self, coord: Option<Coordinate>) -> Result<Self::Shape>;

    fn to_line_string(&self, coords: Vec<Coordinate>) -> Result<Self::Shape>;

    fn to_polygon(&self, rings: Vec<Vec<Coordinate>>) -> Result<Self::Shape>;

    fn to_multi_point(&self, coords: Vec<Coordinate>) -> Result<Self::Shape>;

    fn to_multi_line_string(&self, lines: Vec<Vec<Coordinate>>) -> Result<Self::Shape>;

    fn to_multi_polygon(&self, polygons: Vec<Vec<Vec<Coordinate>>>) -> Result<Self::Shape>;

    fn to_geometry_collection(&self, geometries: Vec<Self::Shape>) -> Result<Self::Shape>;

    fn to_linear_ring(&self, _coords: Vec<Coordinate>) -> Result<Self::Shape> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::LinearRing))
    }

    fn to_feature(&self, _feature: FeatureParts<Self::Shape>) -> Result<Self::Shape> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::Feature))
    }

    fn to_feature_collection(&self, _features: Vec<Self::Shape>) -> Result<Self::Shape> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::FeatureCollection))
    }

    fn to_envelope(&self, _envelope: Envelope) -> Result<Self::Shape> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::Envelope))
    }

    fn to_circle(&self, _circle: Circle) -> Result<Self::Shape> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::Circle))
    }

    /// `None` for the empty point.
    fn from_point(&self, point: &Self::Shape) -> Result<Option<Coordinate>>;

    fn from_line_string(&self, line_string: &Self::Shape) -> Result<Vec<Coordinate>>;

    fn from_polygon(&self, polygon: &Self::Shape) -> Result<Vec<Vec<Coordinate>>>;

    fn from_multi_point(&self, multi_point: &Self::Shape) -> Result<Vec<Coordinate>>;

    fn from_multi_line_string(&self, multi_line_string: &Self::Shape)
        -> Result<Vec<Vec<Coordinate>>>;

    fn from_multi_polygon(&self, multi_polygon: &Self::Shape) -> Result<Vec<Vec<Vec<Coordinate>>>>;

    fn from_geometry_collection(&self, collection: &Self::Shape) -> Result<Vec<Self::Shape>>;

    fn from_linear_ring(&self, _linear_ring: &Self::Shape) -> Result<Vec<Coordinate>> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::LinearRing))
    }

    fn from_feature(&self, _feature: &Self::Shape) -> Result<FeatureParts<Self::Shape>> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::Feature))
    }

    fn from_feature_collection(&self, _collection: &Self::Shape) -> Result<Vec<Self::Shape>> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::FeatureCollection))
    }

    fn from_envelope(&self, _envelope: &Self::Shape) -> Result<Envelope> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::Envelope))
    }

    fn from_circle(&self, _circle: &Self::Shape) -> Result<Circle> {
        Err(GeoCodecError::UnsupportedVariant(ShapeKind::Circle))
    }
}

/// Fail with [`GeoCodecError::UnsupportedVariant`] unless `builder` supports `kind`.
pub(crate) fn ensure_supported<B: ShapeBuilder>(builder: &B, kind: ShapeKind) -> Result<()> {
    if builder.supports(kind) {
        Ok(())
    } else {
        Err(GeoCodecError::UnsupportedVariant(kind))
    }
}

/// A builder handed a shape of the wrong kind for the method called.
pub(crate) fn wrong_kind(expected: ShapeKind, found: impl std::fmt::Display) -> GeoCodecError {
    GeoCodecError::Builder(format!("expected a {expected}, found {found}"))
}
