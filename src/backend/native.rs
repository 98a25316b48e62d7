//! A lossless shape model owned by this crate.
//!
//! Every kind is supported and every ordinate is kept, which makes [`NativeBuilder`] the
//! reference backend for round trips through both formats.

use crate::builder::{wrong_kind, Circle, Envelope, FeatureParts, ShapeBuilder};
use crate::coord::Coordinate;
use crate::error::Result;
use crate::json::{JsonValue, Properties};
use crate::kind::ShapeKind;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativePolygon {
    pub shell: Vec<Coordinate>,
    pub holes: Vec<Vec<Coordinate>>,
}

impl NativePolygon {
    /// Split a ring list into shell and holes. No rings is the empty polygon.
    pub fn from_rings(rings: Vec<Vec<Coordinate>>) -> Self {
        let mut rings = rings.into_iter();
        let shell = rings.next().unwrap_or_default();
        Self {
            shell,
            holes: rings.collect(),
        }
    }

    /// The shell followed by the holes. The empty polygon has no rings.
    pub fn rings(&self) -> Vec<Vec<Coordinate>> {
        if self.shell.is_empty() && self.holes.is_empty() {
            return vec![];
        }
        std::iter::once(&self.shell)
            .chain(&self.holes)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativeFeature {
    pub geometry: Option<Box<NativeShape>>,
    pub id: Option<JsonValue>,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NativeShape {
    /// `None` is the empty point.
    Point(Option<Coordinate>),
    LineString(Vec<Coordinate>),
    LinearRing(Vec<Coordinate>),
    Polygon(NativePolygon),
    MultiPoint(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<NativePolygon>),
    GeometryCollection(Vec<NativeShape>),
    Feature(NativeFeature),
    FeatureCollection(Vec<NativeFeature>),
    Envelope(Envelope),
    Circle(Circle),
}

impl NativeShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            NativeShape::Point(_) => ShapeKind::Point,
            NativeShape::LineString(_) => ShapeKind::LineString,
            NativeShape::LinearRing(_) => ShapeKind::LinearRing,
            NativeShape::Polygon(_) => ShapeKind::Polygon,
            NativeShape::MultiPoint(_) => ShapeKind::MultiPoint,
            NativeShape::MultiLineString(_) => ShapeKind::MultiLineString,
            NativeShape::MultiPolygon(_) => ShapeKind::MultiPolygon,
            NativeShape::GeometryCollection(_) => ShapeKind::GeometryCollection,
            NativeShape::Feature(_) => ShapeKind::Feature,
            NativeShape::FeatureCollection(_) => ShapeKind::FeatureCollection,
            NativeShape::Envelope(_) => ShapeKind::Envelope,
            NativeShape::Circle(_) => ShapeKind::Circle,
        }
    }
}

/// Builds [`NativeShape`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBuilder;

impl ShapeBuilder for NativeBuilder {
    type Shape = NativeShape;

    fn kind_of(&self, shape: &NativeShape) -> Result<ShapeKind> {
        Ok(shape.kind())
    }

    fn supports(&self, _kind: ShapeKind) -> bool {
        true
    }

    fn to_point(&self, coord: Option<Coordinate>) -> Result<NativeShape> {
        Ok(NativeShape::Point(coord))
    }

    fn to_line_string(&self, coords: Vec<Coordinate>) -> Result<NativeShape> {
        Ok(NativeShape::LineString(coords))
    }

    fn to_polygon(&self, rings: Vec<Vec<Coordinate>>) -> Result<NativeShape> {
        Ok(NativeShape::Polygon(NativePolygon::from_rings(rings)))
    }

    fn to_multi_point(&self, coords: Vec<Coordinate>) -> Result<NativeShape> {
        Ok(NativeShape::MultiPoint(coords))
    }

    fn to_multi_line_string(&self, lines: Vec<Vec<Coordinate>>) -> Result<NativeShape> {
        Ok(NativeShape::MultiLineString(lines))
    }

    fn to_multi_polygon(&self, polygons: Vec<Vec<Vec<Coordinate>>>) -> Result<NativeShape> {
        Ok(NativeShape::MultiPolygon(
            polygons.into_iter().map(NativePolygon::from_rings).collect(),
        ))
    }

    fn to_geometry_collection(&self, geometries: Vec<NativeShape>) -> Result<NativeShape> {
        Ok(NativeShape::GeometryCollection(geometries))
    }

    fn to_linear_ring(&self, coords: Vec<Coordinate>) -> Result<NativeShape> {
        Ok(NativeShape::LinearRing(coords))
    }

    fn to_feature(&self, feature: FeatureParts<NativeShape>) -> Result<NativeShape> {
        Ok(NativeShape::Feature(NativeFeature {
            geometry: feature.geometry.map(Box::new),
            id: feature.id,
            properties: feature.properties,
        }))
    }

    fn to_feature_collection(&self, features: Vec<NativeShape>) -> Result<NativeShape> {
        let features = features
            .into_iter()
            .map(|shape| match shape {
                NativeShape::Feature(feature) => Ok(feature),
                other => Err(wrong_kind(ShapeKind::Feature, other.kind())),
            })
            .collect::<Result<_>>()?;
        Ok(NativeShape::FeatureCollection(features))
    }

    fn to_envelope(&self, envelope: Envelope) -> Result<NativeShape> {
        Ok(NativeShape::Envelope(envelope))
    }

    fn to_circle(&self, circle: Circle) -> Result<NativeShape> {
        Ok(NativeShape::Circle(circle))
    }

    fn from_point(&self, point: &NativeShape) -> Result<Option<Coordinate>> {
        match point {
            NativeShape::Point(coord) => Ok(*coord),
            other => Err(wrong_kind(ShapeKind::Point, other.kind())),
        }
    }

    fn from_line_string(&self, line_string: &NativeShape) -> Result<Vec<Coordinate>> {
        match line_string {
            NativeShape::LineString(coords) => Ok(coords.clone()),
            other => Err(wrong_kind(ShapeKind::LineString, other.kind())),
        }
    }

    fn from_polygon(&self, polygon: &NativeShape) -> Result<Vec<Vec<Coordinate>>> {
        match polygon {
            NativeShape::Polygon(polygon) => Ok(polygon.rings()),
            other => Err(wrong_kind(ShapeKind::Polygon, other.kind())),
        }
    }

    fn from_multi_point(&self, multi_point: &NativeShape) -> Result<Vec<Coordinate>> {
        match multi_point {
            NativeShape::MultiPoint(coords) => Ok(coords.clone()),
            other => Err(wrong_kind(ShapeKind::MultiPoint, other.kind())),
        }
    }

    fn from_multi_line_string(
        &self,
        multi_line_string: &NativeShape,
    ) -> Result<Vec<Vec<Coordinate>>> {
        match multi_line_string {
            NativeShape::MultiLineString(lines) => Ok(lines.clone()),
            other => Err(wrong_kind(ShapeKind::MultiLineString, other.kind())),
        }
    }

    fn from_multi_polygon(&self, multi_polygon: &NativeShape) -> Result<Vec<Vec<Vec<Coordinate>>>> {
        match multi_polygon {
            NativeShape::MultiPolygon(polygons) => {
                Ok(polygons.iter().map(NativePolygon::rings).collect())
            }
            other => Err(wrong_kind(ShapeKind::MultiPolygon, other.kind())),
        }
    }

    fn from_geometry_collection(&self, collection: &NativeShape) -> Result<Vec<NativeShape>> {
        match collection {
            NativeShape::GeometryCollection(geometries) => Ok(geometries.clone()),
            other => Err(wrong_kind(ShapeKind::GeometryCollection, other.kind())),
        }
    }

    fn from_linear_ring(&self, linear_ring: &NativeShape) -> Result<Vec<Coordinate>> {
        match linear_ring {
            NativeShape::LinearRing(coords) => Ok(coords.clone()),
            other => Err(wrong_kind(ShapeKind::LinearRing, other.kind())),
        }
    }

    fn from_feature(&self, feature: &NativeShape) -> Result<FeatureParts<NativeShape>> {
        match feature {
            NativeShape::Feature(feature) => Ok(FeatureParts {
                geometry: feature.geometry.as_deref().cloned(),
                id: feature.id.clone(),
                properties: feature.properties.clone(),
            }),
            other => Err(wrong_kind(ShapeKind::Feature, other.kind())),
        }
    }

    fn from_feature_collection(&self, collection: &NativeShape) -> Result<Vec<NativeShape>> {
        match collection {
            NativeShape::FeatureCollection(features) => {
                Ok(features.iter().cloned().map(NativeShape::Feature).collect())
            }
            other => Err(wrong_kind(ShapeKind::FeatureCollection, other.kind())),
        }
    }

    fn from_envelope(&self, envelope: &NativeShape) -> Result<Envelope> {
        match envelope {
            NativeShape::Envelope(envelope) => Ok(*envelope),
            other => Err(wrong_kind(ShapeKind::Envelope, other.kind())),
        }
    }

    fn from_circle(&self, circle: &NativeShape) -> Result<Circle> {
        match circle {
            NativeShape::Circle(circle) => Ok(*circle),
            other => Err(wrong_kind(ShapeKind::Circle, other.kind())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::GeoCodecError;
    use crate::test::polygon;

    #[test]
    fn polygon_rings_round_trip() {
        let NativeShape::Polygon(with_hole) = polygon::with_hole() else {
            unreachable!()
        };
        let rings = with_hole.rings();
        assert_eq!(rings.len(), 2);
        assert_eq!(NativePolygon::from_rings(rings), with_hole);

        assert!(NativePolygon::default().rings().is_empty());
        assert_eq!(NativePolygon::from_rings(vec![]), NativePolygon::default());
    }

    #[test]
    fn extracting_the_wrong_kind_fails() {
        let point = NativeShape::Point(None);
        assert!(matches!(
            NativeBuilder.from_line_string(&point),
            Err(GeoCodecError::Builder(msg)) if msg == "expected a LineString, found Point"
        ));
    }

    #[test]
    fn feature_collection_only_takes_features() {
        assert!(NativeBuilder
            .to_feature_collection(vec![NativeShape::Point(None)])
            .is_err());

        let feature = NativeBuilder
            .to_feature(FeatureParts {
                geometry: None,
                id: None,
                properties: Properties::new(),
            })
            .unwrap();
        let collection = NativeBuilder.to_feature_collection(vec![feature.clone()]).unwrap();
        assert_eq!(NativeBuilder.from_feature_collection(&collection).unwrap(), vec![feature]);
    }
}
