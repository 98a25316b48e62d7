//! Build the [`geojson`] crate's [`GeoJson`] values.
//!
//! Positions keep z, and m only alongside z. The empty point is a point with an empty position.
//! Features and feature collections are supported; linear rings, envelopes and circles are not.

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Position, Value as GeometryValue};
use serde_json::Number;

use crate::builder::{wrong_kind, FeatureParts, ShapeBuilder};
use crate::coord::Coordinate;
use crate::error::{GeoCodecError, Result};
use crate::json::{properties_to_json, JsonValue};
use crate::kind::ShapeKind;

/// Builds [`GeoJson`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonBuilder;

fn position(coord: &Coordinate) -> Position {
    let mut position = vec![coord.x, coord.y];
    if let Some(z) = coord.z {
        position.push(z);
        position.extend(coord.m);
    }
    position
}

fn positions(coords: &[Coordinate]) -> Vec<Position> {
    coords.iter().map(position).collect()
}

fn coordinate(position: &[f64]) -> Result<Coordinate> {
    match position {
        [x, y] => Ok(Coordinate::new(*x, *y)),
        [x, y, z] => Ok(Coordinate::new_z(*x, *y, *z)),
        [x, y, z, m, ..] => Ok(Coordinate::new_zm(*x, *y, *z, *m)),
        _ => Err(GeoCodecError::Builder(format!(
            "a position needs at least 2 ordinates, found {}",
            position.len()
        ))),
    }
}

fn coordinates(positions: &[Position]) -> Result<Vec<Coordinate>> {
    positions.iter().map(|p| coordinate(p)).collect()
}

fn coordinate_lists(lists: &[Vec<Position>]) -> Result<Vec<Vec<Coordinate>>> {
    lists.iter().map(|list| coordinates(list)).collect()
}

fn kind(shape: &GeoJson) -> ShapeKind {
    match shape {
        GeoJson::Geometry(geometry) => match &geometry.value {
            GeometryValue::Point(_) => ShapeKind::Point,
            GeometryValue::LineString(_) => ShapeKind::LineString,
            GeometryValue::Polygon(_) => ShapeKind::Polygon,
            GeometryValue::MultiPoint(_) => ShapeKind::MultiPoint,
            GeometryValue::MultiLineString(_) => ShapeKind::MultiLineString,
            GeometryValue::MultiPolygon(_) => ShapeKind::MultiPolygon,
            GeometryValue::GeometryCollection(_) => ShapeKind::GeometryCollection,
        },
        GeoJson::Feature(_) => ShapeKind::Feature,
        GeoJson::FeatureCollection(_) => ShapeKind::FeatureCollection,
    }
}

fn geometry_value(shape: &GeoJson) -> Option<&GeometryValue> {
    match shape {
        GeoJson::Geometry(geometry) => Some(&geometry.value),
        _ => None,
    }
}

fn shape(value: GeometryValue) -> GeoJson {
    GeoJson::Geometry(Geometry::new(value))
}

fn into_geometry(shape: GeoJson) -> Result<Geometry> {
    match shape {
        GeoJson::Geometry(geometry) => Ok(geometry),
        other => Err(GeoCodecError::Builder(format!(
            "expected a geometry, found {}",
            kind(&other)
        ))),
    }
}

fn id_to_geojson(id: JsonValue) -> Result<Id> {
    match id {
        JsonValue::String(id) => Ok(Id::String(id)),
        JsonValue::Integer(id) => Ok(Id::Number(id.into())),
        JsonValue::Float(id) => Number::from_f64(id)
            .map(Id::Number)
            .ok_or_else(|| GeoCodecError::Builder(format!("{id} cannot be a feature id"))),
        other => Err(GeoCodecError::Builder(format!(
            "{other:?} cannot be a feature id"
        ))),
    }
}

fn id_from_geojson(id: &Id) -> JsonValue {
    match id {
        Id::String(id) => JsonValue::String(id.clone()),
        Id::Number(id) => JsonValue::from(&serde_json::Value::Number(id.clone())),
    }
}

impl ShapeBuilder for GeoJsonBuilder {
    type Shape = GeoJson;

    fn kind_of(&self, shape: &GeoJson) -> Result<ShapeKind> {
        Ok(kind(shape))
    }

    fn supports(&self, kind: ShapeKind) -> bool {
        !matches!(
            kind,
            ShapeKind::LinearRing | ShapeKind::Envelope | ShapeKind::Circle
        )
    }

    fn to_point(&self, coord: Option<Coordinate>) -> Result<GeoJson> {
        let point = coord.as_ref().map(position).unwrap_or_default();
        Ok(shape(GeometryValue::Point(point)))
    }

    fn to_line_string(&self, coords: Vec<Coordinate>) -> Result<GeoJson> {
        Ok(shape(GeometryValue::LineString(positions(&coords))))
    }

    fn to_polygon(&self, rings: Vec<Vec<Coordinate>>) -> Result<GeoJson> {
        Ok(shape(GeometryValue::Polygon(
            rings.iter().map(|ring| positions(ring)).collect(),
        )))
    }

    fn to_multi_point(&self, coords: Vec<Coordinate>) -> Result<GeoJson> {
        Ok(shape(GeometryValue::MultiPoint(positions(&coords))))
    }

    fn to_multi_line_string(&self, lines: Vec<Vec<Coordinate>>) -> Result<GeoJson> {
        Ok(shape(GeometryValue::MultiLineString(
            lines.iter().map(|line| positions(line)).collect(),
        )))
    }

    fn to_multi_polygon(&self, polygons: Vec<Vec<Vec<Coordinate>>>) -> Result<GeoJson> {
        Ok(shape(GeometryValue::MultiPolygon(
            polygons
                .iter()
                .map(|rings| rings.iter().map(|ring| positions(ring)).collect())
                .collect(),
        )))
    }

    fn to_geometry_collection(&self, geometries: Vec<GeoJson>) -> Result<GeoJson> {
        let geometries = geometries
            .into_iter()
            .map(into_geometry)
            .collect::<Result<_>>()?;
        Ok(shape(GeometryValue::GeometryCollection(geometries)))
    }

    fn to_feature(&self, feature: FeatureParts<GeoJson>) -> Result<GeoJson> {
        let properties = if feature.properties.is_empty() {
            None
        } else {
            Some(properties_to_json(&feature.properties))
        };
        Ok(GeoJson::Feature(Feature {
            bbox: None,
            geometry: feature.geometry.map(into_geometry).transpose()?,
            id: feature.id.map(id_to_geojson).transpose()?,
            properties,
            foreign_members: None,
        }))
    }

    fn to_feature_collection(&self, features: Vec<GeoJson>) -> Result<GeoJson> {
        let features = features
            .into_iter()
            .map(|shape| match shape {
                GeoJson::Feature(feature) => Ok(feature),
                other => Err(wrong_kind(ShapeKind::Feature, kind(&other))),
            })
            .collect::<Result<_>>()?;
        Ok(GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }))
    }

    fn from_point(&self, point: &GeoJson) -> Result<Option<Coordinate>> {
        match geometry_value(point) {
            Some(GeometryValue::Point(position)) if position.is_empty() => Ok(None),
            Some(GeometryValue::Point(position)) => coordinate(position).map(Some),
            _ => Err(wrong_kind(ShapeKind::Point, kind(point))),
        }
    }

    fn from_line_string(&self, line_string: &GeoJson) -> Result<Vec<Coordinate>> {
        match geometry_value(line_string) {
            Some(GeometryValue::LineString(positions)) => coordinates(positions),
            _ => Err(wrong_kind(ShapeKind::LineString, kind(line_string))),
        }
    }

    fn from_polygon(&self, polygon: &GeoJson) -> Result<Vec<Vec<Coordinate>>> {
        match geometry_value(polygon) {
            Some(GeometryValue::Polygon(rings)) => coordinate_lists(rings),
            _ => Err(wrong_kind(ShapeKind::Polygon, kind(polygon))),
        }
    }

    fn from_multi_point(&self, multi_point: &GeoJson) -> Result<Vec<Coordinate>> {
        match geometry_value(multi_point) {
            Some(GeometryValue::MultiPoint(positions)) => coordinates(positions),
            _ => Err(wrong_kind(ShapeKind::MultiPoint, kind(multi_point))),
        }
    }

    fn from_multi_line_string(&self, multi_line_string: &GeoJson) -> Result<Vec<Vec<Coordinate>>> {
        match geometry_value(multi_line_string) {
            Some(GeometryValue::MultiLineString(lines)) => coordinate_lists(lines),
            _ => Err(wrong_kind(ShapeKind::MultiLineString, kind(multi_line_string))),
        }
    }

    fn from_multi_polygon(&self, multi_polygon: &GeoJson) -> Result<Vec<Vec<Vec<Coordinate>>>> {
        match geometry_value(multi_polygon) {
            Some(GeometryValue::MultiPolygon(polygons)) => polygons
                .iter()
                .map(|rings| coordinate_lists(rings))
                .collect(),
            _ => Err(wrong_kind(ShapeKind::MultiPolygon, kind(multi_polygon))),
        }
    }

    fn from_geometry_collection(&self, collection: &GeoJson) -> Result<Vec<GeoJson>> {
        match geometry_value(collection) {
            Some(GeometryValue::GeometryCollection(geometries)) => {
                Ok(geometries.iter().cloned().map(GeoJson::Geometry).collect())
            }
            _ => Err(wrong_kind(ShapeKind::GeometryCollection, kind(collection))),
        }
    }

    fn from_feature(&self, feature: &GeoJson) -> Result<FeatureParts<GeoJson>> {
        let GeoJson::Feature(feature) = feature else {
            return Err(wrong_kind(ShapeKind::Feature, kind(feature)));
        };
        let properties = feature
            .properties
            .iter()
            .flatten()
            .map(|(key, value)| (key.clone(), JsonValue::from(value)))
            .collect();
        Ok(FeatureParts {
            geometry: feature.geometry.clone().map(GeoJson::Geometry),
            id: feature.id.as_ref().map(id_from_geojson),
            properties,
        })
    }

    fn from_feature_collection(&self, collection: &GeoJson) -> Result<Vec<GeoJson>> {
        match collection {
            GeoJson::FeatureCollection(collection) => {
                Ok(collection.features.iter().cloned().map(GeoJson::Feature).collect())
            }
            other => Err(wrong_kind(ShapeKind::FeatureCollection, kind(other))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::geojson::{GeoJsonReader, GeoJsonWriter};
    use crate::io::wkt::{WktReader, WktWriter};

    #[test]
    fn reads_into_geojson_types() {
        let text = r#"{"type":"Feature","id":"a","geometry":{"type":"Point","coordinates":[1,2]},"properties":{"name":"test"}}"#;
        let expected: GeoJson = text.parse().unwrap();
        let actual = GeoJsonReader::new(&GeoJsonBuilder)
            .read_str(text)
            .unwrap()
            .unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn feature_collection_round_trip() {
        let value = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": 3, "geometry": null},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[1, 2], [3, 4.5]]},
                 "properties": {"tags": ["x"]}}
            ]
        });
        let shape = GeoJsonReader::new(&GeoJsonBuilder)
            .read(&value)
            .unwrap()
            .unwrap();
        assert_eq!(GeoJsonWriter::new(&GeoJsonBuilder).write(&shape).unwrap(), value);
    }

    #[test]
    fn positions_keep_elevation_and_measure() {
        let reader = WktReader::new(&GeoJsonBuilder);
        assert_eq!(
            reader.read("POINT ZM (1 2 3 4)").unwrap(),
            Some(shape(GeometryValue::Point(vec![1., 2., 3., 4.])))
        );
        assert_eq!(
            reader.read("POINT M (1 2 3)").unwrap(),
            Some(shape(GeometryValue::Point(vec![1., 2.])))
        );
        assert_eq!(
            reader.read("POINT EMPTY").unwrap(),
            Some(shape(GeometryValue::Point(vec![])))
        );
    }

    #[test]
    fn writes_wkt() {
        let polygon = shape(GeometryValue::Polygon(vec![vec![
            vec![0., 0., 1.],
            vec![1., 0., 1.],
            vec![0., 1., 1.],
            vec![0., 0., 1.],
        ]]));
        assert_eq!(
            WktWriter::new(&GeoJsonBuilder).write(&polygon).unwrap(),
            "POLYGON ((0 0 1, 1 0 1, 0 1 1, 0 0 1))"
        );
    }

    #[test]
    fn short_positions_are_rejected() {
        let point = shape(GeometryValue::Point(vec![1.]));
        assert!(matches!(
            GeoJsonBuilder.from_point(&point),
            Err(GeoCodecError::Builder(_))
        ));
    }

    #[test]
    fn composite_ids_are_rejected() {
        let parts = FeatureParts {
            geometry: None,
            id: Some(JsonValue::Bool(true)),
            properties: Default::default(),
        };
        assert!(GeoJsonBuilder.to_feature(parts).is_err());
    }
}
