use serde_json::{Map, Value};

use crate::builder::{ensure_supported, FeatureParts, ShapeBuilder};
use crate::coord::Coordinate;
use crate::error::{GeoCodecError, Result};
use crate::io::ReaderOptions;
use crate::json::{JsonValue, Properties};
use crate::kind::ShapeKind;

/// Post-processing applied to every shape the [`GeoJsonReader`] produces at the top level.
///
/// The hook sees the JSON object the shape was read from and may return a replacement, for
/// example to turn a tagged LineString into a richer domain type. Returning `None` keeps the
/// shape as read.
pub trait ReadHook<S> {
    fn after_read(&self, object: &Map<String, Value>, shape: &S) -> Result<Option<S>>;
}

impl<S, F> ReadHook<S> for F
where
    F: Fn(&Map<String, Value>, &S) -> Result<Option<S>>,
{
    fn after_read(&self, object: &Map<String, Value>, shape: &S) -> Result<Option<S>> {
        self(object, shape)
    }
}

/// Reads GeoJSON geometries, features and feature collections from a parsed JSON tree.
///
/// Each object is interpreted according to its `"type"` member. A member of the wrong shape
/// makes the interpretation fail as a whole; the reader then reports
/// [`GeoCodecError::InvalidGeoJson`], or [`GeoCodecError::UnknownType`] when the top-level type
/// itself is not recognized. A backend declining a type it found is an error straight away.
pub struct GeoJsonReader<'a, B: ShapeBuilder> {
    builder: &'a B,
    options: ReaderOptions,
    hook: Option<Box<dyn ReadHook<B::Shape> + 'a>>,
}

impl<'a, B: ShapeBuilder> GeoJsonReader<'a, B> {
    pub fn new(builder: &'a B) -> Self {
        Self::new_with_options(builder, Default::default())
    }

    pub fn new_with_options(builder: &'a B, options: ReaderOptions) -> Self {
        Self {
            builder,
            options,
            hook: None,
        }
    }

    pub fn with_hook(mut self, hook: impl ReadHook<B::Shape> + 'a) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Read one shape. JSON `null` reads as `None`.
    pub fn read(&self, value: &Value) -> Result<Option<B::Shape>> {
        let object = match value {
            Value::Null => return Ok(None),
            Value::Object(object) => object,
            other => {
                return Err(GeoCodecError::InvalidGeoJson(format!(
                    "expected an object, found {}",
                    json_type_name(other)
                )))
            }
        };

        let Some(shape) = self.parse_object(object, 0)? else {
            return Err(match object.get("type").and_then(Value::as_str) {
                Some(name) if ShapeKind::from_geojson_type(name).is_none() => {
                    GeoCodecError::UnknownType(name.to_string())
                }
                Some(name) => GeoCodecError::InvalidGeoJson(format!("malformed {name} object")),
                None => GeoCodecError::InvalidGeoJson("object has no \"type\" member".into()),
            });
        };

        match &self.hook {
            Some(hook) => Ok(Some(hook.after_read(object, &shape)?.unwrap_or(shape))),
            None => Ok(Some(shape)),
        }
    }

    /// Parse JSON text and read it with [`read`](Self::read).
    pub fn read_str(&self, json: &str) -> Result<Option<B::Shape>> {
        let value: Value = serde_json::from_str(json)?;
        self.read(&value)
    }

    fn parse_object(&self, object: &Map<String, Value>, depth: usize) -> Result<Option<B::Shape>> {
        if depth > self.options.max_depth {
            tracing::warn!(limit = self.options.max_depth, "GeoJSON objects nested too deeply");
            return Err(GeoCodecError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }

        let Some(kind) = object_kind(object) else {
            tracing::debug!(object_type = ?object.get("type"), "no GeoJSON type to dispatch on");
            return Ok(None);
        };
        ensure_supported(self.builder, kind)?;

        match kind {
            ShapeKind::Point => {
                let Some(coordinates) = object.get("coordinates").and_then(Value::as_array) else {
                    return mismatch(kind, "\"coordinates\" is not an array");
                };
                if coordinates.is_empty() {
                    return self.builder.to_point(None).map(Some);
                }
                match position(coordinates) {
                    Some(coord) => self.builder.to_point(Some(coord)).map(Some),
                    None => mismatch(kind, "\"coordinates\" is not a position"),
                }
            }
            ShapeKind::LineString => match object.get("coordinates").and_then(positions) {
                Some(coords) => self.builder.to_line_string(coords).map(Some),
                None => mismatch(kind, "\"coordinates\" is not an array of positions"),
            },
            ShapeKind::MultiPoint => match object.get("coordinates").and_then(positions) {
                Some(coords) => self.builder.to_multi_point(coords).map(Some),
                None => mismatch(kind, "\"coordinates\" is not an array of positions"),
            },
            ShapeKind::Polygon => match object.get("coordinates").and_then(position_lists) {
                Some(rings) => self.builder.to_polygon(rings).map(Some),
                None => mismatch(kind, "\"coordinates\" is not an array of rings"),
            },
            ShapeKind::MultiLineString => match object.get("coordinates").and_then(position_lists)
            {
                Some(lines) => self.builder.to_multi_line_string(lines).map(Some),
                None => mismatch(kind, "\"coordinates\" is not an array of lines"),
            },
            ShapeKind::MultiPolygon => {
                let polygons: Option<Vec<Vec<Vec<Coordinate>>>> = object
                    .get("coordinates")
                    .and_then(Value::as_array)
                    .and_then(|polygons| polygons.iter().map(position_lists).collect());
                match polygons {
                    Some(polygons) => self.builder.to_multi_polygon(polygons).map(Some),
                    None => mismatch(kind, "\"coordinates\" is not an array of polygons"),
                }
            }
            ShapeKind::GeometryCollection => {
                let Some(members) = object.get("geometries").and_then(Value::as_array) else {
                    return mismatch(kind, "\"geometries\" is not an array");
                };
                let mut geometries = Vec::with_capacity(members.len());
                for member in members {
                    match self.parse_member(member, depth, |k| k.is_geometry())? {
                        Some(geometry) => geometries.push(geometry),
                        None => return mismatch(kind, "a member is not a geometry"),
                    }
                }
                self.builder.to_geometry_collection(geometries).map(Some)
            }
            ShapeKind::Feature => self.parse_feature(object, depth),
            ShapeKind::FeatureCollection => {
                let Some(members) = object.get("features").and_then(Value::as_array) else {
                    return mismatch(kind, "\"features\" is not an array");
                };
                let mut features = Vec::with_capacity(members.len());
                for member in members {
                    match self.parse_member(member, depth, |k| k == ShapeKind::Feature)? {
                        Some(feature) => features.push(feature),
                        None => return mismatch(kind, "a member is not a feature"),
                    }
                }
                self.builder.to_feature_collection(features).map(Some)
            }
            ShapeKind::LinearRing | ShapeKind::Envelope | ShapeKind::Circle => {
                mismatch(kind, "not a GeoJSON type")
            }
        }
    }

    /// Parse a nested object whose type must satisfy `accept`.
    fn parse_member(
        &self,
        member: &Value,
        depth: usize,
        accept: impl Fn(ShapeKind) -> bool,
    ) -> Result<Option<B::Shape>> {
        match member.as_object() {
            Some(object) if object_kind(object).is_some_and(accept) => {
                self.parse_object(object, depth + 1)
            }
            _ => Ok(None),
        }
    }

    fn parse_feature(&self, object: &Map<String, Value>, depth: usize) -> Result<Option<B::Shape>> {
        let kind = ShapeKind::Feature;

        let geometry = match object.get("geometry") {
            Some(Value::Null) => None,
            Some(member) => match self.parse_member(member, depth, |k| k.is_geometry())? {
                Some(geometry) => Some(geometry),
                None => return mismatch(kind, "\"geometry\" is not a geometry"),
            },
            None => return mismatch(kind, "missing \"geometry\""),
        };

        let id = match object.get("id") {
            None | Some(Value::Null) => None,
            Some(id @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => {
                Some(JsonValue::from(id))
            }
            Some(_) => return mismatch(kind, "\"id\" is not a scalar"),
        };

        let properties = match object.get("properties") {
            None | Some(Value::Null) => Properties::new(),
            Some(Value::Object(properties)) => JsonValue::properties_from_json(
                properties,
                self.options.max_depth.saturating_sub(depth),
            )?,
            Some(_) => return mismatch(kind, "\"properties\" is not an object"),
        };

        self.builder
            .to_feature(FeatureParts {
                geometry,
                id,
                properties,
            })
            .map(Some)
    }
}

fn mismatch<T>(kind: ShapeKind, reason: &str) -> Result<Option<T>> {
    tracing::debug!(%kind, reason, "GeoJSON object rejected");
    Ok(None)
}

fn object_kind(object: &Map<String, Value>) -> Option<ShapeKind> {
    object
        .get("type")
        .and_then(Value::as_str)
        .and_then(ShapeKind::from_geojson_type)
}

/// At least two numbers. A third is z and a fourth m; anything after that is ignored.
fn position(values: &[Value]) -> Option<Coordinate> {
    let ordinates = values
        .iter()
        .take(4)
        .map(Value::as_f64)
        .collect::<Option<Vec<_>>>()?;
    match ordinates.as_slice() {
        [x, y] => Some(Coordinate::new(*x, *y)),
        [x, y, z] => Some(Coordinate::new_z(*x, *y, *z)),
        [x, y, z, m] => Some(Coordinate::new_zm(*x, *y, *z, *m)),
        _ => None,
    }
}

fn positions(value: &Value) -> Option<Vec<Coordinate>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_array().and_then(|values| position(values)))
        .collect()
}

fn position_lists(value: &Value) -> Option<Vec<Vec<Coordinate>>> {
    value.as_array()?.iter().map(positions).collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::backend::geo::GeoBuilder;
    use crate::backend::native::{NativeBuilder, NativeFeature, NativePolygon, NativeShape};
    use crate::test::{feature, multipolygon, point, polygon};

    fn read(value: Value) -> Result<Option<NativeShape>> {
        GeoJsonReader::new(&NativeBuilder).read(&value)
    }

    #[test]
    fn point() {
        assert_eq!(
            read(json!({"type": "Point", "coordinates": [56.543, 32.657]})).unwrap(),
            Some(point::p0())
        );
    }

    #[test]
    fn type_is_case_insensitive() {
        assert_eq!(
            read(json!({"type": "point", "coordinates": [56.543, 32.657]})).unwrap(),
            Some(point::p0())
        );
    }

    #[test]
    fn null_reads_as_none() {
        assert_eq!(read(Value::Null).unwrap(), None);
    }

    #[test]
    fn extra_ordinates() {
        assert_eq!(
            read(json!({"type": "Point", "coordinates": [1, 2, 3]})).unwrap(),
            Some(NativeShape::Point(Some(Coordinate::new_z(1., 2., 3.))))
        );
        assert_eq!(
            read(json!({"type": "Point", "coordinates": [1, 2, 3, 4, 5]})).unwrap(),
            Some(NativeShape::Point(Some(Coordinate::new_zm(1., 2., 3., 4.))))
        );
    }

    #[test]
    fn empty_coordinates_read_as_empty_shapes() {
        assert_eq!(
            read(json!({"type": "Point", "coordinates": []})).unwrap(),
            Some(NativeShape::Point(None))
        );
        assert_eq!(
            read(json!({"type": "Polygon", "coordinates": []})).unwrap(),
            Some(NativeShape::Polygon(NativePolygon::default()))
        );
        assert_eq!(
            read(json!({"type": "MultiPolygon", "coordinates": []})).unwrap(),
            Some(NativeShape::MultiPolygon(vec![]))
        );
        assert_eq!(
            read(json!({"type": "GeometryCollection", "geometries": []})).unwrap(),
            Some(NativeShape::GeometryCollection(vec![]))
        );
    }

    #[test]
    fn polygon_and_multi_polygon() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [
                [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                [[2, 2], [4, 2], [4, 4], [2, 2]]
            ]
        });
        assert_eq!(read(value).unwrap(), Some(polygon::with_hole()));

        let value = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                [[[2, 2], [3, 2], [3, 3], [2, 2]]]
            ]
        });
        assert_eq!(read(value).unwrap(), Some(multipolygon::two_triangles()));
    }

    #[test]
    fn geometry_collection() {
        let value = json!({
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [1, 2]},
                {"type": "LineString", "coordinates": [[1, 2], [3, 4]]}
            ]
        });
        assert_eq!(
            read(value).unwrap(),
            Some(NativeShape::GeometryCollection(vec![
                NativeShape::Point(Some(Coordinate::new(1., 2.))),
                NativeShape::LineString(vec![Coordinate::new(1., 2.), Coordinate::new(3., 4.)]),
            ]))
        );
    }

    #[test]
    fn feature() {
        let value = json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [1, 2]},
            "properties": {"name": "test"}
        });
        assert_eq!(read(value).unwrap(), Some(feature::named_point()));
    }

    #[test]
    fn feature_with_id_and_null_geometry() {
        let value = json!({
            "type": "Feature",
            "id": 7,
            "geometry": null,
            "properties": null
        });
        assert_eq!(
            read(value).unwrap(),
            Some(NativeShape::Feature(NativeFeature {
                geometry: None,
                id: Some(JsonValue::Integer(7)),
                properties: Properties::new(),
            }))
        );
    }

    #[test]
    fn nested_properties() {
        let value = json!({
            "type": "Feature",
            "geometry": null,
            "properties": {"tags": ["a", "b"], "meta": {"height": 2.5, "open": true}}
        });
        let Some(NativeShape::Feature(feature)) = read(value).unwrap() else {
            panic!("expected a feature");
        };
        assert_eq!(
            feature.properties["tags"],
            JsonValue::Array(vec!["a".into(), "b".into()])
        );
        let JsonValue::Object(meta) = &feature.properties["meta"] else {
            panic!("expected an object");
        };
        assert_eq!(meta["height"], JsonValue::Float(2.5));
        assert_eq!(meta["open"], JsonValue::Bool(true));
    }

    #[test]
    fn feature_collection() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]},
                 "properties": {"name": "test"}},
                {"type": "Feature", "geometry": null}
            ]
        });
        let Some(NativeShape::FeatureCollection(features)) = read(value).unwrap() else {
            panic!("expected a feature collection");
        };
        assert_eq!(features.len(), 2);
        assert_eq!(NativeShape::Feature(features[0].clone()), feature::named_point());
        assert!(features[1].geometry.is_none());
    }

    #[test]
    fn feature_collection_members_must_be_features() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [{"type": "Point", "coordinates": [1, 2]}]
        });
        assert!(matches!(read(value), Err(GeoCodecError::InvalidGeoJson(_))));
    }

    #[test]
    fn missing_coordinates_fail() {
        assert!(matches!(
            read(json!({"type": "Point"})),
            Err(GeoCodecError::InvalidGeoJson(_))
        ));
    }

    #[test]
    fn wrong_nesting_depth_fails() {
        assert!(read(json!({"type": "Point", "coordinates": [[1, 2]]})).is_err());
        assert!(read(json!({"type": "LineString", "coordinates": [1, 2]})).is_err());
        assert!(read(json!({"type": "Polygon", "coordinates": [[1, 2], [3, 4]]})).is_err());
        assert!(read(json!({"type": "Point", "coordinates": [1]})).is_err());
        assert!(read(json!({"type": "Point", "coordinates": [1, "2"]})).is_err());
    }

    #[test]
    fn malformed_member_fails_the_collection() {
        let value = json!({
            "type": "GeometryCollection",
            "geometries": [{"type": "Point", "coordinates": [1, 2]}, {"type": "Point"}]
        });
        assert!(matches!(read(value), Err(GeoCodecError::InvalidGeoJson(_))));
    }

    #[test]
    fn unknown_type() {
        assert!(matches!(
            read(json!({"type": "Blob", "coordinates": [1, 2]})),
            Err(GeoCodecError::UnknownType(name)) if name == "Blob"
        ));
        assert!(matches!(
            read(json!({"coordinates": [1, 2]})),
            Err(GeoCodecError::InvalidGeoJson(_))
        ));
        assert!(matches!(read(json!([1, 2])), Err(GeoCodecError::InvalidGeoJson(_))));
    }

    #[test]
    fn unsupported_type_is_an_error() {
        let value = json!({"type": "Feature", "geometry": null});
        assert!(matches!(
            GeoJsonReader::new(&GeoBuilder).read(&value),
            Err(GeoCodecError::UnsupportedVariant(ShapeKind::Feature))
        ));
    }

    #[test]
    fn collection_depth_is_bounded() {
        let mut value = json!({"type": "Point", "coordinates": [1, 2]});
        for _ in 0..4 {
            value = json!({"type": "GeometryCollection", "geometries": [value]});
        }

        let options = ReaderOptions::default().with_max_depth(4);
        assert!(GeoJsonReader::new_with_options(&NativeBuilder, options)
            .read(&value)
            .is_ok());

        let options = ReaderOptions::default().with_max_depth(3);
        assert!(matches!(
            GeoJsonReader::new_with_options(&NativeBuilder, options).read(&value),
            Err(GeoCodecError::DepthExceeded { limit: 3 })
        ));
    }

    #[test]
    fn hook_may_replace_the_shape() {
        let hook = |object: &Map<String, Value>, shape: &NativeShape| -> Result<Option<NativeShape>> {
            if object.get("kind").and_then(Value::as_str) != Some("track") {
                return Ok(None);
            }
            match shape {
                NativeShape::LineString(coords) => Ok(Some(NativeShape::MultiPoint(coords.clone()))),
                _ => Ok(None),
            }
        };
        let reader = GeoJsonReader::new(&NativeBuilder).with_hook(hook);

        let track = json!({"type": "LineString", "kind": "track", "coordinates": [[1, 2], [3, 4]]});
        assert!(matches!(reader.read(&track).unwrap(), Some(NativeShape::MultiPoint(_))));

        let plain = json!({"type": "LineString", "coordinates": [[1, 2], [3, 4]]});
        assert!(matches!(reader.read(&plain).unwrap(), Some(NativeShape::LineString(_))));
    }

    #[test]
    fn read_str() {
        let reader = GeoJsonReader::new(&NativeBuilder);
        assert_eq!(
            reader
                .read_str(r#"{"type":"Point","coordinates":[56.543,32.657]}"#)
                .unwrap(),
            Some(point::p0())
        );
        assert_eq!(reader.read_str("null").unwrap(), None);
        assert!(matches!(reader.read_str("{"), Err(GeoCodecError::Json(_))));
    }
}
