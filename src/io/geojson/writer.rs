use serde_json::{Map, Number, Value};

use crate::builder::ShapeBuilder;
use crate::coord::Coordinate;
use crate::error::{GeoCodecError, Result};
use crate::json::properties_to_json;
use crate::kind::ShapeKind;

/// Writes shapes as GeoJSON objects through a [`ShapeBuilder`].
///
/// Objects start with their `"type"` member. Positions carry z when present and m only
/// alongside z, since GeoJSON has no slot for a measure without an elevation.
pub struct GeoJsonWriter<'a, B: ShapeBuilder> {
    builder: &'a B,
}

impl<'a, B: ShapeBuilder> GeoJsonWriter<'a, B> {
    pub fn new(builder: &'a B) -> Self {
        Self { builder }
    }

    pub fn write(&self, shape: &B::Shape) -> Result<Value> {
        self.write_object(shape).map(Value::Object)
    }

    /// Write compact JSON text.
    pub fn write_string(&self, shape: &B::Shape) -> Result<String> {
        Ok(serde_json::to_string(&self.write(shape)?)?)
    }

    fn write_object(&self, shape: &B::Shape) -> Result<Map<String, Value>> {
        let kind = self.builder.kind_of(shape)?;
        let mut object = Map::new();

        match kind {
            ShapeKind::Point => {
                let coordinates = match self.builder.from_point(shape)? {
                    Some(coord) => position(&coord)?,
                    None => Value::Array(vec![]),
                };
                object.insert("type".into(), kind.name().into());
                object.insert("coordinates".into(), coordinates);
            }
            ShapeKind::LineString | ShapeKind::LinearRing => {
                let coords = if kind == ShapeKind::LinearRing {
                    self.builder.from_linear_ring(shape)?
                } else {
                    self.builder.from_line_string(shape)?
                };
                object.insert("type".into(), ShapeKind::LineString.name().into());
                object.insert("coordinates".into(), positions(&coords)?);
            }
            ShapeKind::Polygon => {
                let rings = self.builder.from_polygon(shape)?;
                object.insert("type".into(), kind.name().into());
                object.insert("coordinates".into(), position_lists(&rings)?);
            }
            ShapeKind::MultiPoint => {
                let coords = self.builder.from_multi_point(shape)?;
                object.insert("type".into(), kind.name().into());
                object.insert("coordinates".into(), positions(&coords)?);
            }
            ShapeKind::MultiLineString => {
                let lines = self.builder.from_multi_line_string(shape)?;
                object.insert("type".into(), kind.name().into());
                object.insert("coordinates".into(), position_lists(&lines)?);
            }
            ShapeKind::MultiPolygon => {
                let polygons = self.builder.from_multi_polygon(shape)?;
                let coordinates = polygons
                    .iter()
                    .map(|rings| position_lists(rings))
                    .collect::<Result<Vec<_>>>()?;
                object.insert("type".into(), kind.name().into());
                object.insert("coordinates".into(), Value::Array(coordinates));
            }
            ShapeKind::GeometryCollection => {
                let geometries = self
                    .builder
                    .from_geometry_collection(shape)?
                    .iter()
                    .map(|geometry| self.write_member(geometry, ShapeKind::is_geometry))
                    .collect::<Result<Vec<_>>>()?;
                object.insert("type".into(), kind.name().into());
                object.insert("geometries".into(), Value::Array(geometries));
            }
            ShapeKind::Feature => {
                let feature = self.builder.from_feature(shape)?;
                object.insert("type".into(), kind.name().into());
                if let Some(id) = &feature.id {
                    object.insert("id".into(), id.to_json());
                }
                let geometry = match &feature.geometry {
                    Some(geometry) => self.write_member(geometry, ShapeKind::is_geometry)?,
                    None => Value::Null,
                };
                object.insert("geometry".into(), geometry);
                if !feature.properties.is_empty() {
                    object.insert(
                        "properties".into(),
                        Value::Object(properties_to_json(&feature.properties)),
                    );
                }
            }
            ShapeKind::FeatureCollection => {
                let features = self
                    .builder
                    .from_feature_collection(shape)?
                    .iter()
                    .map(|feature| self.write_member(feature, |k| *k == ShapeKind::Feature))
                    .collect::<Result<Vec<_>>>()?;
                object.insert("type".into(), kind.name().into());
                object.insert("features".into(), Value::Array(features));
            }
            ShapeKind::Envelope | ShapeKind::Circle => {
                return Err(GeoCodecError::Serialization(format!(
                    "{kind} has no GeoJSON representation"
                )))
            }
        }

        Ok(object)
    }

    /// Write a nested shape whose kind must satisfy `accept`.
    fn write_member(&self, shape: &B::Shape, accept: impl Fn(&ShapeKind) -> bool) -> Result<Value> {
        let kind = self.builder.kind_of(shape)?;
        if !accept(&kind) {
            return Err(GeoCodecError::Serialization(format!(
                "{kind} is not allowed at this position"
            )));
        }
        self.write(shape)
    }
}

/// Integral values are written as JSON integers so that documents read as `[1, 2]` are written
/// back unchanged.
fn number(value: f64) -> Result<Value> {
    const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        return Ok(Value::from(value as i64));
    }
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| GeoCodecError::Serialization(format!("cannot write ordinate {value} as JSON")))
}

fn position(coord: &Coordinate) -> Result<Value> {
    let mut ordinates = vec![number(coord.x)?, number(coord.y)?];
    if let Some(z) = coord.z {
        ordinates.push(number(z)?);
        if let Some(m) = coord.m {
            ordinates.push(number(m)?);
        }
    }
    Ok(Value::Array(ordinates))
}

fn positions(coords: &[Coordinate]) -> Result<Value> {
    coords
        .iter()
        .map(position)
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn position_lists(lists: &[Vec<Coordinate>]) -> Result<Value> {
    lists
        .iter()
        .map(|coords| positions(coords))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}
