//! Converters for a document serialization layer.
//!
//! A document layer hands a converter the JSON value found at a shape-typed field and receives a
//! shape, or hands it a shape (or nothing) and receives the JSON value to store. WKT is stored as
//! a JSON string, GeoJSON as a JSON object; a missing shape is JSON `null` either way.

use serde_json::Value;

use crate::builder::ShapeBuilder;
use crate::error::{GeoCodecError, Result};
use crate::io::geojson::{GeoJsonReader, GeoJsonWriter};
use crate::io::shorthand::{ShorthandReader, ShorthandWriter};
use crate::kind::ShapeKind;

pub trait ShapeConverter {
    type Shape;

    /// Whether shapes of `kind` can be written and read back.
    fn can_convert(&self, kind: ShapeKind) -> bool;

    fn read_json(&self, value: &Value) -> Result<Option<Self::Shape>>;

    fn write_json(&self, shape: Option<&Self::Shape>) -> Result<Value>;
}

/// Stores shapes as WKT strings, accepting the shorthand forms on read.
pub struct WktConverter<'a, B: ShapeBuilder> {
    builder: &'a B,
    reader: ShorthandReader<'a, B>,
    writer: ShorthandWriter<'a, B>,
}

impl<'a, B: ShapeBuilder> WktConverter<'a, B> {
    pub fn new(builder: &'a B) -> Self {
        Self::new_with_parts(builder, ShorthandReader::new(builder), ShorthandWriter::new(builder))
    }

    /// Use a configured reader and writer over `builder`.
    pub fn new_with_parts(
        builder: &'a B,
        reader: ShorthandReader<'a, B>,
        writer: ShorthandWriter<'a, B>,
    ) -> Self {
        Self {
            builder,
            reader,
            writer,
        }
    }
}

impl<'a, B: ShapeBuilder> ShapeConverter for WktConverter<'a, B> {
    type Shape = B::Shape;

    fn can_convert(&self, kind: ShapeKind) -> bool {
        !matches!(kind, ShapeKind::Feature | ShapeKind::FeatureCollection)
            && self.builder.supports(kind)
    }

    fn read_json(&self, value: &Value) -> Result<Option<B::Shape>> {
        match value {
            Value::Null => Ok(None),
            Value::String(text) => self.reader.read(text),
            other => Err(GeoCodecError::Syntax(format!(
                "expected a WKT string, found {other}"
            ))),
        }
    }

    fn write_json(&self, shape: Option<&B::Shape>) -> Result<Value> {
        match shape {
            Some(shape) => self.writer.write(shape).map(Value::String),
            None => Ok(Value::Null),
        }
    }
}

/// Stores shapes as GeoJSON objects.
pub struct GeoJsonConverter<'a, B: ShapeBuilder> {
    builder: &'a B,
    reader: GeoJsonReader<'a, B>,
    writer: GeoJsonWriter<'a, B>,
}

impl<'a, B: ShapeBuilder> GeoJsonConverter<'a, B> {
    pub fn new(builder: &'a B) -> Self {
        Self::new_with_reader(builder, GeoJsonReader::new(builder))
    }

    /// Use a configured reader, for example one with a [`ReadHook`](crate::io::geojson::ReadHook).
    pub fn new_with_reader(builder: &'a B, reader: GeoJsonReader<'a, B>) -> Self {
        Self {
            builder,
            reader,
            writer: GeoJsonWriter::new(builder),
        }
    }
}

impl<'a, B: ShapeBuilder> ShapeConverter for GeoJsonConverter<'a, B> {
    type Shape = B::Shape;

    fn can_convert(&self, kind: ShapeKind) -> bool {
        !matches!(kind, ShapeKind::Envelope | ShapeKind::Circle) && self.builder.supports(kind)
    }

    fn read_json(&self, value: &Value) -> Result<Option<B::Shape>> {
        self.reader.read(value)
    }

    fn write_json(&self, shape: Option<&B::Shape>) -> Result<Value> {
        match shape {
            Some(shape) => self.writer.write(shape),
            None => Ok(Value::Null),
        }
    }
}
