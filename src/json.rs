//! A JSON value type independent of any JSON library.
//!
//! Feature identifiers and property maps cross the [`ShapeBuilder`] boundary as [`JsonValue`],
//! so backends never see `serde_json` nodes. Conversions to and from [`serde_json::Value`] live
//! only in this module.
//!
//! [`ShapeBuilder`]: crate::ShapeBuilder

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::error::{GeoCodecError, Result};

/// Feature properties, keyed in document order.
pub type Properties = IndexMap<String, JsonValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Properties),
}

impl JsonValue {
    /// Convert a `serde_json` tree, failing once arrays or objects nest deeper than `max_depth`.
    pub fn from_json(value: &Value, max_depth: usize) -> Result<Self> {
        from_json_at(value, 0, max_depth)
    }

    /// Convert a `serde_json` object into a property map, bounded like [`JsonValue::from_json`].
    pub fn properties_from_json(object: &Map<String, Value>, max_depth: usize) -> Result<Properties> {
        object
            .iter()
            .map(|(key, value)| Ok((key.clone(), from_json_at(value, 1, max_depth)?)))
            .collect()
    }

    /// Convert back into a `serde_json` tree.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(v) => Value::Bool(*v),
            JsonValue::Integer(v) => Value::Number((*v).into()),
            JsonValue::Float(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            JsonValue::String(v) => Value::String(v.clone()),
            JsonValue::Array(values) => Value::Array(values.iter().map(JsonValue::to_json).collect()),
            JsonValue::Object(map) => Value::Object(properties_to_json(map)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Whether this is `null`, a boolean, a number or a string.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, JsonValue::Array(_) | JsonValue::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Integer(v) => Some(*v as f64),
            JsonValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Convert a property map into a `serde_json` object.
pub fn properties_to_json(properties: &Properties) -> Map<String, Value> {
    properties
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect()
}

fn from_json_at(value: &Value, depth: usize, max_depth: usize) -> Result<JsonValue> {
    if depth > max_depth {
        tracing::warn!(limit = max_depth, "property value nested too deeply");
        return Err(GeoCodecError::DepthExceeded { limit: max_depth });
    }

    let out = match value {
        Value::Null => JsonValue::Null,
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::Number(v) => number_from_json(v),
        Value::String(v) => JsonValue::String(v.clone()),
        Value::Array(values) => JsonValue::Array(
            values
                .iter()
                .map(|v| from_json_at(v, depth + 1, max_depth))
                .collect::<Result<_>>()?,
        ),
        Value::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(key, v)| Ok((key.clone(), from_json_at(v, depth + 1, max_depth)?)))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(out)
}

fn number_from_json(number: &Number) -> JsonValue {
    if let Some(v) = number.as_i64() {
        JsonValue::Integer(v)
    } else {
        // u64 beyond i64::MAX and all floats
        JsonValue::Float(number.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<&Value> for JsonValue {
    /// Unbounded conversion, for trees that are already in memory.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(v) => JsonValue::Bool(*v),
            Value::Number(v) => number_from_json(v),
            Value::String(v) => JsonValue::String(v.clone()),
            Value::Array(values) => JsonValue::Array(values.iter().map(JsonValue::from).collect()),
            Value::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(key, v)| (key.clone(), JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Integer(value)
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Float(value)
    }
}
