//! Defines [`GeoCodecError`], representing all errors returned by this crate.

use thiserror::Error;

use crate::kind::ShapeKind;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoCodecError {
    /// Input the WKT tokenizer cannot turn into a token.
    #[error("Lexical error at position {position}: unrecognized input '{found}'")]
    Lexical { position: usize, found: String },

    /// A token was present but had the wrong type or value for its grammar position.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// The active builder does not support this kind of shape.
    #[error("Unsupported shape type: {0}")]
    UnsupportedVariant(ShapeKind),

    /// A GeoJSON `"type"` member naming no known shape.
    #[error("Unknown shape type '{0}'")]
    UnknownType(String),

    /// A shape handed to a writer that the target format cannot express.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Collections or arrays nested deeper than the configured maximum.
    #[error("Nesting depth exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },

    /// A JSON object for which no GeoJSON interpretation succeeded.
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    /// A builder refused the coordinates or shapes passed to it.
    #[error("Builder error: {0}")]
    Builder(String),

    /// [serde_json::Error]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// [std::fmt::Error]
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, GeoCodecError>;
