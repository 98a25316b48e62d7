//! Readers and writers for WKT, GeoJSON and the shorthand text forms, plus the converters a
//! document serialization layer plugs in.

use serde::{Deserialize, Serialize};

pub mod converter;
pub mod geojson;
pub mod shorthand;
pub mod wkt;

/// Options shared by every reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Maximum nesting of geometry collections, feature collections and property values.
    pub max_depth: usize,
}

impl ReaderOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
