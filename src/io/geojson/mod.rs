//! Read and write [GeoJSON](https://geojson.org/) geometries, features and feature collections.
//!
//! Both directions work on [`serde_json::Value`] trees; `read_str` and `write_string` cover
//! JSON text.

pub use reader::{GeoJsonReader, ReadHook};
pub use writer::GeoJsonWriter;

mod reader;
mod writer;
