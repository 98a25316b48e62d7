//! [`ShapeBuilder`](crate::ShapeBuilder) implementations.
//!
//! - [`native`]: the crate's own lossless shape model.
//! - [`geo`](mod@geo): planar geometries from the `geo` crate.
//! - [`geojson`](mod@geojson): the `geojson` crate's `GeoJson` values.

pub mod geo;
pub mod geojson;
pub mod native;
