//! Read and write [WKT](https://en.wikipedia.org/wiki/Well-known_text_representation_of_geometry)
//! and [GeoJSON](https://geojson.org/) through a pluggable geometry backend.
//!
//! The readers and writers in [`io`] never touch a concrete geometry type. They drive a
//! [`ShapeBuilder`], which turns neutral [`Coordinate`]s into the backend's shapes and back.
//! [`backend`] has builders for the crate's own [`NativeShape`](backend::native::NativeShape),
//! for `geo` geometries and for the `geojson` crate's types.
//!
//! ```
//! use geocodec::backend::native::NativeBuilder;
//! use geocodec::io::geojson::GeoJsonWriter;
//! use geocodec::io::wkt::WktReader;
//!
//! let shape = WktReader::new(&NativeBuilder)
//!     .read("MULTIPOINT ((1 2), (3 4))")
//!     .unwrap()
//!     .unwrap();
//! let json = GeoJsonWriter::new(&NativeBuilder).write_string(&shape).unwrap();
//! assert_eq!(json, r#"{"type":"MultiPoint","coordinates":[[1,2],[3,4]]}"#);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub use builder::{Circle, Envelope, FeatureParts, ShapeBuilder};
pub use coord::{Coordinate, Dimensions};
pub use error::{GeoCodecError, Result};
pub use kind::ShapeKind;

pub mod backend;
pub mod builder;
pub mod coord;
pub mod error;
pub mod io;
pub mod json;
pub mod kind;
#[cfg(test)]
pub(crate) mod test;
