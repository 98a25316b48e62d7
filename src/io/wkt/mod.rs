//! Read and write Well-Known Text.
//!
//! The grammar covers `POINT`, `LINESTRING`, `LINEARRING`, `POLYGON`, `TRIANGLE` (read as a
//! polygon), `MULTIPOINT`, `MULTILINESTRING`, `MULTIPOLYGON` and `GEOMETRYCOLLECTION`, each with
//! an optional `Z`, `M` or `ZM` suffix and `EMPTY` in place of a coordinate list.

mod reader;
pub mod token_queue;
pub mod tokenizer;
mod writer;

pub use reader::WktReader;
pub use writer::{WktWriter, WktWriterOptions};
