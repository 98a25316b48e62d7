use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::builder::ShapeBuilder;
use crate::coord::{Coordinate, Dimensions};
use crate::error::{GeoCodecError, Result};
use crate::kind::ShapeKind;

/// How much of each coordinate the [`WktWriter`] emits, and how.
///
/// Shapes whose coordinates carry different ordinates, and measures written without a suffix,
/// get `NaN` in the missing slots. [`WktReader`](crate::io::wkt::WktReader) reads those as
/// absent, but other WKT consumers may reject the `NaN` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WktWriterOptions {
    /// 2, 3 or 4. With 3 only z is kept; with 2 only x and y.
    pub max_ordinates: u8,
    /// Write a ` Z`, ` M` or ` ZM` suffix after the keyword.
    pub emit_dimension_suffix: bool,
    /// Write LinearRing shapes as `LINEARRING` instead of `LINESTRING`.
    pub linear_ring_keyword: bool,
}

impl WktWriterOptions {
    pub fn new(max_ordinates: u8, emit_dimension_suffix: bool) -> Result<Self> {
        if !(2..=4).contains(&max_ordinates) {
            return Err(GeoCodecError::Serialization(format!(
                "max_ordinates must be 2, 3 or 4, got {max_ordinates}"
            )));
        }
        Ok(Self {
            max_ordinates,
            emit_dimension_suffix,
            linear_ring_keyword: false,
        })
    }

    /// x and y only.
    pub const fn planar() -> Self {
        Self {
            max_ordinates: 2,
            emit_dimension_suffix: false,
            linear_ring_keyword: false,
        }
    }

    pub fn with_linear_ring_keyword(mut self, linear_ring_keyword: bool) -> Self {
        self.linear_ring_keyword = linear_ring_keyword;
        self
    }

    /// The dimensions that survive `max_ordinates`.
    fn restrict(&self, dims: Dimensions) -> Dimensions {
        match self.max_ordinates {
            0..=2 => Dimensions::Xy,
            3 => Dimensions::from_flags(dims.has_z(), false),
            _ => dims,
        }
    }
}

impl Default for WktWriterOptions {
    fn default() -> Self {
        Self {
            max_ordinates: 4,
            emit_dimension_suffix: false,
            linear_ring_keyword: false,
        }
    }
}

/// Renders shapes as WKT through a [`ShapeBuilder`].
///
/// Ordinates are written in their shortest round-tripping decimal form, so reading the output
/// back yields the same coordinates. A tuple that lacks an ordinate its neighbours carry gets a
/// `NaN` placeholder, which the reader treats as absent.
pub struct WktWriter<'a, B: ShapeBuilder> {
    builder: &'a B,
    options: WktWriterOptions,
}

impl<'a, B: ShapeBuilder> WktWriter<'a, B> {
    pub fn new(builder: &'a B) -> Self {
        Self::new_with_options(builder, Default::default())
    }

    pub fn new_with_options(builder: &'a B, options: WktWriterOptions) -> Self {
        Self { builder, options }
    }

    pub fn write(&self, shape: &B::Shape) -> Result<String> {
        let mut out = String::new();
        self.write_shape(shape, &mut out)?;
        Ok(out)
    }

    /// Write into `sink`. The geometry is rendered in full first, so nothing reaches the sink
    /// when rendering fails.
    pub fn write_to<W: Write>(&self, shape: &B::Shape, sink: &mut W) -> Result<()> {
        let wkt = self.write(shape)?;
        sink.write_str(&wkt)?;
        Ok(())
    }

    fn write_shape(&self, shape: &B::Shape, out: &mut String) -> Result<()> {
        let kind = self.builder.kind_of(shape)?;
        match kind {
            ShapeKind::Point => {
                let coord = self.builder.from_point(shape)?;
                let layout = self.write_header(out, "POINT", Dimensions::of(&coord));
                match coord {
                    Some(coord) => {
                        out.push('(');
                        write_coord(out, &coord, layout)?;
                        out.push(')');
                    }
                    None => out.push_str("EMPTY"),
                }
            }
            ShapeKind::LineString | ShapeKind::LinearRing => {
                let coords = if kind == ShapeKind::LinearRing {
                    self.builder.from_linear_ring(shape)?
                } else {
                    self.builder.from_line_string(shape)?
                };
                let keyword = if kind == ShapeKind::LinearRing && self.options.linear_ring_keyword {
                    "LINEARRING"
                } else {
                    "LINESTRING"
                };
                let layout = self.write_header(out, keyword, Dimensions::of(&coords));
                write_sequence(out, &coords, layout)?;
            }
            ShapeKind::Polygon => {
                let rings = self.builder.from_polygon(shape)?;
                let layout = self.write_header(out, "POLYGON", Dimensions::of(rings.iter().flatten()));
                write_sequence_list(out, &rings, layout)?;
            }
            ShapeKind::MultiPoint => {
                let coords = self.builder.from_multi_point(shape)?;
                let layout = self.write_header(out, "MULTIPOINT", Dimensions::of(&coords));
                if coords.is_empty() {
                    out.push_str("EMPTY");
                } else {
                    out.push('(');
                    for (i, coord) in coords.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push('(');
                        write_coord(out, coord, layout)?;
                        out.push(')');
                    }
                    out.push(')');
                }
            }
            ShapeKind::MultiLineString => {
                let lines = self.builder.from_multi_line_string(shape)?;
                let layout = self.write_header(
                    out,
                    "MULTILINESTRING",
                    Dimensions::of(lines.iter().flatten()),
                );
                write_sequence_list(out, &lines, layout)?;
            }
            ShapeKind::MultiPolygon => {
                let polygons = self.builder.from_multi_polygon(shape)?;
                let layout = self.write_header(
                    out,
                    "MULTIPOLYGON",
                    Dimensions::of(polygons.iter().flatten().flatten()),
                );
                if polygons.is_empty() {
                    out.push_str("EMPTY");
                } else {
                    out.push('(');
                    for (i, rings) in polygons.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        write_sequence_list(out, rings, layout)?;
                    }
                    out.push(')');
                }
            }
            ShapeKind::GeometryCollection => {
                let geometries = self.builder.from_geometry_collection(shape)?;
                // Members carry their own suffixes.
                out.push_str("GEOMETRYCOLLECTION ");
                if geometries.is_empty() {
                    out.push_str("EMPTY");
                } else {
                    out.push('(');
                    for (i, geometry) in geometries.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_shape(geometry, out)?;
                    }
                    out.push(')');
                }
            }
            ShapeKind::Feature
            | ShapeKind::FeatureCollection
            | ShapeKind::Envelope
            | ShapeKind::Circle => {
                return Err(GeoCodecError::Serialization(format!(
                    "{kind} has no WKT representation"
                )))
            }
        }
        Ok(())
    }

    /// Write the keyword and optional suffix, returning the ordinates every tuple must carry.
    fn write_header(&self, out: &mut String, keyword: &str, dims: Dimensions) -> Dimensions {
        let dims = self.options.restrict(dims);
        out.push_str(keyword);

        if self.options.emit_dimension_suffix {
            match dims {
                Dimensions::Xy => {}
                Dimensions::Xyz => out.push_str(" Z"),
                Dimensions::Xym => out.push_str(" M"),
                Dimensions::Xyzm => out.push_str(" ZM"),
            }
            out.push(' ');
            dims
        } else {
            out.push(' ');
            // Without a suffix a third value reads as z, so m needs a z slot in front of it.
            if dims.has_m() {
                Dimensions::Xyzm
            } else {
                dims
            }
        }
    }
}

fn write_ordinate(out: &mut String, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(GeoCodecError::Serialization(format!(
            "cannot write ordinate {value} as WKT"
        )));
    }
    // Plain decimals for everyday magnitudes, shortest exponent form outside them.
    let abs = value.abs();
    if abs != 0.0 && !(1e-6..1e16).contains(&abs) {
        write!(out, "{value:e}")?;
    } else {
        write!(out, "{value}")?;
    }
    Ok(())
}

fn write_coord(out: &mut String, coord: &Coordinate, layout: Dimensions) -> Result<()> {
    write_ordinate(out, coord.x)?;
    out.push(' ');
    write_ordinate(out, coord.y)?;

    for (present, value) in [(layout.has_z(), coord.z), (layout.has_m(), coord.m)] {
        if present {
            out.push(' ');
            match value {
                Some(value) => write_ordinate(out, value)?,
                None => out.push_str("NaN"),
            }
        }
    }
    Ok(())
}

fn write_sequence(out: &mut String, coords: &[Coordinate], layout: Dimensions) -> Result<()> {
    if coords.is_empty() {
        out.push_str("EMPTY");
        return Ok(());
    }

    out.push('(');
    for (i, coord) in coords.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_coord(out, coord, layout)?;
    }
    out.push(')');
    Ok(())
}

fn write_sequence_list(
    out: &mut String,
    sequences: &[Vec<Coordinate>],
    layout: Dimensions,
) -> Result<()> {
    if sequences.is_empty() {
        out.push_str("EMPTY");
        return Ok(());
    }

    out.push('(');
    for (i, coords) in sequences.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_sequence(out, coords, layout)?;
    }
    out.push(')');
    Ok(())
}
