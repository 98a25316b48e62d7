use phf::phf_map;

use crate::builder::{ensure_supported, ShapeBuilder};
use crate::coord::{Coordinate, Dimensions};
use crate::error::{GeoCodecError, Result};
use crate::io::wkt::token_queue::TokenQueue;
use crate::io::wkt::tokenizer::{tokenize, WktTokenKind};
use crate::io::ReaderOptions;
use crate::kind::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WktKeyword {
    Point,
    LineString,
    LinearRing,
    Polygon,
    Triangle,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

static KEYWORDS: phf::Map<&'static str, WktKeyword> = phf_map! {
    "POINT" => WktKeyword::Point,
    "LINESTRING" => WktKeyword::LineString,
    "LINEARRING" => WktKeyword::LinearRing,
    "POLYGON" => WktKeyword::Polygon,
    "TRIANGLE" => WktKeyword::Triangle,
    "MULTIPOINT" => WktKeyword::MultiPoint,
    "MULTILINESTRING" => WktKeyword::MultiLineString,
    "MULTIPOLYGON" => WktKeyword::MultiPolygon,
    "GEOMETRYCOLLECTION" => WktKeyword::GeometryCollection,
};

impl WktKeyword {
    fn kind(&self) -> ShapeKind {
        match self {
            WktKeyword::Point => ShapeKind::Point,
            WktKeyword::LineString => ShapeKind::LineString,
            WktKeyword::LinearRing => ShapeKind::LinearRing,
            WktKeyword::Polygon | WktKeyword::Triangle => ShapeKind::Polygon,
            WktKeyword::MultiPoint => ShapeKind::MultiPoint,
            WktKeyword::MultiLineString => ShapeKind::MultiLineString,
            WktKeyword::MultiPolygon => ShapeKind::MultiPolygon,
            WktKeyword::GeometryCollection => ShapeKind::GeometryCollection,
        }
    }
}

const EMPTY: &str = "EMPTY";

/// Recursive-descent WKT parser that materializes shapes through a [`ShapeBuilder`].
///
/// ```
/// use geocodec::backend::native::{NativeBuilder, NativeShape};
/// use geocodec::io::wkt::WktReader;
/// use geocodec::Coordinate;
///
/// let reader = WktReader::new(&NativeBuilder);
/// let shape = reader.read("POINT M (1 2 3)").unwrap();
/// assert_eq!(shape, Some(NativeShape::Point(Some(Coordinate::new_m(1., 2., 3.)))));
/// ```
pub struct WktReader<'a, B: ShapeBuilder> {
    builder: &'a B,
    options: ReaderOptions,
}

impl<'a, B: ShapeBuilder> WktReader<'a, B> {
    pub fn new(builder: &'a B) -> Self {
        Self::new_with_options(builder, Default::default())
    }

    pub fn new_with_options(builder: &'a B, options: ReaderOptions) -> Self {
        Self { builder, options }
    }

    /// Parse one geometry.
    ///
    /// Input without any tokens yields `None`. Tokens left over after the geometry are an error.
    pub fn read(&self, wkt: &str) -> Result<Option<B::Shape>> {
        let tokens = tokenize(wkt)?;
        tracing::trace!(tokens = tokens.len(), "tokenized WKT");

        let mut tokens = TokenQueue::new(tokens);
        if tokens.is_empty() {
            return Ok(None);
        }

        let shape = self.parse_geometry(&mut tokens, 0)?;
        match tokens.peek() {
            Some(token) => Err(GeoCodecError::Syntax(format!(
                "unexpected trailing {token}"
            ))),
            None => Ok(Some(shape)),
        }
    }

    fn parse_geometry(&self, tokens: &mut TokenQueue, depth: usize) -> Result<B::Shape> {
        if depth > self.options.max_depth {
            tracing::warn!(limit = self.options.max_depth, "WKT collections nested too deeply");
            return Err(GeoCodecError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }

        let keyword = tokens
            .peek()
            .filter(|token| token.kind == WktTokenKind::String)
            .and_then(|token| KEYWORDS.get(token.text.to_ascii_uppercase().as_str()))
            .copied();
        let Some(keyword) = keyword else {
            return Err(match tokens.peek() {
                Some(token) => GeoCodecError::Syntax(format!("WKT type {token} not supported")),
                None => GeoCodecError::Syntax("expected a WKT geometry but found end of input".into()),
            });
        };
        tokens.dequeue()?;
        ensure_supported(self.builder, keyword.kind())?;

        let dims = parse_dimensions(tokens)?;
        match keyword {
            WktKeyword::Point => self.parse_point(tokens, dims),
            WktKeyword::LineString => {
                let coords = parse_coordinate_sequence(tokens, dims)?;
                self.builder.to_line_string(coords)
            }
            WktKeyword::LinearRing => {
                let coords = parse_coordinate_sequence(tokens, dims)?;
                self.builder.to_linear_ring(coords)
            }
            WktKeyword::Polygon | WktKeyword::Triangle => {
                let rings = parse_polygon_rings(tokens, dims)?;
                self.builder.to_polygon(rings)
            }
            WktKeyword::MultiPoint => self.parse_multi_point(tokens, dims),
            WktKeyword::MultiLineString => {
                let lines = parse_polygon_rings(tokens, dims)?;
                self.builder.to_multi_line_string(lines)
            }
            WktKeyword::MultiPolygon => self.parse_multi_polygon(tokens, dims),
            WktKeyword::GeometryCollection => self.parse_geometry_collection(tokens, depth),
        }
    }

    fn parse_point(&self, tokens: &mut TokenQueue, dims: Dimensions) -> Result<B::Shape> {
        if tokens.next_is_literal(EMPTY) {
            tokens.dequeue()?;
            return self.builder.to_point(None);
        }

        tokens.dequeue_kind(WktTokenKind::LeftParenthesis)?;
        let coord = parse_coordinate(tokens, dims)?;
        tokens.dequeue_kind(WktTokenKind::RightParenthesis)?;
        self.builder.to_point(Some(coord))
    }

    fn parse_multi_point(&self, tokens: &mut TokenQueue, dims: Dimensions) -> Result<B::Shape> {
        if tokens.next_is_literal(EMPTY) {
            tokens.dequeue()?;
            return self.builder.to_multi_point(vec![]);
        }

        tokens.dequeue_kind(WktTokenKind::LeftParenthesis)?;
        let mut points = Vec::new();
        points.extend(parse_multi_point_member(tokens, dims)?);
        while tokens.next_is_kind(WktTokenKind::Comma) {
            tokens.dequeue()?;
            points.extend(parse_multi_point_member(tokens, dims)?);
        }
        tokens.dequeue_kind(WktTokenKind::RightParenthesis)?;

        self.builder.to_multi_point(points)
    }

    fn parse_multi_polygon(&self, tokens: &mut TokenQueue, dims: Dimensions) -> Result<B::Shape> {
        if tokens.next_is_literal(EMPTY) {
            tokens.dequeue()?;
            return self.builder.to_multi_polygon(vec![]);
        }

        tokens.dequeue_kind(WktTokenKind::LeftParenthesis)?;
        let mut polygons = vec![parse_polygon_rings(tokens, dims)?];
        while tokens.next_is_kind(WktTokenKind::Comma) {
            tokens.dequeue()?;
            polygons.push(parse_polygon_rings(tokens, dims)?);
        }
        tokens.dequeue_kind(WktTokenKind::RightParenthesis)?;

        self.builder.to_multi_polygon(polygons)
    }

    fn parse_geometry_collection(&self, tokens: &mut TokenQueue, depth: usize) -> Result<B::Shape> {
        if tokens.next_is_literal(EMPTY) {
            tokens.dequeue()?;
            return self.builder.to_geometry_collection(vec![]);
        }

        tokens.dequeue_kind(WktTokenKind::LeftParenthesis)?;
        let mut geometries = vec![self.parse_geometry(tokens, depth + 1)?];
        while tokens.next_is_kind(WktTokenKind::Comma) {
            tokens.dequeue()?;
            geometries.push(self.parse_geometry(tokens, depth + 1)?);
        }
        tokens.dequeue_kind(WktTokenKind::RightParenthesis)?;

        self.builder.to_geometry_collection(geometries)
    }
}

/// Consume an optional `Z`, `M` or `ZM` suffix.
fn parse_dimensions(tokens: &mut TokenQueue) -> Result<Dimensions> {
    let dims = match tokens.peek() {
        Some(token) if token.kind == WktTokenKind::String => {
            if token.is("Z") {
                Dimensions::Xyz
            } else if token.is("M") {
                Dimensions::Xym
            } else if token.is("ZM") {
                Dimensions::Xyzm
            } else {
                return Ok(Dimensions::Xy);
            }
        }
        _ => return Ok(Dimensions::Xy),
    };
    tokens.dequeue()?;
    Ok(dims)
}

/// Parse `x y [ordinate [ordinate]]`.
///
/// Under a bare `M` suffix the first extra value is m. Otherwise the first is z and the second
/// m. `ZM` requires both; further values are ignored. `NaN` marks an absent ordinate.
fn parse_coordinate(tokens: &mut TokenQueue, dims: Dimensions) -> Result<Coordinate> {
    let x_token = tokens.dequeue_kind(WktTokenKind::Number)?;
    let x = x_token.to_f64()?;
    let y = tokens.dequeue_kind(WktTokenKind::Number)?.to_f64()?;

    let extra = parse_optional_ordinates(tokens)?;
    if dims == Dimensions::Xyzm && extra.len() != 2 {
        return Err(GeoCodecError::Syntax(format!(
            "coordinate at position {} has {} ordinates, expected 4",
            x_token.position,
            extra.len() + 2
        )));
    }

    let (z, m) = match (dims, extra.as_slice()) {
        (Dimensions::Xym, [m, ..]) => (None, Some(*m)),
        (Dimensions::Xym, []) => (None, None),
        (_, [z, m, ..]) => (Some(*z), Some(*m)),
        (_, [z]) => (Some(*z), None),
        (_, []) => (None, None),
    };

    Ok(Coordinate {
        x,
        y,
        z: z.filter(|v| !v.is_nan()),
        m: m.filter(|v| !v.is_nan()),
    })
}

fn parse_optional_ordinates(tokens: &mut TokenQueue) -> Result<Vec<f64>> {
    let mut ordinates = Vec::new();
    loop {
        if tokens.next_is_kind(WktTokenKind::Number) {
            ordinates.push(tokens.dequeue()?.to_f64()?);
        } else if tokens.next_is_literal("NaN") {
            tokens.dequeue()?;
            ordinates.push(f64::NAN);
        } else {
            return Ok(ordinates);
        }
    }
}

/// `EMPTY` or `(coord, coord, ...)`.
fn parse_coordinate_sequence(tokens: &mut TokenQueue, dims: Dimensions) -> Result<Vec<Coordinate>> {
    if tokens.next_is_literal(EMPTY) {
        tokens.dequeue()?;
        return Ok(vec![]);
    }

    tokens.dequeue_kind(WktTokenKind::LeftParenthesis)?;
    let mut coords = vec![parse_coordinate(tokens, dims)?];
    while tokens.next_is_kind(WktTokenKind::Comma) {
        tokens.dequeue()?;
        coords.push(parse_coordinate(tokens, dims)?);
    }
    tokens.dequeue_kind(WktTokenKind::RightParenthesis)?;

    Ok(coords)
}

/// `EMPTY` or `(sequence, sequence, ...)`; the body of a polygon or a multilinestring.
fn parse_polygon_rings(tokens: &mut TokenQueue, dims: Dimensions) -> Result<Vec<Vec<Coordinate>>> {
    if tokens.next_is_literal(EMPTY) {
        tokens.dequeue()?;
        return Ok(vec![]);
    }

    tokens.dequeue_kind(WktTokenKind::LeftParenthesis)?;
    let mut rings = vec![parse_coordinate_sequence(tokens, dims)?];
    while tokens.next_is_kind(WktTokenKind::Comma) {
        tokens.dequeue()?;
        rings.push(parse_coordinate_sequence(tokens, dims)?);
    }
    tokens.dequeue_kind(WktTokenKind::RightParenthesis)?;

    Ok(rings)
}

/// A multipoint member: `x y`, `(x y)` or `EMPTY`, which is dropped.
fn parse_multi_point_member(tokens: &mut TokenQueue, dims: Dimensions) -> Result<Option<Coordinate>> {
    if tokens.next_is_literal(EMPTY) {
        tokens.dequeue()?;
        tracing::debug!("dropping EMPTY multipoint member");
        return Ok(None);
    }

    if tokens.next_is_kind(WktTokenKind::LeftParenthesis) {
        tokens.dequeue()?;
        let coord = parse_coordinate(tokens, dims)?;
        tokens.dequeue_kind(WktTokenKind::RightParenthesis)?;
        Ok(Some(coord))
    } else {
        parse_coordinate(tokens, dims).map(Some)
    }
}
