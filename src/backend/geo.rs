//! Build [`geo::Geometry`] values.
//!
//! geo geometries are planar: z and m are dropped on the way in, and never produced on the way
//! out. The empty point is `Point(NaN, NaN)`. `Rect` stands in for an envelope, while `Line` and
//! `Triangle` are extracted as a line string and a polygon.

use geo::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, Rect,
};

use crate::builder::{wrong_kind, Envelope, ShapeBuilder};
use crate::coord::Coordinate;
use crate::error::Result;
use crate::kind::ShapeKind;

/// Builds [`geo::Geometry<f64>`](geo::Geometry) values.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoBuilder;

/// Convert to a [`geo::Coord`].
///
/// Only the first two dimensions will be kept.
fn coord_to_geo(coord: &Coordinate) -> geo::Coord {
    geo::Coord {
        x: coord.x,
        y: coord.y,
    }
}

fn coord_from_geo(coord: geo::Coord) -> Coordinate {
    Coordinate::new(coord.x, coord.y)
}

/// Convert to a [`geo::LineString`].
///
/// Only the first two dimensions will be kept.
fn line_string_to_geo(coords: &[Coordinate]) -> LineString {
    LineString::new(coords.iter().map(coord_to_geo).collect())
}

fn line_string_from_geo(line_string: &LineString) -> Vec<Coordinate> {
    line_string.coords().copied().map(coord_from_geo).collect()
}

/// Convert a shell and holes to a [`geo::Polygon`]. No rings is the empty polygon.
///
/// Only the first two dimensions will be kept. geo closes open rings.
fn polygon_to_geo(rings: &[Vec<Coordinate>]) -> Polygon {
    match rings.split_first() {
        Some((shell, holes)) => Polygon::new(
            line_string_to_geo(shell),
            holes.iter().map(|hole| line_string_to_geo(hole)).collect(),
        ),
        None => Polygon::new(LineString::new(vec![]), vec![]),
    }
}

fn polygon_from_geo(polygon: &Polygon) -> Vec<Vec<Coordinate>> {
    if polygon.exterior().0.is_empty() && polygon.interiors().is_empty() {
        return vec![];
    }
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(line_string_from_geo)
        .collect()
}

fn geometry_name(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

impl ShapeBuilder for GeoBuilder {
    type Shape = Geometry;

    fn kind_of(&self, shape: &Geometry) -> Result<ShapeKind> {
        let kind = match shape {
            Geometry::Point(_) => ShapeKind::Point,
            Geometry::Line(_) | Geometry::LineString(_) => ShapeKind::LineString,
            Geometry::Polygon(_) | Geometry::Triangle(_) => ShapeKind::Polygon,
            Geometry::MultiPoint(_) => ShapeKind::MultiPoint,
            Geometry::MultiLineString(_) => ShapeKind::MultiLineString,
            Geometry::MultiPolygon(_) => ShapeKind::MultiPolygon,
            Geometry::GeometryCollection(_) => ShapeKind::GeometryCollection,
            Geometry::Rect(_) => ShapeKind::Envelope,
        };
        Ok(kind)
    }

    fn supports(&self, kind: ShapeKind) -> bool {
        !matches!(
            kind,
            ShapeKind::Feature | ShapeKind::FeatureCollection | ShapeKind::Circle
        )
    }

    fn to_point(&self, coord: Option<Coordinate>) -> Result<Geometry> {
        let point = match coord {
            Some(coord) => Point(coord_to_geo(&coord)),
            None => Point::new(f64::NAN, f64::NAN),
        };
        Ok(Geometry::Point(point))
    }

    fn to_line_string(&self, coords: Vec<Coordinate>) -> Result<Geometry> {
        Ok(Geometry::LineString(line_string_to_geo(&coords)))
    }

    fn to_polygon(&self, rings: Vec<Vec<Coordinate>>) -> Result<Geometry> {
        Ok(Geometry::Polygon(polygon_to_geo(&rings)))
    }

    fn to_multi_point(&self, coords: Vec<Coordinate>) -> Result<Geometry> {
        Ok(Geometry::MultiPoint(MultiPoint::new(
            coords.iter().map(|coord| Point(coord_to_geo(coord))).collect(),
        )))
    }

    fn to_multi_line_string(&self, lines: Vec<Vec<Coordinate>>) -> Result<Geometry> {
        Ok(Geometry::MultiLineString(MultiLineString::new(
            lines.iter().map(|line| line_string_to_geo(line)).collect(),
        )))
    }

    fn to_multi_polygon(&self, polygons: Vec<Vec<Vec<Coordinate>>>) -> Result<Geometry> {
        Ok(Geometry::MultiPolygon(MultiPolygon::new(
            polygons.iter().map(|rings| polygon_to_geo(rings)).collect(),
        )))
    }

    fn to_geometry_collection(&self, geometries: Vec<Geometry>) -> Result<Geometry> {
        Ok(Geometry::GeometryCollection(GeometryCollection(geometries)))
    }

    /// geo has no ring type; rings are built as line strings.
    fn to_linear_ring(&self, coords: Vec<Coordinate>) -> Result<Geometry> {
        self.to_line_string(coords)
    }

    fn to_envelope(&self, envelope: Envelope) -> Result<Geometry> {
        Ok(Geometry::Rect(Rect::new(
            coord_to_geo(&envelope.min),
            coord_to_geo(&envelope.max),
        )))
    }

    fn from_point(&self, point: &Geometry) -> Result<Option<Coordinate>> {
        match point {
            Geometry::Point(point) if point.x().is_nan() && point.y().is_nan() => Ok(None),
            Geometry::Point(point) => Ok(Some(coord_from_geo(point.0))),
            other => Err(wrong_kind(ShapeKind::Point, geometry_name(other))),
        }
    }

    fn from_line_string(&self, line_string: &Geometry) -> Result<Vec<Coordinate>> {
        match line_string {
            Geometry::LineString(line_string) => Ok(line_string_from_geo(line_string)),
            Geometry::Line(line) => Ok(vec![coord_from_geo(line.start), coord_from_geo(line.end)]),
            other => Err(wrong_kind(ShapeKind::LineString, geometry_name(other))),
        }
    }

    fn from_polygon(&self, polygon: &Geometry) -> Result<Vec<Vec<Coordinate>>> {
        match polygon {
            Geometry::Polygon(polygon) => Ok(polygon_from_geo(polygon)),
            Geometry::Triangle(triangle) => Ok(polygon_from_geo(&triangle.to_polygon())),
            other => Err(wrong_kind(ShapeKind::Polygon, geometry_name(other))),
        }
    }

    fn from_multi_point(&self, multi_point: &Geometry) -> Result<Vec<Coordinate>> {
        match multi_point {
            Geometry::MultiPoint(multi_point) => {
                Ok(multi_point.iter().map(|point| coord_from_geo(point.0)).collect())
            }
            other => Err(wrong_kind(ShapeKind::MultiPoint, geometry_name(other))),
        }
    }

    fn from_multi_line_string(&self, multi_line_string: &Geometry) -> Result<Vec<Vec<Coordinate>>> {
        match multi_line_string {
            Geometry::MultiLineString(multi_line_string) => {
                Ok(multi_line_string.iter().map(line_string_from_geo).collect())
            }
            other => Err(wrong_kind(ShapeKind::MultiLineString, geometry_name(other))),
        }
    }

    fn from_multi_polygon(&self, multi_polygon: &Geometry) -> Result<Vec<Vec<Vec<Coordinate>>>> {
        match multi_polygon {
            Geometry::MultiPolygon(multi_polygon) => {
                Ok(multi_polygon.iter().map(polygon_from_geo).collect())
            }
            other => Err(wrong_kind(ShapeKind::MultiPolygon, geometry_name(other))),
        }
    }

    fn from_geometry_collection(&self, collection: &Geometry) -> Result<Vec<Geometry>> {
        match collection {
            Geometry::GeometryCollection(collection) => Ok(collection.0.clone()),
            other => Err(wrong_kind(ShapeKind::GeometryCollection, geometry_name(other))),
        }
    }

    fn from_linear_ring(&self, linear_ring: &Geometry) -> Result<Vec<Coordinate>> {
        self.from_line_string(linear_ring)
    }

    fn from_envelope(&self, envelope: &Geometry) -> Result<Envelope> {
        match envelope {
            Geometry::Rect(rect) => Ok(Envelope {
                min: coord_from_geo(rect.min()),
                max: coord_from_geo(rect.max()),
            }),
            other => Err(wrong_kind(ShapeKind::Envelope, geometry_name(other))),
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use geo::{coord, line_string, point, polygon, Line, Triangle};

    use super::*;
    use crate::io::geojson::{GeoJsonReader, GeoJsonWriter};
    use crate::io::wkt::{WktReader, WktWriter};

    fn read(wkt: &str) -> Geometry {
        WktReader::new(&GeoBuilder).read(wkt).unwrap().unwrap()
    }

    fn write(geometry: &Geometry) -> String {
        WktWriter::new(&GeoBuilder).write(geometry).unwrap()
    }

    #[test]
    fn empty_point_is_nan() {
        let Geometry::Point(empty) = read("POINT EMPTY") else {
            panic!("expected a point");
        };
        assert!(empty.x().is_nan() && empty.y().is_nan());
        assert_eq!(write(&Geometry::Point(empty)), "POINT EMPTY");
    }

    #[test]
    fn extra_ordinates_are_dropped() {
        assert_eq!(read("POINT ZM (1 2 3 4)"), Geometry::Point(point!(x: 1., y: 2.)));
        assert_eq!(write(&read("LINESTRING Z (1 2 3, 4 5 6)")), "LINESTRING (1 2, 4 5)");
    }

    #[test]
    fn polygon_round_trip() {
        let expected = polygon![
            exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 0.)],
            interiors: [[(x: 2., y: 1.), (x: 5., y: 1.), (x: 5., y: 4.), (x: 2., y: 1.)]],
        ];
        let Geometry::Polygon(actual) =
            read("POLYGON ((0 0, 10 0, 10 10, 0 0), (2 1, 5 1, 5 4, 2 1))")
        else {
            panic!("expected a polygon");
        };
        assert_relative_eq!(actual, expected);
        assert_eq!(
            write(&Geometry::Polygon(actual)),
            "POLYGON ((0 0, 10 0, 10 10, 0 0), (2 1, 5 1, 5 4, 2 1))"
        );
        assert_eq!(write(&read("POLYGON EMPTY")), "POLYGON EMPTY");
    }

    #[test]
    fn linear_ring_reads_as_line_string() {
        assert_eq!(
            read("LINEARRING (0 0, 1 0, 1 1, 0 0)"),
            Geometry::LineString(line_string![
                (x: 0., y: 0.), (x: 1., y: 0.), (x: 1., y: 1.), (x: 0., y: 0.)
            ])
        );
    }

    #[test]
    fn line_and_triangle_are_extracted() {
        let line = Geometry::Line(Line::new(coord! { x: 1., y: 2. }, coord! { x: 3., y: 4. }));
        assert_eq!(write(&line), "LINESTRING (1 2, 3 4)");

        let triangle = Geometry::Triangle(Triangle::new(
            coord! { x: 0., y: 0. },
            coord! { x: 1., y: 0. },
            coord! { x: 0., y: 1. },
        ));
        assert_eq!(write(&triangle), "POLYGON ((0 0, 1 0, 0 1, 0 0))");
    }

    #[test]
    fn rect_is_an_envelope() {
        let rect = Geometry::Rect(Rect::new(coord! { x: 0., y: 0. }, coord! { x: 1., y: 1. }));
        assert_eq!(GeoBuilder.kind_of(&rect).unwrap(), ShapeKind::Envelope);
        let envelope = GeoBuilder.from_envelope(&rect).unwrap();
        assert_eq!(envelope.max, Coordinate::new(1., 1.));
    }

    #[test]
    fn geojson_round_trip() {
        let value = serde_json::json!({
            "type": "GeometryCollection",
            "geometries": [
                {"type": "MultiPoint", "coordinates": [[1, 2], [3, 4]]},
                {"type": "MultiLineString", "coordinates": [[[1, 2], [3, 4]]]}
            ]
        });
        let geometry = GeoJsonReader::new(&GeoBuilder).read(&value).unwrap().unwrap();
        assert!(matches!(&geometry, Geometry::GeometryCollection(gc) if gc.0.len() == 2));
        assert_eq!(GeoJsonWriter::new(&GeoBuilder).write(&geometry).unwrap(), value);
    }
}
