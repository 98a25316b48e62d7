use std::fmt::Display;

use phf::phf_map;

/// The kind of a shape, as reported by [`ShapeBuilder::kind_of`].
///
/// Builders map their native types onto this tag once, at the boundary; readers and writers
/// dispatch on it instead of inspecting backend types.
///
/// [`ShapeBuilder::kind_of`]: crate::ShapeBuilder::kind_of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Feature,
    FeatureCollection,
    Envelope,
    Circle,
}

/// GeoJSON `"type"` names, lowercased.
static GEOJSON_TYPES: phf::Map<&'static str, ShapeKind> = phf_map! {
    "point" => ShapeKind::Point,
    "linestring" => ShapeKind::LineString,
    "polygon" => ShapeKind::Polygon,
    "multipoint" => ShapeKind::MultiPoint,
    "multilinestring" => ShapeKind::MultiLineString,
    "multipolygon" => ShapeKind::MultiPolygon,
    "geometrycollection" => ShapeKind::GeometryCollection,
    "feature" => ShapeKind::Feature,
    "featurecollection" => ShapeKind::FeatureCollection,
};

impl ShapeKind {
    /// The canonical name of this kind, which is also its GeoJSON `"type"` where one exists.
    pub const fn name(&self) -> &'static str {
        match self {
            ShapeKind::Point => "Point",
            ShapeKind::LineString => "LineString",
            ShapeKind::LinearRing => "LinearRing",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::MultiPoint => "MultiPoint",
            ShapeKind::MultiLineString => "MultiLineString",
            ShapeKind::MultiPolygon => "MultiPolygon",
            ShapeKind::GeometryCollection => "GeometryCollection",
            ShapeKind::Feature => "Feature",
            ShapeKind::FeatureCollection => "FeatureCollection",
            ShapeKind::Envelope => "Envelope",
            ShapeKind::Circle => "Circle",
        }
    }

    /// Look up a GeoJSON `"type"` member, ignoring ASCII case.
    pub fn from_geojson_type(name: &str) -> Option<Self> {
        GEOJSON_TYPES.get(name.to_ascii_lowercase().as_str()).copied()
    }

    /// Whether this kind is one of the seven GeoJSON geometry types.
    pub const fn is_geometry(&self) -> bool {
        matches!(
            self,
            ShapeKind::Point
                | ShapeKind::LineString
                | ShapeKind::Polygon
                | ShapeKind::MultiPoint
                | ShapeKind::MultiLineString
                | ShapeKind::MultiPolygon
                | ShapeKind::GeometryCollection
        )
    }
}

impl Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
