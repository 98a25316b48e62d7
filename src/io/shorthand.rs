//! The shorthand text forms accepted alongside WKT.
//!
//! Before falling back to the WKT grammar the reader tries, in order:
//!
//! - `CIRCLE(x y d=radius)`, if the builder supports circles,
//! - `lat,lon`, a comma-separated pair with latitude first, if the builder supports points,
//! - `lon lat`, a whitespace-separated pair, under the same condition,
//! - `minX minY maxX maxY`, if the builder supports envelopes.
//!
//! The writer emits the circle and envelope forms and WKT for everything else.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::builder::{Circle, Envelope, ShapeBuilder};
use crate::coord::Coordinate;
use crate::error::{GeoCodecError, Result};
use crate::io::wkt::{WktReader, WktWriter, WktWriterOptions};
use crate::io::ReaderOptions;
use crate::kind::ShapeKind;

static CIRCLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*CIRCLE\s*\(\s*([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s+([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s+d=([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s*\)\s*$",
    )
    .expect("Invalid circle regex pattern")
});

static LAT_LON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s*,\s*([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s*$",
    )
    .expect("Invalid lat,lon regex pattern")
});

static LON_LAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s+([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s*$",
    )
    .expect("Invalid lon lat regex pattern")
});

static ENVELOPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s+([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s+([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s+([+-]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][+-]?\d+)?)\s*$",
    )
    .expect("Invalid envelope regex pattern")
});

fn capture_f64(captures: &Captures, group: usize) -> Result<f64> {
    let Some(m) = captures.get(group) else {
        return Err(GeoCodecError::Syntax(format!("missing number in group {group}")));
    };
    lexical_core::parse::<f64>(m.as_str().as_bytes()).map_err(|_| GeoCodecError::Lexical {
        position: m.start(),
        found: m.as_str().to_string(),
    })
}

/// Reads the shorthand forms, then WKT.
pub struct ShorthandReader<'a, B: ShapeBuilder> {
    builder: &'a B,
    wkt: WktReader<'a, B>,
}

impl<'a, B: ShapeBuilder> ShorthandReader<'a, B> {
    pub fn new(builder: &'a B) -> Self {
        Self::new_with_options(builder, Default::default())
    }

    pub fn new_with_options(builder: &'a B, options: ReaderOptions) -> Self {
        Self {
            builder,
            wkt: WktReader::new_with_options(builder, options),
        }
    }

    /// Blank text reads as `None`.
    pub fn read(&self, text: &str) -> Result<Option<B::Shape>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        if let Some(shape) = self.try_circle(text)? {
            return Ok(Some(shape));
        }
        if let Some(shape) = self.try_lat_lon(text)? {
            return Ok(Some(shape));
        }
        if let Some(shape) = self.try_lon_lat(text)? {
            return Ok(Some(shape));
        }
        if let Some(shape) = self.try_envelope(text)? {
            return Ok(Some(shape));
        }

        tracing::debug!("no shorthand form matched, reading as WKT");
        self.wkt.read(text)
    }

    fn try_circle(&self, text: &str) -> Result<Option<B::Shape>> {
        if !self.builder.supports(ShapeKind::Circle) {
            return Ok(None);
        }
        let Some(captures) = CIRCLE.captures(text) else {
            return Ok(None);
        };

        let circle = Circle {
            center: Coordinate::new(capture_f64(&captures, 1)?, capture_f64(&captures, 2)?),
            radius: capture_f64(&captures, 3)?,
        };
        self.builder.to_circle(circle).map(Some)
    }

    fn try_lat_lon(&self, text: &str) -> Result<Option<B::Shape>> {
        if !self.builder.supports(ShapeKind::Point) {
            return Ok(None);
        }
        let Some(captures) = LAT_LON.captures(text) else {
            return Ok(None);
        };

        let lat = capture_f64(&captures, 1)?;
        let lon = capture_f64(&captures, 2)?;
        self.builder.to_point(Some(Coordinate::new(lon, lat))).map(Some)
    }

    fn try_lon_lat(&self, text: &str) -> Result<Option<B::Shape>> {
        if !self.builder.supports(ShapeKind::Point) {
            return Ok(None);
        }
        let Some(captures) = LON_LAT.captures(text) else {
            return Ok(None);
        };

        let coord = Coordinate::new(capture_f64(&captures, 1)?, capture_f64(&captures, 2)?);
        self.builder.to_point(Some(coord)).map(Some)
    }

    fn try_envelope(&self, text: &str) -> Result<Option<B::Shape>> {
        if !self.builder.supports(ShapeKind::Envelope) {
            return Ok(None);
        }
        let Some(captures) = ENVELOPE.captures(text) else {
            return Ok(None);
        };

        let envelope = Envelope {
            min: Coordinate::new(capture_f64(&captures, 1)?, capture_f64(&captures, 2)?),
            max: Coordinate::new(capture_f64(&captures, 3)?, capture_f64(&captures, 4)?),
        };
        self.builder.to_envelope(envelope).map(Some)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShorthandWriterOptions {
    /// Decimal places for circle and envelope ordinates.
    pub precision: usize,
}

impl Default for ShorthandWriterOptions {
    fn default() -> Self {
        Self { precision: 9 }
    }
}

/// Writes circles and envelopes in their shorthand form and everything else as WKT.
pub struct ShorthandWriter<'a, B: ShapeBuilder> {
    builder: &'a B,
    wkt: WktWriter<'a, B>,
    options: ShorthandWriterOptions,
}

impl<'a, B: ShapeBuilder> ShorthandWriter<'a, B> {
    pub fn new(builder: &'a B) -> Self {
        Self::new_with_options(builder, Default::default(), Default::default())
    }

    pub fn new_with_options(
        builder: &'a B,
        options: ShorthandWriterOptions,
        wkt_options: WktWriterOptions,
    ) -> Self {
        Self {
            builder,
            wkt: WktWriter::new_with_options(builder, wkt_options),
            options,
        }
    }

    pub fn write(&self, shape: &B::Shape) -> Result<String> {
        let precision = self.options.precision;
        match self.builder.kind_of(shape)? {
            ShapeKind::Circle if self.builder.supports(ShapeKind::Circle) => {
                let circle = self.builder.from_circle(shape)?;
                check_finite(&[circle.center.x, circle.center.y, circle.radius])?;
                Ok(format!(
                    "CIRCLE({:.precision$} {:.precision$} d={:.precision$})",
                    circle.center.x, circle.center.y, circle.radius
                ))
            }
            ShapeKind::Envelope if self.builder.supports(ShapeKind::Envelope) => {
                let envelope = self.builder.from_envelope(shape)?;
                let Envelope { min, max } = envelope;
                check_finite(&[min.x, min.y, max.x, max.y])?;
                Ok(format!(
                    "{:.precision$} {:.precision$} {:.precision$} {:.precision$}",
                    min.x, min.y, max.x, max.y
                ))
            }
            _ => self.wkt.write(shape),
        }
    }
}

fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().find(|value| !value.is_finite()) {
        Some(value) => Err(GeoCodecError::Serialization(format!(
            "cannot write {value} in shorthand form"
        ))),
        None => Ok(()),
    }
}
