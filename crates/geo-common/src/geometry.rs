//! Typed GeoJSON geometry model.
//!
//! Input arrives as untyped JSON and is decoded into [`Geometry`], a
//! tagged variant keyed by the GeoJSON `type` field. Conversion into
//! `geo` types performs the structural topology checks (arity, ring
//! closure); the deeper validity analysis (self-intersection, nesting)
//! runs on the converted `geo` geometry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The six geometry kinds accepted by the pipeline.
pub const GEOMETRY_TYPES: [&str; 6] = [
    "Point",
    "LineString",
    "Polygon",
    "MultiPoint",
    "MultiLineString",
    "MultiPolygon",
];

/// A single coordinate: longitude, latitude, optional elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<f64>", try_from = "Vec<f64>")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    fn coord(&self) -> geo::Coord<f64> {
        geo::Coord { x: self.x, y: self.y }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [x, y] => Ok(Position { x: *x, y: *y, z: None }),
            [x, y, z, ..] => Ok(Position { x: *x, y: *y, z: Some(*z) }),
            _ => Err(format!(
                "position needs at least 2 coordinates, got {}",
                values.len()
            )),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(pos: Position) -> Self {
        match pos.z {
            Some(z) => vec![pos.x, pos.y, z],
            None => vec![pos.x, pos.y],
        }
    }
}

/// A GeoJSON geometry, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPoint { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

/// Structural topology defects found while converting raw coordinates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryDefect {
    #[error("LineString needs at least 2 positions, got {0}")]
    ShortLineString(usize),

    #[error("polygon ring {ring} needs at least 4 positions, got {len}")]
    ShortRing { ring: usize, len: usize },

    #[error("polygon ring {0} is not closed")]
    OpenRing(usize),

    #[error("polygon has no rings")]
    EmptyPolygon,
}

impl Geometry {
    /// The GeoJSON `type` tag for this geometry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::LineString { .. } => "LineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }

    /// Convert to a `geo` geometry, checking arity and ring closure.
    pub fn to_geo(&self) -> Result<geo::Geometry<f64>, GeometryDefect> {
        match self {
            Geometry::Point { coordinates } => {
                Ok(geo::Geometry::Point(geo::Point(coordinates.coord())))
            }
            Geometry::LineString { coordinates } => {
                Ok(geo::Geometry::LineString(line_string(coordinates)?))
            }
            Geometry::Polygon { coordinates } => Ok(geo::Geometry::Polygon(polygon(coordinates)?)),
            Geometry::MultiPoint { coordinates } => Ok(geo::Geometry::MultiPoint(
                geo::MultiPoint::new(
                    coordinates
                        .iter()
                        .map(|p| geo::Point(p.coord()))
                        .collect(),
                ),
            )),
            Geometry::MultiLineString { coordinates } => Ok(geo::Geometry::MultiLineString(
                geo::MultiLineString::new(
                    coordinates
                        .iter()
                        .map(|line| line_string(line))
                        .collect::<Result<_, _>>()?,
                ),
            )),
            Geometry::MultiPolygon { coordinates } => Ok(geo::Geometry::MultiPolygon(
                geo::MultiPolygon::new(
                    coordinates
                        .iter()
                        .map(|poly| polygon(poly))
                        .collect::<Result<_, _>>()?,
                ),
            )),
        }
    }
}

fn line_string(positions: &[Position]) -> Result<geo::LineString<f64>, GeometryDefect> {
    if positions.len() < 2 {
        return Err(GeometryDefect::ShortLineString(positions.len()));
    }
    Ok(geo::LineString::new(
        positions.iter().map(Position::coord).collect(),
    ))
}

fn polygon(rings: &[Vec<Position>]) -> Result<geo::Polygon<f64>, GeometryDefect> {
    let mut converted = Vec::with_capacity(rings.len());

    for (index, ring) in rings.iter().enumerate() {
        if ring.len() < 4 {
            return Err(GeometryDefect::ShortRing {
                ring: index,
                len: ring.len(),
            });
        }
        // GeoJSON rings must repeat the first position as the last one.
        let first = ring[0];
        let last = ring[ring.len() - 1];
        if first.x != last.x || first.y != last.y {
            return Err(GeometryDefect::OpenRing(index));
        }
        converted.push(geo::LineString::new(ring.iter().map(Position::coord).collect()));
    }

    let mut rings = converted.into_iter();
    let exterior = rings.next().ok_or(GeometryDefect::EmptyPolygon)?;
    Ok(geo::Polygon::new(exterior, rings.collect()))
}
