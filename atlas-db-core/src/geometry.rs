//! The closed geometry model.
//!
//! Geometries are a tagged union of the three kinds the store accepts:
//! point, linestring, polygon (single ring, no holes). Arity and
//! ring-closure invariants are checked at construction, so a value of
//! [`Geometry`] is valid by definition. The reference frame is fixed to
//! WGS84 (SRID 4326); coordinates are lon/lat degrees and are not
//! range-clamped.

use crate::error::{GeometryError, Result};
use serde::Serialize;

/// The one SRID used throughout the store (WGS84 lon/lat degrees).
pub const SRID_WGS84: u32 = 4326;

/// Geometry kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl GeometryKind {
    /// WKT tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lon/lat position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// An open path of at least two lon/lat positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LineString {
    coords: Vec<(f64, f64)>,
}

impl LineString {
    /// Build a linestring, rejecting fewer than two coordinate pairs.
    pub fn new(coords: Vec<(f64, f64)>) -> Result<Self> {
        if coords.len() < 2 {
            return Err(GeometryError::TooFewCoordinates {
                kind: GeometryKind::LineString,
                min: 2,
                got: coords.len(),
            });
        }
        Ok(Self { coords })
    }

    pub fn coords(&self) -> &[(f64, f64)] {
        &self.coords
    }
}

/// A single closed ring of at least four lon/lat positions
/// (first == last).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Polygon {
    ring: Vec<(f64, f64)>,
}

impl Polygon {
    /// Build a polygon ring, rejecting short or open rings.
    ///
    /// Closure is exact coordinate equality; the codec never closes a
    /// ring on the caller's behalf.
    pub fn new(ring: Vec<(f64, f64)>) -> Result<Self> {
        if ring.len() < 4 {
            return Err(GeometryError::TooFewCoordinates {
                kind: GeometryKind::Polygon,
                min: 4,
                got: ring.len(),
            });
        }
        if ring.first() != ring.last() {
            return Err(GeometryError::OpenRing);
        }
        Ok(Self { ring })
    }

    pub fn ring(&self) -> &[(f64, f64)] {
        &self.ring
    }
}

/// A validated geometry in the WGS84 frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
}

impl Geometry {
    /// Kind discriminator.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Convert to a geo-types geometry for exact spatial predicates.
    pub fn to_geo(&self) -> geo_types::Geometry<f64> {
        match self {
            Geometry::Point(p) => geo_types::Geometry::Point(geo_types::Point::new(p.lon, p.lat)),
            Geometry::LineString(ls) => {
                geo_types::Geometry::LineString(geo_types::LineString::from(ls.coords.clone()))
            }
            Geometry::Polygon(poly) => geo_types::Geometry::Polygon(geo_types::Polygon::new(
                geo_types::LineString::from(poly.ring.clone()),
                vec![],
            )),
        }
    }
}
