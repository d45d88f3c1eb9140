//! WKT codec: two-stage parse, deterministic serialize.
//!
//! Parsing runs in two stages. A structural pre-check matches the text
//! against per-kind coordinate-pair grammars and rejects obviously
//! malformed input cheaply. The authoritative parse then goes through
//! the `wkt` crate and builds the typed [`Geometry`], which re-checks
//! arity and ring closure at construction. The pre-check grammar only
//! admits plain signed decimals, so scientific notation and 3D/measured
//! coordinates never reach the second stage.
//!
//! Serialization converts to geo-types and formats via `wkt::ToWkt`. It
//! is deterministic for a given geometry but does not byte-match
//! arbitrary input formatting.

use crate::error::{GeometryError, Result};
use crate::geometry::{Geometry, LineString, Point, Polygon};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use wkt::ToWkt;

// Grammar: POINT(x y) — exactly one pair.
static POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*POINT\s*\(\s*-?\d+(\.\d+)?\s+-?\d+(\.\d+)?\s*\)\s*$")
        .expect("point grammar")
});

// Grammar: LINESTRING(x y, x y, ...) — two or more pairs.
static LINESTRING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*LINESTRING\s*\(\s*-?\d+(\.\d+)?\s+-?\d+(\.\d+)?(\s*,\s*-?\d+(\.\d+)?\s+-?\d+(\.\d+)?)+\s*\)\s*$",
    )
    .expect("linestring grammar")
});

// Grammar: POLYGON((x y, ...)) — single ring, four or more pairs.
static POLYGON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*POLYGON\s*\(\s*\(\s*-?\d+(\.\d+)?\s+-?\d+(\.\d+)?(\s*,\s*-?\d+(\.\d+)?\s+-?\d+(\.\d+)?){3,}\s*\)\s*\)\s*$",
    )
    .expect("polygon grammar")
});

/// Check the text against the per-kind structural grammars.
///
/// A `true` result means the text is worth handing to the authoritative
/// parser, not that it is a valid geometry (the ring-closure invariant
/// is beyond the grammar).
pub fn structurally_valid(text: &str) -> bool {
    !text.trim().is_empty()
        && (POINT_RE.is_match(text) || LINESTRING_RE.is_match(text) || POLYGON_RE.is_match(text))
}

/// Parse WKT text into a validated [`Geometry`].
pub fn parse(text: &str) -> Result<Geometry> {
    if !structurally_valid(text) {
        return Err(GeometryError::InvalidSyntax(format!(
            "not a supported WKT geometry: {}",
            text.trim()
        )));
    }

    let parsed = wkt::Wkt::<f64>::from_str(text.trim())
        .map_err(|e| GeometryError::InvalidSyntax(format!("{e:?}")))?;

    match parsed {
        wkt::Wkt::Point(p) => {
            let coord = p
                .0
                .ok_or_else(|| GeometryError::InvalidSyntax("empty point".into()))?;
            Ok(Geometry::Point(Point::new(coord.x, coord.y)))
        }
        wkt::Wkt::LineString(ls) => {
            let coords = ls.0.iter().map(|c| (c.x, c.y)).collect();
            Ok(Geometry::LineString(LineString::new(coords)?))
        }
        wkt::Wkt::Polygon(poly) => {
            // One exterior ring; holes are outside the accepted grammar.
            if poly.0.len() != 1 {
                return Err(GeometryError::Unsupported(
                    "polygons with interior rings are not accepted".into(),
                ));
            }
            let ring = poly.0[0].0.iter().map(|c| (c.x, c.y)).collect();
            Ok(Geometry::Polygon(Polygon::new(ring)?))
        }
        _ => Err(GeometryError::Unsupported(
            "only POINT, LINESTRING and POLYGON are supported".into(),
        )),
    }
}

/// Serialize a geometry to WKT text.
pub fn serialize(geometry: &Geometry) -> String {
    geometry.to_geo().wkt_string()
}
