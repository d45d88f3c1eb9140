//! Axis-aligned bounding boxes for prefiltering.

use geo::BoundingRect;
use geo_types::Geometry;

/// Axis-aligned lon/lat bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Check if this bbox intersects another. Edge contact counts.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }

    /// Compute from a geo-types geometry.
    ///
    /// `None` only for empty geometries, which the validated model never
    /// produces.
    pub fn from_geometry(geom: &Geometry<f64>) -> Option<Self> {
        let rect = geom.bounding_rect()?;
        Some(Self {
            min_lon: rect.min().x,
            max_lon: rect.max().x,
            min_lat: rect.min().y,
            max_lat: rect.max().y,
        })
    }
}
