//! The blocking-conflict rule.
//!
//! A feature typed as blocking must never spatially intersect any other
//! feature's geometry. This module answers the one question the service
//! asks before create and update: does this candidate geometry intersect
//! any stored blocking feature?

use crate::bbox::BBox;
use crate::index::SpatialIndex;
use atlas_db_core::{FeatureId, Geometry};
use geo::Intersects;

/// True iff any blocking entry with `id != exclude` intersects
/// `candidate`. Boundary touching counts. Pure read; no side effects.
///
/// `exclude` lets an update skip the row being replaced so a feature
/// never blocks itself.
pub fn blocks(index: &SpatialIndex, candidate: &Geometry, exclude: Option<FeatureId>) -> bool {
    let geom = candidate.to_geo();
    let Some(bbox) = BBox::from_geometry(&geom) else {
        return false;
    };

    index
        .iter()
        .filter(|entry| entry.blocking)
        .filter(|entry| exclude != Some(entry.id))
        .filter(|entry| entry.bbox.intersects(&bbox))
        .any(|entry| entry.geom.intersects(&geom))
}
