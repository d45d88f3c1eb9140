//! In-memory spatial index over stored features.
//!
//! Each entry keeps the feature's bounding box, its parsed geo-types
//! geometry, and whether the feature is blocking. Queries prune by bbox
//! first, then refine with an exact `Intersects` test; boundary contact
//! counts as intersecting.
//!
//! The index holds no row data; the store is responsible for updating
//! it in the same exclusive section as the row it mirrors.

use crate::bbox::BBox;
use atlas_db_core::{FeatureId, Geometry};
use geo::Intersects;
use rustc_hash::FxHashMap;

/// One indexed geometry.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: FeatureId,
    pub bbox: BBox,
    pub geom: geo_types::Geometry<f64>,
    pub blocking: bool,
}

/// Id-keyed spatial index with bbox prefiltering.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    entries: FxHashMap<FeatureId, IndexEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Insert or replace the entry for `id`.
    pub fn insert(&mut self, id: FeatureId, geometry: &Geometry, blocking: bool) {
        let geom = geometry.to_geo();
        // A validated geometry is never empty, so the bbox always exists.
        let Some(bbox) = BBox::from_geometry(&geom) else {
            return;
        };
        self.entries.insert(
            id,
            IndexEntry {
                id,
                bbox,
                geom,
                blocking,
            },
        );
    }

    /// Remove the entry for `id`. Returns whether it existed.
    pub fn remove(&mut self, id: FeatureId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Ids of every entry whose geometry intersects `candidate`.
    ///
    /// Returned in ascending id order for deterministic reads.
    pub fn intersecting_ids(&self, candidate: &Geometry) -> Vec<FeatureId> {
        let geom = candidate.to_geo();
        let Some(bbox) = BBox::from_geometry(&geom) else {
            return Vec::new();
        };

        let mut ids: Vec<FeatureId> = self
            .entries
            .values()
            .filter(|entry| entry.bbox.intersects(&bbox))
            .filter(|entry| entry.geom.intersects(&geom))
            .map(|entry| entry.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_db_core::codec;

    fn geom(text: &str) -> Geometry {
        codec::parse(text).unwrap()
    }

    #[test]
    fn insert_query_remove() {
        let mut index = SpatialIndex::new();
        index.insert(1, &geom("LINESTRING(0 0, 10 10)"), false);
        index.insert(2, &geom("POINT(100 100)"), false);

        let crossing = geom("LINESTRING(5 0, 5 10)");
        assert_eq!(index.intersecting_ids(&crossing), vec![1]);

        assert!(index.remove(1));
        assert!(!index.remove(1));
        assert!(index.intersecting_ids(&crossing).is_empty());
    }

    #[test]
    fn replace_entry_updates_geometry() {
        let mut index = SpatialIndex::new();
        index.insert(1, &geom("POINT(0 0)"), false);
        index.insert(1, &geom("POINT(50 50)"), false);
        assert_eq!(index.len(), 1);
        assert!(index.intersecting_ids(&geom("POINT(0 0)")).is_empty());
        assert_eq!(index.intersecting_ids(&geom("POINT(50 50)")), vec![1]);
    }

    #[test]
    fn bbox_overlap_without_exact_intersection() {
        // Bboxes overlap, geometries do not touch: the refine step must
        // filter the candidate out.
        let mut index = SpatialIndex::new();
        index.insert(1, &geom("LINESTRING(0 0, 10 10)"), false);
        assert!(index
            .intersecting_ids(&geom("LINESTRING(0 1, 8 10)"))
            .is_empty());
    }

    #[test]
    fn boundary_touch_counts() {
        let mut index = SpatialIndex::new();
        index.insert(1, &geom("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0))"), false);
        // Shares only the corner point.
        assert_eq!(
            index.intersecting_ids(&geom("LINESTRING(10 10, 20 20)")),
            vec![1]
        );
    }
}
