//! In-memory feature store with JSON snapshot persistence.
//!
//! Rows live in a `BTreeMap` keyed by id (ids are assigned
//! monotonically, so id order doubles as insertion order) with the
//! spatial index beside them, both behind one `tokio::sync::RwLock`.
//! Reads take the read lock and run concurrently; every mutation takes
//! the write lock, which serializes it against all other mutations and
//! keeps row and index in step within one exclusive section.
//!
//! Durability is a snapshot: [`MemoryFeatureStore::snapshot_to`] writes
//! all rows as JSON, [`MemoryFeatureStore::load_from`] rebuilds rows,
//! index, and the id counter. Geometry crosses the snapshot boundary as
//! WKT text through the codec, so a corrupt snapshot fails closed.

use crate::error::{ApiError, Result};
use crate::store::{clamp_page, clamp_page_size, FeatureStore};
use atlas_db_core::{codec, Feature, FeatureId, FeatureType, Geometry, NewFeature};
use atlas_db_spatial::{conflict, SpatialIndex};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<FeatureId, Feature>,
    index: SpatialIndex,
    next_id: FeatureId,
}

impl Inner {
    fn insert_row(&mut self, new: NewFeature) -> Feature {
        let id = self.next_id;
        self.next_id += 1;
        let feature = Feature::from_new(id, new);
        self.index
            .insert(id, &feature.geometry, feature.feature_type.is_blocking());
        self.rows.insert(id, feature.clone());
        feature
    }
}

/// In-memory [`FeatureStore`] implementation.
#[derive(Debug)]
pub struct MemoryFeatureStore {
    inner: RwLock<Inner>,
}

impl MemoryFeatureStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                index: SpatialIndex::new(),
                next_id: 1,
            }),
        }
    }

    /// Write all rows to `path` as a JSON snapshot.
    pub async fn snapshot_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = {
            let inner = self.inner.read().await;
            Snapshot {
                next_id: inner.next_id,
                rows: inner.rows.values().map(SnapshotRow::from).collect(),
            }
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(path.as_ref(), bytes).await?;
        debug!(rows = snapshot.rows.len(), path = %path.as_ref().display(), "wrote snapshot");
        Ok(())
    }

    /// Rebuild a store from a JSON snapshot.
    ///
    /// Every row's geometry is re-parsed from its WKT text, so the
    /// construction invariants hold for loaded data too.
    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;

        let mut inner = Inner {
            next_id: 1,
            ..Inner::default()
        };
        for row in snapshot.rows {
            let geometry = codec::parse(&row.wkt)
                .map_err(|e| ApiError::Snapshot(format!("row {}: {e}", row.id)))?;
            let feature_type = FeatureType::parse(&row.feature_type).ok_or_else(|| {
                ApiError::Snapshot(format!("row {}: bad type code {:?}", row.id, row.feature_type))
            })?;
            inner
                .index
                .insert(row.id, &geometry, feature_type.is_blocking());
            inner.rows.insert(
                row.id,
                Feature {
                    id: row.id,
                    name: row.name,
                    geometry,
                    wkt_text: row.wkt,
                    feature_type,
                    photos: row.photos,
                },
            );
        }
        // Ids are never reused, even across restarts.
        let max_id = inner.rows.keys().next_back().copied().unwrap_or(0);
        inner.next_id = snapshot.next_id.max(max_id + 1);

        debug!(rows = inner.rows.len(), path = %path.as_ref().display(), "loaded snapshot");
        Ok(Self {
            inner: RwLock::new(inner),
        })
    }
}

impl Default for MemoryFeatureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureStore for MemoryFeatureStore {
    async fn get(&self, id: FeatureId) -> Result<Feature> {
        let inner = self.inner.read().await;
        inner.rows.get(&id).cloned().ok_or(ApiError::NotFound(id))
    }

    async fn add(&self, new: NewFeature) -> Result<Feature> {
        let mut inner = self.inner.write().await;
        let feature = inner.insert_row(new);
        debug!(id = feature.id, "added feature");
        Ok(feature)
    }

    async fn add_batch(&self, batch: Vec<NewFeature>) -> Result<Vec<Feature>> {
        // One exclusive section for the whole batch: all rows commit
        // together or, had anything failed before this point, none were
        // written.
        let mut inner = self.inner.write().await;
        let features: Vec<Feature> = batch.into_iter().map(|new| inner.insert_row(new)).collect();
        debug!(count = features.len(), "added feature batch");
        Ok(features)
    }

    async fn update(&self, feature: Feature) -> Result<Feature> {
        let mut inner = self.inner.write().await;
        if !inner.rows.contains_key(&feature.id) {
            return Err(ApiError::NotFound(feature.id));
        }
        inner.index.insert(
            feature.id,
            &feature.geometry,
            feature.feature_type.is_blocking(),
        );
        inner.rows.insert(feature.id, feature.clone());
        debug!(id = feature.id, "updated feature");
        Ok(feature)
    }

    async fn remove(&self, id: FeatureId) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.rows.remove(&id).is_none() {
            return Err(ApiError::NotFound(id));
        }
        inner.index.remove(id);
        debug!(id, "removed feature");
        Ok(())
    }

    async fn query(
        &self,
        name_contains: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<Feature>, u64)> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let needle = name_contains
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase());

        let inner = self.inner.read().await;
        let matching: Vec<&Feature> = inner
            .rows
            .values()
            .filter(|f| match &needle {
                Some(sub) => f.name.to_lowercase().contains(sub),
                None => true,
            })
            .collect();

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(page_size) as usize)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn intersecting(&self, geometry: &Geometry) -> Result<Vec<Feature>> {
        let inner = self.inner.read().await;
        let features = inner
            .index
            .intersecting_ids(geometry)
            .into_iter()
            .filter_map(|id| inner.rows.get(&id).cloned())
            .collect();
        Ok(features)
    }

    async fn blocks(&self, geometry: &Geometry, exclude: Option<FeatureId>) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(conflict::blocks(&inner.index, geometry, exclude))
    }

    async fn append_photos(&self, id: FeatureId, urls: Vec<String>) -> Result<Feature> {
        let mut inner = self.inner.write().await;
        let row = inner.rows.get_mut(&id).ok_or(ApiError::NotFound(id))?;
        row.photos.extend(urls);
        Ok(row.clone())
    }
}

/// One row in the JSON snapshot. Geometry travels as WKT text.
#[derive(Serialize, Deserialize)]
struct SnapshotRow {
    id: FeatureId,
    name: String,
    wkt: String,
    #[serde(rename = "type")]
    feature_type: String,
    photos: Vec<String>,
}

impl From<&Feature> for SnapshotRow {
    fn from(f: &Feature) -> Self {
        Self {
            id: f.id,
            name: f.name.clone(),
            wkt: f.wkt_text.clone(),
            feature_type: f.feature_type.to_string(),
            photos: f.photos.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    next_id: FeatureId,
    rows: Vec<SnapshotRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_feature(name: &str, wkt: &str, type_code: &str) -> NewFeature {
        NewFeature {
            name: name.to_string(),
            geometry: codec::parse(wkt).unwrap(),
            wkt_text: wkt.to_string(),
            feature_type: FeatureType::parse(type_code).unwrap(),
        }
    }

    #[tokio::test]
    async fn ids_are_monotonic_and_never_reused() {
        let store = MemoryFeatureStore::new();
        let a = store.add(new_feature("a", "POINT(1 1)", "A")).await.unwrap();
        let b = store.add(new_feature("b", "POINT(2 2)", "A")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        store.remove(b.id).await.unwrap();
        let c = store.add(new_feature("c", "POINT(3 3)", "A")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn pagination_arithmetic() {
        let store = MemoryFeatureStore::new();
        for i in 0..23 {
            store
                .add(new_feature(&format!("row {i}"), "POINT(1 1)", "A"))
                .await
                .unwrap();
        }

        for page_size in [1i64, 5, 10, 50] {
            for page in 1i64..=6 {
                let (items, total) = store.query(None, page, page_size).await.unwrap();
                assert_eq!(total, 23);
                let expected = (23i64 - (page - 1) * page_size).clamp(0, page_size);
                assert_eq!(items.len() as i64, expected, "page={page} size={page_size}");
            }
        }
    }

    #[tokio::test]
    async fn invalid_paging_is_clamped_not_rejected() {
        let store = MemoryFeatureStore::new();
        store.add(new_feature("a", "POINT(1 1)", "A")).await.unwrap();

        let (items, total) = store.query(None, -5, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items.len(), 1);

        let (items, _) = store.query(None, 1, 100_000).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn name_filter_is_case_insensitive_substring() {
        let store = MemoryFeatureStore::new();
        store
            .add(new_feature("Main Road", "POINT(1 1)", "A"))
            .await
            .unwrap();
        store
            .add(new_feature("River", "POINT(2 2)", "A"))
            .await
            .unwrap();

        let (items, total) = store.query(Some("roAD"), 1, 50).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].name, "Main Road");

        let (_, total) = store.query(Some("bridge"), 1, 50).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn intersecting_returns_rows() {
        let store = MemoryFeatureStore::new();
        let line = store
            .add(new_feature("line", "LINESTRING(0 0, 10 10)", "A"))
            .await
            .unwrap();
        store
            .add(new_feature("far", "POINT(100 100)", "A"))
            .await
            .unwrap();

        let crossing = codec::parse("LINESTRING(5 0, 5 10)").unwrap();
        let hits = store.intersecting(&crossing).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, line.id);
    }

    #[tokio::test]
    async fn update_moves_index_entry() {
        let store = MemoryFeatureStore::new();
        let f = store
            .add(new_feature("wall", "LINESTRING(0 0, 10 10)", "B"))
            .await
            .unwrap();

        let candidate = codec::parse("LINESTRING(5 0, 5 10)").unwrap();
        assert!(store.blocks(&candidate, None).await.unwrap());

        let moved = Feature {
            geometry: codec::parse("LINESTRING(20 20, 30 30)").unwrap(),
            wkt_text: "LINESTRING(20 20, 30 30)".to_string(),
            ..f
        };
        store.update(moved).await.unwrap();
        assert!(!store.blocks(&candidate, None).await.unwrap());
    }

    #[tokio::test]
    async fn snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");

        let store = MemoryFeatureStore::new();
        store
            .add(new_feature("wall", "LINESTRING(0 0, 10 10)", "B"))
            .await
            .unwrap();
        let with_photos = store
            .add(new_feature("park", "POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))", "A"))
            .await
            .unwrap();
        store
            .append_photos(with_photos.id, vec!["/photos/a.jpg".to_string()])
            .await
            .unwrap();
        store.remove(with_photos.id).await.unwrap();
        store.snapshot_to(&path).await.unwrap();

        let restored = MemoryFeatureStore::load_from(&path).await.unwrap();
        let (rows, total) = restored.query(None, 1, 50).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].name, "wall");

        // Index rebuilt: the blocking rule still holds.
        let candidate = codec::parse("LINESTRING(5 0, 5 10)").unwrap();
        assert!(restored.blocks(&candidate, None).await.unwrap());

        // Id counter survives: no reuse of the deleted id.
        let next = restored
            .add(new_feature("new", "POINT(1 1)", "A"))
            .await
            .unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn corrupt_snapshot_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");
        tokio::fs::write(
            &path,
            r#"{"next_id":2,"rows":[{"id":1,"name":"x","wkt":"POINT(bad)","type":"A","photos":[]}]}"#,
        )
        .await
        .unwrap();

        let err = MemoryFeatureStore::load_from(&path).await.unwrap_err();
        assert!(matches!(err, ApiError::Snapshot(_)));
    }
}
