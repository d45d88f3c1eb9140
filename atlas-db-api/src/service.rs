//! Feature service: validation, conflict checking, persistence.
//!
//! This is the surface the transport layer calls. Every operation is a
//! stateless unit of work over the injected store and photo capability.
//!
//! The conflict check and the subsequent write are two separate store
//! calls: two concurrent creates that each pass the check before either
//! commits can both land even though the pair violates the blocking
//! rule. That window exists in the system this store reproduces and is
//! kept (see DESIGN.md).

use crate::error::{ApiError, Result};
use crate::photos::PhotoStore;
use crate::store::{clamp_page, clamp_page_size, FeatureStore};
use crate::types::{FeatureInput, FeatureRead, Paged, PhotoUpload};
use atlas_db_core::{codec, validate_name, Feature, FeatureId, FeatureType, NewFeature};
use std::collections::BTreeMap;
use tracing::warn;

/// Validate one input: name, WKT, type code. All failing fields are
/// reported together, keyed by field name.
fn validate_input(input: &FeatureInput) -> Result<NewFeature> {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let name = validate_name(&input.name);
    if name.is_none() {
        fields.entry("name".into()).or_default().push(format!(
            "name is required and must be at most {} characters",
            atlas_db_core::MAX_NAME_LEN
        ));
    }

    let geometry = match codec::parse(&input.wkt) {
        Ok(g) => Some(g),
        Err(e) => {
            fields.entry("wkt".into()).or_default().push(e.to_string());
            None
        }
    };

    let feature_type = FeatureType::parse(input.feature_type.as_deref().unwrap_or(""));
    if feature_type.is_none() {
        fields
            .entry("type".into())
            .or_default()
            .push("type must be a single character".into());
    }

    match (name, geometry, feature_type) {
        (Some(name), Some(geometry), Some(feature_type)) => Ok(NewFeature {
            name,
            geometry,
            wkt_text: input.wkt.trim().to_string(),
            feature_type,
        }),
        _ => Err(ApiError::Validation {
            message: "invalid feature input".into(),
            fields,
        }),
    }
}

/// Orchestrates the store, the conflict rule, and the photo capability.
pub struct FeatureService<S, P> {
    store: S,
    photos: P,
}

impl<S: FeatureStore, P: PhotoStore> FeatureService<S, P> {
    pub fn new(store: S, photos: P) -> Self {
        Self { store, photos }
    }

    /// The underlying store, for snapshotting and tests.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create one feature. Fails on invalid input or when the geometry
    /// intersects a blocking feature.
    pub async fn create(&self, input: FeatureInput) -> Result<FeatureRead> {
        let new = validate_input(&input)?;
        if self.store.blocks(&new.geometry, None).await? {
            return Err(ApiError::Conflict(
                "cannot be added: geometry intersects a blocking feature".into(),
            ));
        }
        let feature = self.store.add(new).await?;
        Ok(FeatureRead::from(&feature))
    }

    /// Create a batch. Every item is validated and parsed up front; any
    /// failure rejects the whole batch before a single row is written.
    ///
    /// The batch path does not run the blocking-conflict check that
    /// single create enforces. Bulk import commits as one atomic batch.
    pub async fn create_batch(&self, inputs: Vec<FeatureInput>) -> Result<Vec<FeatureRead>> {
        if inputs.is_empty() {
            return Err(ApiError::validation("list can't be empty"));
        }
        let batch = inputs
            .iter()
            .map(validate_input)
            .collect::<Result<Vec<NewFeature>>>()?;
        let features = self.store.add_batch(batch).await?;
        Ok(features.iter().map(FeatureRead::from).collect())
    }

    /// Fetch one feature by id.
    pub async fn get(&self, id: FeatureId) -> Result<FeatureRead> {
        let feature = self.store.get(id).await?;
        Ok(FeatureRead::from(&feature))
    }

    /// Replace a feature's name, geometry and type in full. The row
    /// being updated is excluded from the conflict check so it never
    /// blocks itself. Photos are carried over unchanged.
    pub async fn update(&self, id: FeatureId, input: FeatureInput) -> Result<FeatureRead> {
        let existing = self.store.get(id).await?;
        let new = validate_input(&input)?;
        if self.store.blocks(&new.geometry, Some(id)).await? {
            return Err(ApiError::Conflict(
                "cannot be updated: geometry intersects a blocking feature".into(),
            ));
        }
        let feature = Feature {
            id,
            name: new.name,
            geometry: new.geometry,
            wkt_text: new.wkt_text,
            feature_type: new.feature_type,
            photos: existing.photos,
        };
        let updated = self.store.update(feature).await?;
        Ok(FeatureRead::from(&updated))
    }

    /// Delete by id. Deleting an unknown id is `NotFound`; photo blobs
    /// referenced by the row are orphaned, not reclaimed.
    pub async fn delete(&self, id: FeatureId) -> Result<()> {
        self.store.remove(id).await
    }

    /// Paged read with optional case-insensitive name filter. Page
    /// parameters are clamped, and the clamped values are echoed back.
    pub async fn list(
        &self,
        page: i64,
        page_size: i64,
        name_filter: Option<&str>,
    ) -> Result<Paged<FeatureRead>> {
        let (items, total) = self.store.query(name_filter, page, page_size).await?;
        Ok(Paged {
            total,
            page: clamp_page(page),
            page_size: clamp_page_size(page_size),
            items: items.iter().map(FeatureRead::from).collect(),
        })
    }

    /// Attach photos to a feature. Each file is stored and its URL
    /// appended independently; a later file's failure leaves earlier
    /// appends in place (best-effort, non-atomic by design). Empty
    /// payloads are skipped.
    pub async fn attach_photos(
        &self,
        id: FeatureId,
        files: Vec<PhotoUpload>,
    ) -> Result<FeatureRead> {
        self.store.get(id).await?;
        if files.is_empty() {
            return Err(ApiError::validation("no files uploaded"));
        }

        for file in files {
            if file.bytes.is_empty() {
                continue;
            }
            let url = match self.photos.store(&file.bytes, &file.extension).await {
                Ok(url) => url,
                Err(e) => {
                    warn!(id, error = %e, "photo storage failed mid-batch");
                    return Err(e);
                }
            };
            self.store.append_photos(id, vec![url]).await?;
        }

        let feature = self.store.get(id).await?;
        Ok(FeatureRead::from(&feature))
    }
}
