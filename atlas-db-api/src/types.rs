//! Service input and read-projection types.

use atlas_db_core::{codec, Feature, FeatureId, Geometry};
use serde::{Deserialize, Serialize};

/// Caller input for create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureInput {
    pub name: String,
    pub wkt: String,
    /// Single-character type code; blank or absent defaults to "A".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
}

/// Read projection of a stored feature.
///
/// `wkt` is recomputed from the stored geometry through the serializer,
/// not echoed from the caller's original text.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRead {
    pub id: FeatureId,
    pub name: String,
    pub wkt: String,
    pub geometry: Geometry,
    pub photos: Vec<String>,
    #[serde(rename = "type")]
    pub feature_type: String,
}

impl From<&Feature> for FeatureRead {
    fn from(f: &Feature) -> Self {
        Self {
            id: f.id,
            name: f.name.clone(),
            wkt: codec::serialize(&f.geometry),
            geometry: f.geometry.clone(),
            photos: f.photos.clone(),
            feature_type: f.feature_type.to_string(),
        }
    }
}

/// One page of results plus the filter-wide total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub total: u64,
    pub page: i64,
    pub page_size: i64,
    pub items: Vec<T>,
}

/// One photo payload for attachment.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    /// File extension including or excluding the leading dot.
    pub extension: String,
}
