//! The persistence and spatial-index contract.
//!
//! The service is written against this trait; the transport layer never
//! sees it. Implementations must keep the spatial index in step with
//! the rows: a mutation is observable either fully applied (row and
//! index both updated) or not at all.

use crate::error::Result;
use atlas_db_core::{Feature, FeatureId, Geometry, NewFeature};
use async_trait::async_trait;

/// Page size applied when the caller's value is out of range.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 500;

/// Clamp a page number: anything below 1 becomes 1.
pub fn clamp_page(page: i64) -> i64 {
    if page <= 0 {
        1
    } else {
        page
    }
}

/// Clamp a page size: out of 1..=500 falls back to the default of 50.
pub fn clamp_page_size(page_size: i64) -> i64 {
    if page_size <= 0 || page_size > MAX_PAGE_SIZE {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    }
}

/// Keyed feature storage with a spatial index.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Fetch one row by id.
    async fn get(&self, id: FeatureId) -> Result<Feature>;

    /// Persist a new row, assigning its id and indexing its geometry.
    async fn add(&self, new: NewFeature) -> Result<Feature>;

    /// Persist a batch all-or-nothing: either every member commits or
    /// none is written.
    async fn add_batch(&self, batch: Vec<NewFeature>) -> Result<Vec<Feature>>;

    /// Replace a row in full; the index is updated with it.
    async fn update(&self, feature: Feature) -> Result<Feature>;

    /// Delete a row by id; the index entry goes with it.
    async fn remove(&self, id: FeatureId) -> Result<()>;

    /// Paged read. `name_contains` filters case-insensitively as a
    /// substring over names; `page`/`page_size` are clamped, never
    /// rejected. Returns the page of rows and the filter-wide total.
    /// Item order is unspecified (this store returns insertion order);
    /// callers needing an order must sort.
    async fn query(
        &self,
        name_contains: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<Feature>, u64)>;

    /// Every row whose geometry intersects `geometry`.
    async fn intersecting(&self, geometry: &Geometry) -> Result<Vec<Feature>>;

    /// The conflict checker: true iff a blocking row other than
    /// `exclude` intersects `geometry`. Pure read.
    async fn blocks(&self, geometry: &Geometry, exclude: Option<FeatureId>) -> Result<bool>;

    /// Append photo URLs to a row. Photos are append-only.
    async fn append_photos(&self, id: FeatureId, urls: Vec<String>) -> Result<Feature>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamping() {
        assert_eq!(clamp_page(-3), 1);
        assert_eq!(clamp_page(0), 1);
        assert_eq!(clamp_page(1), 1);
        assert_eq!(clamp_page(7), 7);
    }

    #[test]
    fn page_size_clamping() {
        assert_eq!(clamp_page_size(0), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(-1), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(501), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(500), 500);
        assert_eq!(clamp_page_size(1), 1);
    }
}
