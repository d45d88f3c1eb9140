//! Store contract and service orchestration for the Atlas feature
//! store.
//!
//! # Modules
//!
//! - [`store`]: the [`FeatureStore`] trait — the persistence and
//!   spatial-index contract, plus pagination clamping
//! - [`memory`]: the in-memory store with JSON snapshot persistence
//! - [`photos`]: the photo storage capability and its directory-backed
//!   implementation
//! - [`service`]: [`FeatureService`] — validation, conflict checking,
//!   persistence orchestration; the surface a transport layer calls
//! - [`types`]: service inputs, read projections, paged results
//! - [`error`]: the error taxonomy (validation / not-found / conflict)

pub mod error;
pub mod memory;
pub mod photos;
pub mod service;
pub mod store;
pub mod types;

pub use error::{ApiError, Result};
pub use memory::MemoryFeatureStore;
pub use photos::{DirPhotoStore, PhotoStore};
pub use service::FeatureService;
pub use store::{FeatureStore, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use types::{FeatureInput, FeatureRead, Paged, PhotoUpload};
