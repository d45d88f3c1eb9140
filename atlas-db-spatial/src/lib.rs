//! Spatial indexing for the Atlas feature store.
//!
//! Queries follow a prefilter-then-refine pipeline: candidates are
//! pruned by axis-aligned bounding box, then checked with an exact
//! `Intersects` predicate from the `geo` crate.
//!
//! # Modules
//!
//! - [`bbox`]: axis-aligned bounding boxes
//! - [`index`]: the id-keyed in-memory index
//! - [`conflict`]: the blocking-conflict rule evaluated over the index

pub mod bbox;
pub mod conflict;
pub mod index;

pub use bbox::BBox;
pub use conflict::blocks;
pub use index::{IndexEntry, SpatialIndex};
