//! Domain types and WKT codec for the Atlas feature store.
//!
//! This crate holds everything the store and service layers agree on:
//!
//! - [`geometry`]: the closed geometry union (point / linestring /
//!   polygon) with arity and ring-closure invariants checked at
//!   construction, fixed to the WGS84 frame
//! - [`codec`]: two-stage WKT parsing (structural pre-check, then
//!   authoritative parse) and deterministic serialization
//! - [`feature`]: the feature entity, its single-character classifier,
//!   and name validation
//! - [`error`]: geometry error types

pub mod codec;
pub mod error;
pub mod feature;
pub mod geometry;

pub use error::{GeometryError, Result};
pub use feature::{validate_name, Feature, FeatureId, FeatureType, NewFeature, MAX_NAME_LEN};
pub use geometry::{Geometry, GeometryKind, LineString, Point, Polygon, SRID_WGS84};
