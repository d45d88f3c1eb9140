//! Error taxonomy for store and service operations.

use atlas_db_core::FeatureId;
use std::collections::BTreeMap;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced to callers of the store and service.
///
/// Pagination parameters are never errors; out-of-range values are
/// clamped silently. Transient storage failures propagate as-is — the
/// core never retries.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input: bad WKT, empty/too-long name, bad type code.
    /// `fields` keys the messages by input field where one applies.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    /// Unknown feature id. Distinct from validation failures.
    #[error("feature not found: {0}")]
    NotFound(FeatureId),

    /// The blocking-geometry rule was violated.
    #[error("{0}")]
    Conflict(String),

    /// Photo storage capability failure.
    #[error("photo storage failed: {0}")]
    Photo(String),

    /// Corrupt or unreadable snapshot data.
    #[error("corrupt snapshot: {0}")]
    Snapshot(String),

    /// I/O failure from persistence.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON failure from snapshot serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Validation error with no field map.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Validation error keyed to a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.clone()]);
        ApiError::Validation { message, fields }
    }
}
