//! Error types for geometry parsing and validation.

use crate::geometry::GeometryKind;
use thiserror::Error;

/// Geometry parsing/validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The text does not match the WKT grammar for any supported kind.
    #[error("WKT syntax error: {0}")]
    InvalidSyntax(String),

    /// Syntactically valid WKT of a kind the store does not accept.
    #[error("unsupported geometry: {0}")]
    Unsupported(String),

    /// Fewer coordinate pairs than the kind requires.
    #[error("{kind} requires at least {min} coordinate pairs, got {got}")]
    TooFewCoordinates {
        kind: GeometryKind,
        min: usize,
        got: usize,
    },

    /// Polygon ring whose first and last coordinates differ.
    #[error("polygon ring is not closed")]
    OpenRing,
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
