//! The feature entity and its classifier.

use crate::geometry::Geometry;

/// Store-assigned feature identifier. Never reused.
pub type FeatureId = u64;

/// Longest accepted feature name, in characters, after trimming.
pub const MAX_NAME_LEN: usize = 200;

/// Single-character feature classifier.
///
/// `Blocking` ("B") carries the intersection-blocking rule; `Standard`
/// ("A") is the default; any other single character is accepted and
/// semantically inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Blocking,
    Standard,
    Other(char),
}

impl FeatureType {
    /// The stored single-character code.
    pub fn as_char(&self) -> char {
        match self {
            FeatureType::Blocking => 'B',
            FeatureType::Standard => 'A',
            FeatureType::Other(c) => *c,
        }
    }

    /// Parse a type code. Blank input defaults to `Standard`; anything
    /// longer than one character after trimming is rejected.
    pub fn parse(code: &str) -> Option<Self> {
        let trimmed = code.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Some(FeatureType::Standard),
            (Some(c), None) => Some(match c {
                'B' => FeatureType::Blocking,
                'A' => FeatureType::Standard,
                other => FeatureType::Other(other),
            }),
            (Some(_), Some(_)) => None,
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, FeatureType::Blocking)
    }
}

impl Default for FeatureType {
    fn default() -> Self {
        FeatureType::Standard
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Validate and normalize a feature name.
///
/// Trims, then requires 1..=200 characters. Returns the trimmed name.
pub fn validate_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LEN {
        return None;
    }
    Some(trimmed.to_string())
}

/// A validated feature ready to be persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeature {
    pub name: String,
    pub geometry: Geometry,
    /// Last-accepted textual encoding; display mirror only.
    pub wkt_text: String,
    pub feature_type: FeatureType,
}

/// A stored feature row.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub name: String,
    pub geometry: Geometry,
    /// Last-accepted textual encoding; display mirror only, not the
    /// source of truth once `geometry` is parsed.
    pub wkt_text: String,
    pub feature_type: FeatureType,
    /// Opaque photo URLs, append-only.
    pub photos: Vec<String>,
}

impl Feature {
    /// Materialize a new row from validated input.
    pub fn from_new(id: FeatureId, new: NewFeature) -> Self {
        Self {
            id,
            name: new.name,
            geometry: new.geometry,
            wkt_text: new.wkt_text,
            feature_type: new.feature_type,
            photos: Vec::new(),
        }
    }
}
