/// ID types for mixlink entities
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collaborative playlist identifier
///
/// Opaque and time-derived: generated ids are the creation instant in
/// milliseconds, which also makes them sortable by creation time. Callers
/// that need uniqueness within a collection must bump on collision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// Create a playlist ID from an existing string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new time-derived playlist ID
    pub fn generate() -> Self {
        Self(Utc::now().timestamp_millis().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlaylistId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
