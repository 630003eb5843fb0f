//! Common types for the group registry
//!
//! TigerStyle: Explicit types with clear semantics.

use retinue_core::{Error, Result, ENTITY_ID_LENGTH_BYTES_MAX, ENTITY_ID_TEMP_PREFIX};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Timestamp type for registry operations
///
/// Uses UTC to avoid timezone ambiguity; serializes as ISO-8601.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Returns the current timestamp
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Unique identifier for a tracked entity (player or NPC)
///
/// Entity IDs are minted by the game backend, never locally. IDs under
/// the reserved `unnamed_` prefix are provisional and eligible for
/// migration once the permanent identity is learned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Create a validated entity ID
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(Error::InvalidEntityId {
                id,
                reason: "entity ID cannot be empty".to_string(),
            });
        }

        if id.len() > ENTITY_ID_LENGTH_BYTES_MAX {
            return Err(Error::EntityIdTooLong {
                length: id.len(),
                limit: ENTITY_ID_LENGTH_BYTES_MAX,
            });
        }

        Ok(Self(id))
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this ID is under the provisional identity scheme
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(ENTITY_ID_TEMP_PREFIX)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Allows map lookups by &str without cloning
impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Health tag reported by the game backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Injured,
    Critical,
    Dead,
}

impl HealthStatus {
    /// Get the wire tag for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Injured => "injured",
            Self::Critical => "critical",
            Self::Dead => "dead",
        }
    }

    /// Parse a wire tag
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "healthy" => Some(Self::Healthy),
            "injured" => Some(Self::Injured),
            "critical" => Some(Self::Critical),
            "dead" => Some(Self::Dead),
            _ => None,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
