//! Member records and partial updates
//!
//! TigerStyle: Explicit patch type instead of untyped dictionaries.

use crate::types::{now, HealthStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// A tracked entity nearby the agent
///
/// `appearance` is authoritative only while the entity is present;
/// `last_seen` is maintained automatically from presence transitions and
/// is absent for present entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Display name, not unique
    #[serde(default)]
    pub name: String,
    /// True while the entity is currently nearby
    #[serde(default)]
    pub is_present: bool,
    /// Free-text description
    #[serde(default)]
    pub appearance: String,
    /// Health tag, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<HealthStatus>,
    /// Last known location name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_location: Option<String>,
    /// When the entity was last nearby; absent while present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<Timestamp>,
    /// Agent-contributed observations
    #[serde(default)]
    pub notes: String,
}

impl Default for MemberRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            is_present: false,
            appearance: String::new(),
            health_status: None,
            last_location: None,
            last_seen: None,
            notes: String::new(),
        }
    }
}

impl MemberRecord {
    /// Location name for update-log lines
    pub fn location_or_unknown(&self) -> &str {
        self.last_location.as_deref().unwrap_or("unknown location")
    }

    /// Apply a partial update, field-level last-writer-wins
    ///
    /// After the merge the presence invariant is re-established: present
    /// records carry no `last_seen`, absent records always carry one (the
    /// current time unless the patch supplied an explicit value).
    pub fn apply(&mut self, patch: &MemberPatch) -> PatchEffect {
        let was_present = self.is_present;
        let mut changed: Vec<&'static str> = Vec::new();

        if let Some(name) = &patch.name {
            self.name = name.clone();
            changed.push("name");
        }
        if let Some(is_present) = patch.is_present {
            self.is_present = is_present;
            changed.push("is_present");
        }
        if let Some(appearance) = &patch.appearance {
            self.appearance = appearance.clone();
            changed.push("appearance");
        }
        if let Some(health_status) = patch.health_status {
            self.health_status = Some(health_status);
            changed.push("health_status");
        }
        if let Some(last_location) = &patch.last_location {
            self.last_location = Some(last_location.clone());
            changed.push("last_location");
        }
        if let Some(last_seen) = patch.last_seen {
            self.last_seen = Some(last_seen);
            changed.push("last_seen");
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
            changed.push("notes");
        }

        if self.is_present {
            self.last_seen = None;
        } else if self.last_seen.is_none() {
            self.last_seen = Some(now());
        }

        let presence = match (was_present, self.is_present, patch.is_present) {
            (false, true, Some(_)) => Some(PresenceChange::Arrived),
            (true, false, Some(_)) => Some(PresenceChange::Departed),
            _ => None,
        };

        PatchEffect { changed, presence }
    }
}

/// Presence transition observed while applying a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceChange {
    Arrived,
    Departed,
}

/// Result of applying a patch to a record
#[derive(Debug, Clone)]
pub struct PatchEffect {
    /// Names of the fields the patch touched
    pub changed: Vec<&'static str>,
    /// Presence transition, if the patch flipped `is_present`
    pub presence: Option<PresenceChange>,
}

/// Partial update for a member record
///
/// Any subset of fields; unset fields are left untouched by `apply`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub is_present: Option<bool>,
    pub appearance: Option<String>,
    pub health_status: Option<HealthStatus>,
    pub last_location: Option<String>,
    pub last_seen: Option<Timestamp>,
    pub notes: Option<String>,
}

impl MemberPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set presence
    pub fn with_presence(mut self, is_present: bool) -> Self {
        self.is_present = Some(is_present);
        self
    }

    /// Set the appearance description
    pub fn with_appearance(mut self, appearance: impl Into<String>) -> Self {
        self.appearance = Some(appearance.into());
        self
    }

    /// Set the health tag
    pub fn with_health(mut self, health_status: HealthStatus) -> Self {
        self.health_status = Some(health_status);
        self
    }

    /// Set the last known location
    pub fn with_location(mut self, last_location: impl Into<String>) -> Self {
        self.last_location = Some(last_location.into());
        self
    }

    /// Set an explicit last-seen timestamp
    pub fn with_last_seen(mut self, last_seen: Timestamp) -> Self {
        self.last_seen = Some(last_seen);
        self
    }

    /// Set the notes text wholesale
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check if the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
