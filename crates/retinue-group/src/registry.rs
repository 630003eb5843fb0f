//! Group registry: the shared nearby-entities block
//!
//! TigerStyle: Fixed byte budget with explicit eviction.
//!
//! The registry is the single shared mutable resource between the agent's
//! tool calls and the game backend's presence pushes. Every mutation
//! recomputes the derived summary, appends to the bounded update log,
//! stamps `last_updated`, and re-checks the serialized byte budget before
//! the caller is allowed to write the block back.

use crate::member::{MemberPatch, MemberRecord, PresenceChange};
use crate::types::{now, EntityId, Timestamp};
use retinue_core::{
    Error, Result, GROUP_BLOCK_SIZE_BYTES_MAX_DEFAULT, GROUP_BLOCK_SIZE_BYTES_MIN,
    GROUP_UPDATES_COUNT_MAX,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Configuration for the group registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRegistryConfig {
    /// Serialized size budget in bytes
    pub max_bytes: usize,
    /// Update log length cap
    pub updates_max: usize,
}

impl GroupRegistryConfig {
    /// Create with default settings
    pub fn new() -> Self {
        Self {
            max_bytes: GROUP_BLOCK_SIZE_BYTES_MAX_DEFAULT,
            updates_max: GROUP_UPDATES_COUNT_MAX,
        }
    }

    /// Create with a custom byte budget
    pub fn with_max_bytes(max_bytes: usize) -> Self {
        assert!(
            max_bytes >= GROUP_BLOCK_SIZE_BYTES_MIN,
            "group block budget must be at least {} bytes",
            GROUP_BLOCK_SIZE_BYTES_MIN
        );
        Self {
            max_bytes,
            updates_max: GROUP_UPDATES_COUNT_MAX,
        }
    }
}

impl Default for GroupRegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a successful upsert
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    /// The key the record now lives under
    pub entity_id: EntityId,
    /// Fields the patch touched
    pub updated_fields: Vec<&'static str>,
    /// Total tracked members after the upsert
    pub group_size: usize,
    /// Members currently present after the upsert
    pub present_count: usize,
    /// Member removed by the post-mutation budget check, if any
    pub evicted: Option<EntityId>,
}

/// The bounded registry of entities nearby the agent
///
/// Wire shape (persisted through the block gateway):
/// `{ "members": {...}, "summary": str, "updates": [str], "last_updated": str }`.
/// The configuration and the insertion-order index are process-local and
/// never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRegistry {
    members: BTreeMap<EntityId, MemberRecord>,
    summary: String,
    updates: Vec<String>,
    last_updated: Timestamp,
    #[serde(skip)]
    config: GroupRegistryConfig,
    #[serde(skip)]
    member_order: Vec<EntityId>,
}

impl GroupRegistry {
    /// Create a new empty registry
    pub fn new(config: GroupRegistryConfig) -> Self {
        let mut registry = Self {
            members: BTreeMap::new(),
            summary: String::new(),
            updates: Vec::new(),
            last_updated: now(),
            config,
            member_order: Vec::new(),
        };
        registry.recompute_summary();
        registry
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(GroupRegistryConfig::default())
    }

    /// Create or merge-update a member record
    ///
    /// Unknown IDs create a record with empty defaults; known IDs merge the
    /// patch field-by-field (last writer per field wins). Presence flips
    /// synthesize an arrival/departure line in the update log.
    pub fn upsert(&mut self, entity_id: &EntityId, patch: MemberPatch) -> Result<UpsertOutcome> {
        if !self.members.contains_key(entity_id) {
            self.members
                .insert(entity_id.clone(), MemberRecord::default());
            self.member_order.push(entity_id.clone());
        }

        let record = self
            .members
            .get_mut(entity_id)
            .ok_or_else(|| Error::internal("member vanished during upsert"))?;
        let effect = record.apply(&patch);

        let display = if record.name.is_empty() {
            entity_id.as_str().to_string()
        } else {
            record.name.clone()
        };
        let location = record.location_or_unknown().to_string();

        match effect.presence {
            Some(PresenceChange::Arrived) => {
                self.push_update(format!("{} arrived at {}", display, location));
            }
            Some(PresenceChange::Departed) => {
                self.push_update(format!("{} left {}", display, location));
            }
            None if !effect.changed.is_empty() => {
                self.push_update(format!("Updated {} ({})", display, effect.changed.join(", ")));
            }
            None => {}
        }

        self.recompute_summary();
        self.touch();
        let evicted = self.evict_if_over_budget()?;

        Ok(UpsertOutcome {
            entity_id: entity_id.clone(),
            updated_fields: effect.changed,
            group_size: self.members.len(),
            present_count: self.present_count(),
            evicted,
        })
    }

    /// Append an observation to a member's notes
    ///
    /// The target must already be tracked; notes are newline-joined so
    /// earlier observations survive.
    pub fn append_note(&mut self, target: &str, note: &str) -> Result<()> {
        let entity_id = self
            .resolve_target(target)
            .ok_or_else(|| Error::member_not_found(target))?;

        let record = self
            .members
            .get_mut(&entity_id)
            .ok_or_else(|| Error::member_not_found(target))?;

        if record.notes.is_empty() {
            record.notes = note.to_string();
        } else {
            record.notes.push('\n');
            record.notes.push_str(note);
        }

        self.recompute_summary();
        self.touch();
        self.evict_if_over_budget()?;
        Ok(())
    }

    /// Replace note text for a member
    ///
    /// `old` must match the current notes byte-for-byte as a substring
    /// (case and whitespace sensitive); a mismatch fails without mutating
    /// state, so a caller acting on a stale snapshot cannot silently
    /// overwrite newer observations. Every occurrence of `old` is replaced.
    pub fn replace_note(&mut self, target: &str, old: &str, new: &str) -> Result<()> {
        let entity_id = self
            .resolve_target(target)
            .ok_or_else(|| Error::member_not_found(target))?;

        let record = self
            .members
            .get_mut(&entity_id)
            .ok_or_else(|| Error::member_not_found(target))?;

        if !record.notes.contains(old) {
            return Err(Error::note_match_not_found(target, old));
        }

        record.notes = record.notes.replace(old, new);

        self.recompute_summary();
        self.touch();
        self.evict_if_over_budget()?;
        Ok(())
    }

    /// Move a record to a new key, merging into any existing record there
    ///
    /// Notes are concatenated and empty fields on the destination fill
    /// from the source, so observations accumulated under a provisional
    /// identity survive the migration.
    pub fn migrate_member(&mut self, from: &EntityId, to: &EntityId) -> Result<()> {
        let source = self
            .members
            .remove(from)
            .ok_or_else(|| Error::member_not_found(from.as_str()))?;

        let display = if source.name.is_empty() {
            from.as_str().to_string()
        } else {
            source.name.clone()
        };

        match self.members.get_mut(to) {
            Some(existing) => {
                if !source.notes.is_empty() {
                    if existing.notes.is_empty() {
                        existing.notes = source.notes;
                    } else {
                        existing.notes.push('\n');
                        existing.notes.push_str(&source.notes);
                    }
                }
                if existing.name.is_empty() {
                    existing.name = source.name;
                }
                if existing.appearance.is_empty() {
                    existing.appearance = source.appearance;
                }
                if existing.health_status.is_none() {
                    existing.health_status = source.health_status;
                }
                if existing.last_location.is_none() {
                    existing.last_location = source.last_location;
                }
                self.member_order.retain(|id| id != from);
            }
            None => {
                self.members.insert(to.clone(), source);
                // The migrated record keeps the provisional record's slot
                for id in self.member_order.iter_mut() {
                    if id == from {
                        *id = to.clone();
                    }
                }
            }
        }

        debug!(from = %from, to = %to, "migrated member record");
        self.push_update(format!("{} recognized as {}", display, to));
        self.recompute_summary();
        self.touch();
        self.evict_if_over_budget()?;
        Ok(())
    }

    /// Remove the stalest absent member if the block is over budget
    ///
    /// At most one record is removed per mutation. Victim selection:
    /// absent members only, oldest `last_seen` first, insertion order
    /// breaking ties. Over budget with every member present removes
    /// nothing (present entities are actionable; dropping one would lose
    /// live state).
    pub fn evict_if_over_budget(&mut self) -> Result<Option<EntityId>> {
        let size = self.serialized_size_bytes()?;
        if size <= self.config.max_bytes {
            return Ok(None);
        }

        let victim = self
            .member_order
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                self.members
                    .get(id)
                    .filter(|record| !record.is_present)
                    .map(|record| (record.last_seen, position, id.clone()))
            })
            .min_by_key(|(last_seen, position, _)| (*last_seen, *position))
            .map(|(_, _, id)| id);

        match victim {
            Some(id) => {
                self.members.remove(&id);
                self.member_order.retain(|other| other != &id);
                self.recompute_summary();
                debug!(entity_id = %id, size_bytes = size, max_bytes = self.config.max_bytes,
                    "evicted stalest absent member");
                Ok(Some(id))
            }
            None => {
                warn!(size_bytes = size, max_bytes = self.config.max_bytes,
                    "group block over budget with no absent members; nothing evicted");
                Ok(None)
            }
        }
    }

    /// Look up a member by entity ID, then by exact display name
    pub fn resolve_target(&self, target: &str) -> Option<EntityId> {
        if self.members.contains_key(target) {
            return self.member_order.iter().find(|id| id.as_str() == target).cloned();
        }
        self.member_order
            .iter()
            .find(|id| {
                self.members
                    .get(id.as_str())
                    .map(|record| record.name == target)
                    .unwrap_or(false)
            })
            .cloned()
    }

    /// Get a member record
    pub fn get(&self, entity_id: &EntityId) -> Option<&MemberRecord> {
        self.members.get(entity_id)
    }

    /// Get a member record by raw ID string
    pub fn get_by_str(&self, entity_id: &str) -> Option<&MemberRecord> {
        self.members.get(entity_id)
    }

    /// Iterate members in insertion order
    pub fn members(&self) -> impl Iterator<Item = (&EntityId, &MemberRecord)> {
        self.member_order
            .iter()
            .filter_map(move |id| self.members.get(id.as_str()).map(|record| (id, record)))
    }

    /// Entity IDs in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.member_order.iter()
    }

    /// Number of tracked members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Number of members currently present
    pub fn present_count(&self) -> usize {
        self.members.values().filter(|m| m.is_present).count()
    }

    /// Check if no members are tracked
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The derived membership summary
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// The bounded update log, newest first
    pub fn updates(&self) -> &[String] {
        &self.updates
    }

    /// Timestamp of the most recent mutation
    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    /// The configured byte budget
    pub fn max_bytes(&self) -> usize {
        self.config.max_bytes
    }

    /// Current serialized size in bytes
    pub fn serialized_size_bytes(&self) -> Result<usize> {
        Ok(serde_json::to_vec(self)?.len())
    }

    /// Serialize to the wire format
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from the wire format, validating and repairing shape
    pub fn from_json(json: &str, config: GroupRegistryConfig) -> Result<Self> {
        let mut registry: GroupRegistry =
            serde_json::from_str(json).map_err(|e| Error::DeserializationFailed {
                reason: e.to_string(),
            })?;
        registry.rehydrate(config);
        Ok(registry)
    }

    /// Restore process-local state after deserialization
    ///
    /// The wire format does not persist insertion order, so the order
    /// index is rebuilt from key order. Presence invariants violated by a
    /// foreign writer are repaired rather than trusted.
    pub fn rehydrate(&mut self, config: GroupRegistryConfig) {
        self.config = config;
        self.member_order = self.members.keys().cloned().collect();
        self.updates.truncate(self.config.updates_max);

        let last_updated = self.last_updated;
        for (id, record) in self.members.iter_mut() {
            if record.is_present && record.last_seen.is_some() {
                warn!(entity_id = %id, "present member carried last_seen; clearing");
                record.last_seen = None;
            } else if !record.is_present && record.last_seen.is_none() {
                warn!(entity_id = %id, "absent member missing last_seen; stamping");
                record.last_seen = Some(last_updated);
            }
        }
    }

    fn push_update(&mut self, line: String) {
        self.updates.insert(0, line);
        self.updates.truncate(self.config.updates_max);
    }

    fn touch(&mut self) {
        self.last_updated = now();
    }

    fn recompute_summary(&mut self) {
        let present: Vec<&str> = self
            .member_order
            .iter()
            .filter_map(|id| self.members.get(id.as_str()).map(|record| (id, record)))
            .filter(|(_, record)| record.is_present)
            .map(|(id, record)| {
                if record.name.is_empty() {
                    id.as_str()
                } else {
                    record.name.as_str()
                }
            })
            .collect();
        let absent_count = self.members.len() - present.len();

        let mut summary = if present.is_empty() {
            "No players currently in range".to_string()
        } else {
            format!("Players in range: {}", present.join(", "))
        };
        if absent_count > 0 {
            summary.push_str(&format!(" ({} seen earlier)", absent_count));
        }
        self.summary = summary;
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
