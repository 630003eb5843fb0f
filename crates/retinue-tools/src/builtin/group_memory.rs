//! Group-memory tools
//!
//! Three writers into the shared registry block: the agent's note
//! append/replace tools and the game backend's presence upsert. Each call
//! is one read-modify-write cycle through the gateway; a failed mutation
//! writes nothing back.

use super::is_domain_failure;
use crate::error::ToolResult;
use crate::traits::{ParamKind, Tool, ToolInput, ToolMetadata, ToolOutput, ToolParam};
use async_trait::async_trait;
use retinue_group::{EntityId, HealthStatus, IdentityReconciler, MemberPatch};
use retinue_storage::GroupBlockGateway;
use std::sync::Arc;

/// Append an observation to a tracked member's notes
pub struct GroupMemoryAppendTool {
    metadata: ToolMetadata,
    gateway: Arc<GroupBlockGateway>,
}

impl GroupMemoryAppendTool {
    /// Create the tool over a registry gateway
    pub fn new(gateway: Arc<GroupBlockGateway>) -> Self {
        let metadata = ToolMetadata::new(
            "group_memory_append",
            "Append a note about a nearby entity to group memory",
        )
        .with_param(ToolParam::required(
            "target",
            ParamKind::String,
            "Entity ID or exact display name of the member",
        ))
        .with_param(ToolParam::required(
            "note",
            ParamKind::String,
            "Note to append to the member's notes",
        ));

        Self { metadata, gateway }
    }
}

#[async_trait]
impl Tool for GroupMemoryAppendTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        let target = input.require_str("group_memory_append", "target")?;
        let note = input.require_str("group_memory_append", "note")?;

        let mut snapshot = self.gateway.load().await?;
        match snapshot.value.append_note(target, note) {
            Ok(()) => {
                self.gateway.store(&snapshot.value).await?;
                Ok(ToolOutput::null())
            }
            Err(err) if is_domain_failure(&err) => Ok(ToolOutput::failure(err.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}

/// Replace note text for a tracked member, exact match required
pub struct GroupMemoryReplaceTool {
    metadata: ToolMetadata,
    gateway: Arc<GroupBlockGateway>,
}

impl GroupMemoryReplaceTool {
    /// Create the tool over a registry gateway
    pub fn new(gateway: Arc<GroupBlockGateway>) -> Self {
        let metadata = ToolMetadata::new(
            "group_memory_replace",
            "Replace a note about a nearby entity in group memory",
        )
        .with_param(ToolParam::required(
            "target",
            ParamKind::String,
            "Entity ID or exact display name of the member",
        ))
        .with_param(ToolParam::required(
            "old_note",
            ParamKind::String,
            "Existing note text, byte-for-byte as currently stored",
        ))
        .with_param(ToolParam::required(
            "new_note",
            ParamKind::String,
            "Replacement text",
        ));

        Self { metadata, gateway }
    }
}

#[async_trait]
impl Tool for GroupMemoryReplaceTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        let target = input.require_str("group_memory_replace", "target")?;
        let old_note = input.require_str("group_memory_replace", "old_note")?;
        let new_note = input.require_str("group_memory_replace", "new_note")?;

        let mut snapshot = self.gateway.load().await?;
        match snapshot.value.replace_note(target, old_note, new_note) {
            Ok(()) => {
                self.gateway.store(&snapshot.value).await?;
                Ok(ToolOutput::null())
            }
            Err(err) if is_domain_failure(&err) => Ok(ToolOutput::failure(err.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}

/// Create or update a tracked member from a backend presence push
///
/// When a display name is supplied, a provisional record with that name
/// is migrated onto the given entity ID first, in the same
/// mutation-then-write cycle as the upsert itself.
pub struct GroupMemberUpsertTool {
    metadata: ToolMetadata,
    gateway: Arc<GroupBlockGateway>,
    reconciler: IdentityReconciler,
}

impl GroupMemberUpsertTool {
    /// Create the tool over a registry gateway
    pub fn new(gateway: Arc<GroupBlockGateway>) -> Self {
        let metadata = ToolMetadata::new(
            "group_member_upsert",
            "Create or update a nearby entity in group memory",
        )
        .with_param(ToolParam::required(
            "entity_id",
            ParamKind::String,
            "Backend-assigned entity ID",
        ))
        .with_param(ToolParam::optional("name", ParamKind::String, "Display name"))
        .with_param(ToolParam::optional(
            "is_present",
            ParamKind::Boolean,
            "Whether the entity is nearby",
        ))
        .with_param(ToolParam::optional(
            "appearance",
            ParamKind::String,
            "Appearance description",
        ))
        .with_param(
            ToolParam::optional("health_status", ParamKind::String, "Health tag")
                .one_of(&["healthy", "injured", "critical", "dead"]),
        )
        .with_param(ToolParam::optional(
            "last_location",
            ParamKind::String,
            "Last known location name",
        ))
        .with_param(ToolParam::optional(
            "notes",
            ParamKind::String,
            "Replacement notes text",
        ));

        Self {
            metadata,
            gateway,
            reconciler: IdentityReconciler::new(),
        }
    }

    fn build_patch(input: &ToolInput) -> Result<MemberPatch, String> {
        let mut patch = MemberPatch::new();

        if let Some(name) = input.str_param("name") {
            patch = patch.with_name(name);
        }
        if let Some(is_present) = input.bool_param("is_present") {
            patch = patch.with_presence(is_present);
        }
        if let Some(appearance) = input.str_param("appearance") {
            patch = patch.with_appearance(appearance);
        }
        if let Some(tag) = input.str_param("health_status") {
            match HealthStatus::parse(tag) {
                Some(status) => patch = patch.with_health(status),
                None => {
                    return Err(format!(
                        "Unknown health status: {}. Valid values are: healthy, injured, \
                         critical, dead",
                        tag
                    ))
                }
            }
        }
        if let Some(location) = input.str_param("last_location") {
            patch = patch.with_location(location);
        }
        if let Some(notes) = input.str_param("notes") {
            patch = patch.with_notes(notes);
        }

        Ok(patch)
    }
}

#[async_trait]
impl Tool for GroupMemberUpsertTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        let raw_id = input.require_str("group_member_upsert", "entity_id")?;
        let entity_id = match EntityId::new(raw_id) {
            Ok(id) => id,
            Err(err) => return Ok(ToolOutput::failure(err.to_string())),
        };
        let patch = match Self::build_patch(&input) {
            Ok(patch) => patch,
            Err(message) => return Ok(ToolOutput::failure(message)),
        };
        let observed_name = input.str_param("name").map(str::to_string);

        let outcome = self
            .gateway
            .update(|registry| {
                let resolved = match &observed_name {
                    Some(name) => self.reconciler.resolve(registry, name, &entity_id)?,
                    None => entity_id.clone(),
                };
                registry.upsert(&resolved, patch)
            })
            .await?;

        let display = observed_name.unwrap_or_else(|| outcome.entity_id.to_string());
        Ok(ToolOutput::success(serde_json::json!({
            "message": format!("Updated {} in group memory", display),
            "updated_id": outcome.entity_id.as_str(),
            "updated_fields": outcome.updated_fields,
            "group_size": outcome.group_size,
            "present_count": outcome.present_count,
            "evicted": outcome.evicted.as_ref().map(|id| id.as_str()),
        })))
    }
}
