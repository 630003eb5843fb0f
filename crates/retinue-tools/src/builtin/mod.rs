//! Built-in NPC tools
//!
//! The tool surface the agent runtime dispatches into: actions,
//! navigation, examination, and the group-memory operations. Action and
//! navigation tools share one `ActionState`; each group-memory tool runs
//! one read-modify-write cycle against the registry block.

mod examine;
mod group_memory;
mod navigate;
mod perform;

pub use examine::ExamineObjectTool;
pub use group_memory::{GroupMemberUpsertTool, GroupMemoryAppendTool, GroupMemoryReplaceTool};
pub use navigate::{NavigateTool, NavigateToCoordinatesTool};
pub use perform::PerformActionTool;

use crate::action::{ActionReply, ActionState};
use crate::error::ToolResult;
use crate::registry::ToolRegistry;
use crate::traits::ToolOutput;
use retinue_storage::GroupBlockGateway;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Convert a dispatcher reply into a tool output
///
/// Accepted requests carry the full `{status, message}` reply as the
/// result; rejected ones surface the message as a failure.
pub(crate) fn reply_output(reply: ActionReply) -> ToolResult<ToolOutput> {
    if reply.is_success() {
        Ok(ToolOutput::success(serde_json::to_value(&reply)?))
    } else {
        Ok(ToolOutput::failure(reply.message))
    }
}

/// Check whether a registry error is a domain failure to report in-band
pub(crate) fn is_domain_failure(err: &retinue_core::Error) -> bool {
    matches!(
        err,
        retinue_core::Error::MemberNotFound { .. }
            | retinue_core::Error::NoteMatchNotFound { .. }
            | retinue_core::Error::InvalidEntityId { .. }
            | retinue_core::Error::EntityIdTooLong { .. }
    )
}

/// Register the full NPC tool set on a registry
pub async fn register_npc_tools(
    registry: &ToolRegistry,
    state: Arc<RwLock<ActionState>>,
    gateway: Arc<GroupBlockGateway>,
) -> ToolResult<()> {
    registry
        .register(PerformActionTool::new(Arc::clone(&state)))
        .await?;
    registry.register(NavigateTool::new(Arc::clone(&state))).await?;
    registry
        .register(NavigateToCoordinatesTool::new(Arc::clone(&state)))
        .await?;
    registry.register(ExamineObjectTool::new(state)).await?;
    registry
        .register(GroupMemoryAppendTool::new(Arc::clone(&gateway)))
        .await?;
    registry
        .register(GroupMemoryReplaceTool::new(Arc::clone(&gateway)))
        .await?;
    registry.register(GroupMemberUpsertTool::new(gateway)).await?;
    Ok(())
}
