//! The perform_action tool

use super::reply_output;
use crate::action::{ActionDispatcher, ActionState, ACTION_NAMES, EMOTE_TYPES};
use crate::error::ToolResult;
use crate::traits::{ParamKind, Tool, ToolInput, ToolMetadata, ToolOutput, ToolParam};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Perform an atomic NPC action (emote, follow, unfollow)
pub struct PerformActionTool {
    metadata: ToolMetadata,
    state: Arc<RwLock<ActionState>>,
}

impl PerformActionTool {
    /// Create the tool over a shared action state
    pub fn new(state: Arc<RwLock<ActionState>>) -> Self {
        let metadata = ToolMetadata::new(
            "perform_action",
            "Perform an NPC action in the game world",
        )
        .with_param(
            ToolParam::required("action", ParamKind::String, "The action to perform")
                .one_of(ACTION_NAMES),
        )
        .with_param(
            ToolParam::optional("type", ParamKind::String, "For emotes, the emote to play")
                .one_of(EMOTE_TYPES),
        )
        .with_param(ToolParam::optional(
            "target",
            ParamKind::String,
            "Optional target of the action (e.g. player name)",
        ));

        Self { metadata, state }
    }
}

#[async_trait]
impl Tool for PerformActionTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        let action = input.str_param("action").unwrap_or_default();
        let emote_type = input.str_param("type").unwrap_or_default();
        let target = input.str_param("target").unwrap_or_default();

        let mut state = self.state.write().await;
        let reply = ActionDispatcher::perform(&mut state, action, emote_type, target);
        reply_output(reply)
    }
}
