//! The examine_object tool

use crate::action::ActionState;
use crate::error::ToolResult;
use crate::traits::{ParamKind, Tool, ToolInput, ToolMetadata, ToolOutput, ToolParam};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Begin examining an object in the game world
///
/// Like navigation, this only starts the examination; the detailed
/// observations arrive later from the game backend.
pub struct ExamineObjectTool {
    metadata: ToolMetadata,
    state: Arc<RwLock<ActionState>>,
}

impl ExamineObjectTool {
    /// Create the tool over a shared action state
    pub fn new(state: Arc<RwLock<ActionState>>) -> Self {
        let metadata = ToolMetadata::new(
            "examine_object",
            "Begin examining an object in the game world",
        )
        .with_param(ToolParam::required(
            "object_name",
            ParamKind::String,
            "The object to examine in detail",
        ));

        Self { metadata, state }
    }
}

#[async_trait]
impl Tool for ExamineObjectTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        let object_name = input.require_str("examine_object", "object_name")?.trim();

        if object_name.is_empty() {
            return Ok(ToolOutput::failure("Object name required"));
        }

        let mut state = self.state.write().await;
        state.examining = Some(object_name.to_string());

        Ok(ToolOutput::success(format!(
            "Beginning to examine the {}. Focusing attention on the object, awaiting \
             detailed observations...",
            object_name
        )))
    }
}
