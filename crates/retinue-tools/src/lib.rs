//! Retinue Tools - agent-facing tool surface for the nearby-entities registry
//!
//! TigerStyle: Explicit tool definitions with validated inputs.
//!
//! # Overview
//!
//! This crate provides:
//! - Tool trait and ToolRegistry for definition and dispatch
//! - ActionDispatcher for atomic NPC actions (emote, follow, unfollow)
//! - NavigationValidator for slug and coordinate movement requests
//! - The built-in NPC tool set wired to the shared action state and the
//!   group registry gateway
//!
//! # Example
//!
//! ```rust,ignore
//! use retinue_tools::{register_npc_tools, ActionState, ToolInput, ToolRegistry};
//!
//! let registry = ToolRegistry::new();
//! register_npc_tools(&registry, state, gateway).await?;
//!
//! let input = ToolInput::new("perform_action")
//!     .with_param("action", "emote")
//!     .with_param("type", "wave");
//! let output = registry.execute("perform_action", input).await?;
//! ```

mod action;
mod builtin;
mod error;
mod navigation;
mod registry;
mod traits;

pub use action::{
    ActionDispatcher, ActionReply, ActionState, ReplyStatus, ACTION_NAMES, EMOTE_TYPES,
};
pub use builtin::{
    register_npc_tools, ExamineObjectTool, GroupMemberUpsertTool, GroupMemoryAppendTool,
    GroupMemoryReplaceTool, NavigateTool, NavigateToCoordinatesTool, PerformActionTool,
};
pub use error::{ToolError, ToolResult};
pub use navigation::NavigationValidator;
pub use registry::ToolRegistry;
pub use traits::{
    ParamKind, Tool, ToolInput, ToolMetadata, ToolOutput, ToolParam, TOOL_TIMEOUT_MS_DEFAULT,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_types_are_accessible() {
        let _registry = ToolRegistry::new();
        let _input = ToolInput::new("perform_action");
        let _output = ToolOutput::success("result");
        let _state = ActionState::default();
    }
}
