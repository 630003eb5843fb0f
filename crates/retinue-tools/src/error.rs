//! Tool error types
//!
//! TigerStyle: Explicit error variants with context.
//!
//! Domain refusals (bad action, unknown member, stale note text) never
//! appear here; those travel inside `ToolOutput`. A `ToolError` means
//! the call itself could not be carried out: the tool does not exist,
//! the input does not fit the schema, or the gateway failed underneath.

use thiserror::Error;

/// Result type for tool operations
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur during tool dispatch and execution
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("no such tool: {name}")]
    UnknownTool { name: String },

    #[error("tool registered twice: {name}")]
    DuplicateTool { name: String },

    #[error("invalid input for tool '{tool}': {reason}")]
    InvalidInput { tool: String, reason: String },

    #[error("tool '{tool}' requires parameter '{param}'")]
    MissingParameter { tool: String, param: String },

    #[error("parameter '{param}' of tool '{tool}' must be a {expected}")]
    ParameterType {
        tool: String,
        param: String,
        expected: &'static str,
    },

    #[error("tool '{tool}' gave no answer within {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Gateway or registry fault underneath the tool
    #[error(transparent)]
    Core(#[from] retinue_core::Error),
}

impl ToolError {
    /// Create an invalid input error
    pub fn invalid_input(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}
