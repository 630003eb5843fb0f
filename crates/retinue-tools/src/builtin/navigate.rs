//! The navigate_to and navigate_to_coordinates tools

use super::reply_output;
use crate::action::ActionState;
use crate::error::{ToolError, ToolResult};
use crate::navigation::NavigationValidator;
use crate::traits::{ParamKind, Tool, ToolInput, ToolMetadata, ToolOutput, ToolParam};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Navigate to a known location by slug
pub struct NavigateTool {
    metadata: ToolMetadata,
    state: Arc<RwLock<ActionState>>,
}

impl NavigateTool {
    /// Create the tool over a shared action state
    pub fn new(state: Arc<RwLock<ActionState>>) -> Self {
        let metadata = ToolMetadata::new("navigate_to", "Navigate to a known location by slug")
            .with_param(ToolParam::required(
                "destination_slug",
                ParamKind::String,
                "Slug from the locations memory block (e.g. 'market_district')",
            ));

        Self { metadata, state }
    }
}

#[async_trait]
impl Tool for NavigateTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        let slug = input.require_str("navigate_to", "destination_slug")?;

        let mut state = self.state.write().await;
        let reply = NavigationValidator::navigate_to_slug(&mut state, slug);
        reply_output(reply)
    }
}

/// Navigate to raw XYZ coordinates
pub struct NavigateToCoordinatesTool {
    metadata: ToolMetadata,
    state: Arc<RwLock<ActionState>>,
}

impl NavigateToCoordinatesTool {
    /// Create the tool over a shared action state
    pub fn new(state: Arc<RwLock<ActionState>>) -> Self {
        let metadata = ToolMetadata::new(
            "navigate_to_coordinates",
            "Navigate to specific XYZ coordinates",
        )
        .with_param(ToolParam::required("x", ParamKind::Number, "X coordinate"))
        .with_param(ToolParam::required("y", ParamKind::Number, "Y coordinate"))
        .with_param(ToolParam::required("z", ParamKind::Number, "Z coordinate"));

        Self { metadata, state }
    }

    fn coordinate(input: &ToolInput, name: &str) -> ToolResult<f64> {
        input.f64_param(name).ok_or_else(|| {
            ToolError::invalid_input(
                "navigate_to_coordinates",
                format!("{} must be a number", name),
            )
        })
    }
}

#[async_trait]
impl Tool for NavigateToCoordinatesTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        let x = Self::coordinate(&input, "x")?;
        let y = Self::coordinate(&input, "y")?;
        let z = Self::coordinate(&input, "z")?;

        let mut state = self.state.write().await;
        let reply = NavigationValidator::navigate_to_coordinates(&mut state, x, y, z);
        reply_output(reply)
    }
}
