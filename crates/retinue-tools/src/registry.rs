//! Tool registry for discovery and dispatch
//!
//! TigerStyle: One dispatch path, explicit timeouts.
//!
//! The agent runtime addresses tools by name; this registry owns the
//! name space and the single path every call takes: look up, validate
//! against the schema, run under the tool's own timeout. Tools register
//! once at startup and are never replaced, so a duplicate name is a
//! wiring mistake and is rejected outright.

use crate::error::{ToolError, ToolResult};
use crate::traits::{Tool, ToolInput, ToolMetadata, ToolOutput};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// The set of tools the agent runtime can call
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Add a tool under its metadata name
    pub async fn register<T: Tool + 'static>(&self, tool: T) -> ToolResult<()> {
        let name = tool.name().to_string();
        let mut tools = self.tools.write().await;

        if tools.contains_key(&name) {
            return Err(ToolError::DuplicateTool { name });
        }

        info!(tool = %name, "registering tool");
        tools.insert(name, Arc::new(tool));
        Ok(())
    }

    /// Look up a tool by name
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().await.get(name).cloned()
    }

    /// Whether a tool is registered under this name
    pub async fn has(&self, name: &str) -> bool {
        self.tools.read().await.contains_key(name)
    }

    /// Names of all registered tools
    pub async fn names(&self) -> Vec<String> {
        self.tools.read().await.keys().cloned().collect()
    }

    /// Schemas of all registered tools, for the runtime's tool listing
    pub async fn schemas(&self) -> Vec<ToolMetadata> {
        self.tools
            .read()
            .await
            .values()
            .map(|tool| tool.metadata().clone())
            .collect()
    }

    /// Number of registered tools
    pub async fn count(&self) -> usize {
        self.tools.read().await.len()
    }

    /// Dispatch one tool call
    ///
    /// The input is validated against the tool's schema first, then the
    /// tool runs under its declared timeout. Domain refusals come back as
    /// an unsuccessful `ToolOutput`; an `Err` means the call itself
    /// failed and nothing useful was produced.
    pub async fn execute(&self, name: &str, input: ToolInput) -> ToolResult<ToolOutput> {
        let tool = self.get(name).await.ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;

        tool.validate(&input)?;

        let timeout_ms = tool.metadata().timeout_ms;
        debug!(tool = %name, timeout_ms, "dispatching tool call");

        let started = Instant::now();
        let outcome = tokio::time::timeout(Duration::from_millis(timeout_ms), tool.execute(input)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let output = match outcome {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                warn!(tool = %name, error = %err, "tool call failed");
                return Err(err);
            }
            Err(_) => {
                warn!(tool = %name, timeout_ms, "tool call timed out");
                return Err(ToolError::Timeout {
                    tool: name.to_string(),
                    timeout_ms,
                });
            }
        };

        debug!(
            tool = %name,
            elapsed_ms,
            accepted = output.is_success(),
            "tool call completed"
        );
        Ok(output.with_duration(elapsed_ms))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
