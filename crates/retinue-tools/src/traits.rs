//! Tool interface for the agent runtime
//!
//! TigerStyle: Typed parameter schemas, checked before dispatch.
//!
//! Every capability of this crate reaches the agent runtime as a named
//! tool with a flat parameter schema. The schema is advisory for the
//! runtime (it is what the model sees) and binding for dispatch: required
//! parameters must be supplied and supplied parameters must carry the
//! declared kind. Allow-list constraints are schema metadata only; the
//! tools themselves enforce them so the refusal message can name the
//! valid alternatives in-band.

use crate::error::{ToolError, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Default tool execution timeout (30 seconds)
pub const TOOL_TIMEOUT_MS_DEFAULT: u64 = 30_000;

/// Value kind a tool parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Number,
    Boolean,
}

impl ParamKind {
    /// Wire name of this kind, as shown in schemas and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }

    fn admits(&self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Number => value.is_number(),
            ParamKind::Boolean => value.is_boolean(),
        }
    }
}

/// One entry in a tool's parameter schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParam {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    pub description: String,
    /// Allowed values for allow-list parameters; advisory, see module docs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,
}

impl ToolParam {
    /// Declare a required parameter
    pub fn required(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            description: description.into(),
            one_of: None,
        }
    }

    /// Declare an optional parameter
    pub fn optional(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    /// Constrain the parameter to a fixed set of values
    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.one_of = Some(values.iter().map(|v| (*v).to_string()).collect());
        self
    }
}

/// Descriptive and dispatch metadata for one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub parameters: Vec<ToolParam>,
    pub timeout_ms: u64,
}

impl ToolMetadata {
    /// Start a metadata declaration
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: "2.0.0".to_string(),
            parameters: Vec::new(),
            timeout_ms: TOOL_TIMEOUT_MS_DEFAULT,
        }
    }

    /// Add a parameter to the schema
    pub fn with_param(mut self, param: ToolParam) -> Self {
        self.parameters.push(param);
        self
    }

    /// Override the execution timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Override the tool version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Look up a declared parameter
    pub fn param(&self, name: &str) -> Option<&ToolParam> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// One tool call as the runtime hands it over
///
/// Parameters keep their JSON values; the typed accessors below return
/// `None` on both a missing parameter and a kind mismatch, which
/// `Tool::validate` has already ruled out on the dispatch path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub tool_name: String,
    pub params: Map<String, Value>,
}

impl ToolInput {
    /// Create an input for the named tool
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            params: Map::new(),
        }
    }

    /// Attach a parameter value
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// String parameter, if supplied as a string
    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    /// Numeric parameter, if supplied as a number
    pub fn f64_param(&self, name: &str) -> Option<f64> {
        self.params.get(name).and_then(Value::as_f64)
    }

    /// Boolean parameter, if supplied as a boolean
    pub fn bool_param(&self, name: &str) -> Option<bool> {
        self.params.get(name).and_then(Value::as_bool)
    }

    /// Whether the parameter was supplied at all
    pub fn supplied(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// String parameter that the tool cannot proceed without
    pub fn require_str(&self, tool: &str, name: &str) -> ToolResult<&str> {
        self.str_param(name)
            .ok_or_else(|| ToolError::invalid_input(tool, format!("{} must be a string", name)))
    }
}

/// What a tool call produced
///
/// Domain refusals (bad action, unknown member, stale note text) come
/// back as `success: false` with a human-readable error, so the runtime
/// can phrase a reply and its retry logic can branch on the flag. An
/// `Err` from `execute` is reserved for calls that could not be carried
/// out at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl ToolOutput {
    /// A successful call with a result payload
    pub fn success(result: impl Into<Value>) -> Self {
        Self {
            success: true,
            result: Some(result.into()),
            error: None,
            duration_ms: 0,
        }
    }

    /// A successful call whose contract is a bare `null` result
    pub fn null() -> Self {
        Self::success(Value::Null)
    }

    /// A refused call with a human-readable reason
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    /// Record how long execution took
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Whether the call was accepted
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The result rendered as text
    pub fn result_text(&self) -> Option<String> {
        self.result.as_ref().map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
    }
}

/// A callable unit the agent runtime dispatches into
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's schema and dispatch metadata
    fn metadata(&self) -> &ToolMetadata;

    /// The tool's name
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Check an input against the declared schema
    ///
    /// Required parameters must be present and every supplied declared
    /// parameter must carry its declared kind. Allow-list constraints
    /// are deliberately not enforced here (see module docs).
    fn validate(&self, input: &ToolInput) -> ToolResult<()> {
        let metadata = self.metadata();

        for param in &metadata.parameters {
            match input.params.get(&param.name) {
                None if param.required => {
                    return Err(ToolError::MissingParameter {
                        tool: metadata.name.clone(),
                        param: param.name.clone(),
                    });
                }
                Some(value) if !param.kind.admits(value) => {
                    return Err(ToolError::ParameterType {
                        tool: metadata.name.clone(),
                        param: param.name.clone(),
                        expected: param.kind.as_str(),
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Run the tool
    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput>;
}
