use thiserror::Error;

use crate::core::tool::ToolError;

pub const UNKNOWN_TOOL_CODE: i32 = -32601;
pub const INVALID_ARGUMENT_CODE: i32 = -32602;
pub const HANDLER_ERROR_CODE: i32 = -32000;

/// Outcome of a failed `dispatch`. Never fatal to the server.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArgument { tool: String, message: String },
    #[error("{tool} failed: {message}")]
    Handler { tool: String, message: String },
}

impl DispatchError {
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UnknownTool(_) => "unknown_tool",
            DispatchError::InvalidArgument { .. } => "invalid_argument",
            DispatchError::Handler { .. } => "handler_error",
        }
    }

    /// JSON-RPC error code used on every wire surface.
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::UnknownTool(_) => UNKNOWN_TOOL_CODE,
            DispatchError::InvalidArgument { .. } => INVALID_ARGUMENT_CODE,
            DispatchError::Handler { .. } => HANDLER_ERROR_CODE,
        }
    }

    pub fn data(&self) -> serde_json::Value {
        match self {
            DispatchError::UnknownTool(name) => serde_json::json!({ "kind": self.kind(), "tool": name }),
            DispatchError::InvalidArgument { tool, .. } | DispatchError::Handler { tool, .. } => {
                serde_json::json!({ "kind": self.kind(), "tool": tool })
            }
        }
    }

    pub(crate) fn from_tool(tool: &str, err: ToolError) -> Self {
        match err {
            ToolError::InvalidArguments(message) => DispatchError::InvalidArgument {
                tool: tool.to_owned(),
                message,
            },
            ToolError::Message(message) => DispatchError::Handler {
                tool: tool.to_owned(),
                message,
            },
        }
    }
}

/// Failures while assembling the registry at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool already registered: {0}")]
    DuplicateTool(&'static str),
    #[error("input schema for {tool} does not compile: {message}")]
    InvalidSchema { tool: &'static str, message: String },
}
