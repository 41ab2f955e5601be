use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure raised by a tool's own logic.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments passed the declared schema but still could not be used.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
}

/// Minimal metadata every tool must expose.
pub trait ToolSpec {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> serde_json::Value;
    fn output_schema(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Tool = Spec + handler
#[async_trait]
pub trait Tool: ToolSpec + Send + Sync {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError>;
}

/// Deserialize already-validated arguments into a tool's typed input.
pub fn parse_args<T: DeserializeOwned>(arguments: &serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments.clone()).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}
