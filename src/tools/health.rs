use async_trait::async_trait;
use serde_json::json;

use crate::core::tool::{Tool, ToolError, ToolSpec};

#[derive(Clone, Default)]
pub struct HealthCheckTool;

impl ToolSpec for HealthCheckTool {
    fn name(&self) -> &'static str {
        "health_check"
    }
    fn description(&self) -> &'static str {
        "Report that the server is up"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {} })
    }
    fn output_schema(&self) -> Option<serde_json::Value> {
        Some(json!({
            "type": "object",
            "properties": { "status": { "type": "string" } },
            "required": ["status"]
        }))
    }
}

#[async_trait]
impl Tool for HealthCheckTool {
    async fn call(&self, _arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        Ok(json!({ "status": "ok" }))
    }
}
