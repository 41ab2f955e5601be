use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::core::tool::{parse_args, Tool, ToolError, ToolSpec};

#[derive(Clone, Default)]
pub struct EchoTool;

#[derive(Deserialize)]
struct EchoArgs {
    text: String,
}

impl ToolSpec for EchoTool {
    fn name(&self) -> &'static str {
        "echo"
    }
    fn description(&self) -> &'static str {
        "Return the given text unchanged"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": { "text": { "type": "string" } },
            "required": ["text"]
        })
    }
}

#[async_trait]
impl Tool for EchoTool {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let args: EchoArgs = parse_args(arguments)?;
        Ok(serde_json::Value::String(args.text))
    }
}
