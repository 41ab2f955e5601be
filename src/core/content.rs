//! Mapping of dispatch outcomes onto MCP tool results.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value as JsonValue;

/// Objects go to `structuredContent` (with a text mirror); scalars become text.
pub fn success(value: JsonValue) -> CallToolResult {
    match value {
        JsonValue::Object(_) => CallToolResult::structured(value),
        JsonValue::String(text) => CallToolResult::success(vec![Content::text(text)]),
        other => CallToolResult::success(vec![Content::text(other.to_string())]),
    }
}

/// Handler failures are reported in-band so the model can see them.
pub fn failure(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}
