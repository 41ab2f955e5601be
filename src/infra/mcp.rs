//! MCP server handler for x402-mcp.
//!
//! `tools/list` and `tools/call` are answered from the sealed [`ToolRegistry`],
//! so the schemas clients see are the ones arguments are validated against.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ErrorCode, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::Value as JsonValue;

use crate::core::content;
use crate::core::error::DispatchError;
use crate::tools::{ToolMeta, ToolRegistry};

#[derive(Clone)]
pub struct X402Svc {
    registry: ToolRegistry,
}

impl X402Svc {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn tools(&self) -> Vec<rmcp::model::Tool> {
        self.registry.list().into_iter().map(to_mcp_tool).collect()
    }

    /// Dispatch one call. Handler failures stay in-band; lookup and
    /// validation failures become protocol errors.
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> Result<CallToolResult, McpError> {
        let args = arguments.map(JsonValue::Object).unwrap_or(JsonValue::Null);
        tracing::debug!(tool = name, "tools/call");
        match self.registry.dispatch(name, &args).await {
            Ok(value) => Ok(content::success(value)),
            Err(err @ DispatchError::Handler { .. }) => Ok(content::failure(err.to_string())),
            Err(err) => Err(to_mcp_error(&err)),
        }
    }
}

fn as_object(schema: JsonValue) -> JsonObject {
    match schema {
        JsonValue::Object(map) => map,
        _ => JsonObject::new(),
    }
}

fn to_mcp_tool(meta: ToolMeta) -> rmcp::model::Tool {
    let mut tool = rmcp::model::Tool::new(meta.name, meta.description, Arc::new(as_object(meta.input_schema)));
    tool.output_schema = meta.output_schema.map(|s| Arc::new(as_object(s)));
    tool
}

pub fn to_mcp_error(err: &DispatchError) -> McpError {
    McpError::new(ErrorCode(err.code()), err.to_string(), Some(err.data()))
}

impl ServerHandler for X402Svc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Discover x402 resources with discovery_resource, then pay for and call them with call_service."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.invoke(&request.name, request.arguments).await
    }
}
