//! Plain JSON-RPC 2.0 shim over the tool registry, for clients without MCP.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value as J};

use crate::core::mcp::{InitializeResult, RpcReq, RpcResp};
use crate::infra::http::json as http_json;
use crate::tools::ToolRegistry;

fn tools_list(reg: &ToolRegistry) -> J {
    let tools: Vec<J> = reg
        .list()
        .into_iter()
        .map(|t| {
            let mut entry = json!({ "name": t.name, "description": t.description, "inputSchema": t.input_schema });
            if let Some(out) = t.output_schema {
                entry["outputSchema"] = out;
            }
            entry
        })
        .collect();
    json!({ "tools": tools })
}

async fn call_tool(reg: &ToolRegistry, id: J, params: &J) -> RpcResp {
    let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
        return http_json::error(id, http_json::INVALID_PARAMS, "missing tool name").0;
    };
    let args = params.get("arguments").unwrap_or(&J::Null);
    match reg.dispatch(name, args).await {
        Ok(out) => http_json::ok(id, out).0,
        Err(e) => http_json::from_dispatch_error(id, &e).0,
    }
}

/// Unparseable bodies are answered with a JSON-RPC `-32700`.
pub async fn http(
    State(reg): State<ToolRegistry>,
    body: Result<Json<RpcReq>, JsonRejection>,
) -> Json<RpcResp> {
    let Json(req) = match body {
        Ok(req) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rpc parse error");
            return http_json::parse_error(format!("parse error: {}", rejection.body_text()));
        }
    };
    tracing::debug!(method = %req.method, id = ?req.id, "rpc request");
    let id = req.id.clone();
    let resp = match req.method.as_str() {
        "initialize" => match serde_json::to_value(InitializeResult::current()) {
            Ok(v) => http_json::ok(id, v).0,
            Err(e) => http_json::error(id, -32603, e.to_string()).0,
        },
        "shutdown" => http_json::ok(id, J::Null).0,
        "tools.list" | "tools/list" => http_json::ok(id, tools_list(&reg)).0,
        "tools.call" | "tools/call" => call_tool(&reg, id, &req.params).await,
        other => http_json::error(id, http_json::METHOD_NOT_FOUND, format!("unknown method: {other}")).0,
    };
    if let Some(err) = &resp.error {
        tracing::warn!(method = %req.method, code = err.code, message = %err.message, "rpc error");
    }
    Json(resp)
}
