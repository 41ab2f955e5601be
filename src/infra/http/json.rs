use axum::Json;

use crate::core::error::DispatchError;
use crate::core::mcp::{err as rpc_err, ok as rpc_ok, RpcResp};

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

pub fn ok(id: serde_json::Value, result: serde_json::Value) -> Json<RpcResp> {
    Json(rpc_ok(id, result))
}

pub fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Json<RpcResp> {
    Json(rpc_err(id, code, message, None))
}

pub fn parse_error(message: impl Into<String>) -> Json<RpcResp> {
    error(serde_json::Value::Null, PARSE_ERROR, message)
}

/// Same code and `data.kind` as the MCP transport uses.
pub fn from_dispatch_error(id: serde_json::Value, err: &DispatchError) -> Json<RpcResp> {
    Json(rpc_err(id, err.code(), err.to_string(), Some(err.data())))
}
