use axum::{
    routing::{any_service, get, post},
    Router,
};
use std::sync::Arc;

use crate::infra::mcp::X402Svc;
use crate::infra::runtime::mcp_transport::{make_streamable_http_service, LocalSessionManager};
use crate::tools::ToolRegistry;

/// `/healthz` + streamable MCP at `/mcp`.
pub fn build_app(registry: ToolRegistry) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let mcp_service = make_streamable_http_service(X402Svc::new(registry), session_mgr);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service("/mcp", any_service(mcp_service))
}

/// Same as [`build_app`] plus the plain JSON-RPC shim at `/rpc`.
pub fn build_app_with_rpc_shim(registry: ToolRegistry) -> Router {
    let rpc = Router::new()
        .route("/rpc", post(crate::api::rpc::http))
        .with_state(registry.clone());
    build_app(registry).merge(rpc)
}
