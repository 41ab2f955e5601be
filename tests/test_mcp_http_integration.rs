use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt; // for .collect
use hyper::{header, Request, StatusCode};
use serde_json::{json, Value};
use tokio::time::{timeout, Duration};
use tower::ServiceExt; // for .oneshot

use x402_mcp::infra::config::AppConfig;
use x402_mcp::infra::http_app::build_app;

fn app() -> Router {
    let registry = x402_mcp::tools::build_registry(&AppConfig::default()).unwrap();
    build_app(registry)
}

fn post(session: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(id) = session {
        builder = builder.header("MCP-Session-Id", id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// First `data:` frame of an SSE response, parsed as JSON-RPC.
async fn rpc_response(app: &Router, req: Request<Body>) -> Value {
    let res = timeout(Duration::from_secs(20), app.clone().oneshot(req))
        .await
        .unwrap()
        .unwrap();
    assert!(res.status().is_success());
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let s = String::from_utf8_lossy(&bytes);
    s.lines()
        .find_map(|line| line.strip_prefix("data: ").map(|d| d.to_string()))
        .and_then(|d| serde_json::from_str::<Value>(&d).ok())
        .expect("no JSON-RPC frame in response")
}

async fn open_session(app: &Router) -> String {
    let init = json!({
        "jsonrpc":"2.0","id":1,"method":"initialize",
        "params":{ "protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"test","version":"0.1"} }
    });
    let init_res = app.clone().oneshot(post(None, init)).await.unwrap();
    assert!(init_res.status().is_success());
    let session_id = init_res
        .headers()
        .get("MCP-Session-Id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();

    let initialized = json!({"jsonrpc":"2.0","method":"notifications/initialized","params":{}});
    let res = app.clone().oneshot(post(Some(&session_id), initialized)).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    session_id
}

#[tokio::test]
async fn initialize_list_and_call_over_streamable_http() {
    let app = app();
    let session = open_session(&app).await;

    let list = rpc_response(&app, post(Some(&session), json!({"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}}))).await;
    let names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["call_service", "discovery_resource", "echo", "health_check"]);

    let health = rpc_response(
        &app,
        post(Some(&session), json!({"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"health_check","arguments":{}}})),
    )
    .await;
    assert_eq!(health["result"]["structuredContent"], json!({"status": "ok"}));

    let echo = rpc_response(
        &app,
        post(Some(&session), json!({"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"echo","arguments":{"text":"hello"}}})),
    )
    .await;
    assert_eq!(echo["result"]["content"][0]["text"], "hello");

    let unknown = rpc_response(
        &app,
        post(Some(&session), json!({"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"unknown_tool","arguments":{}}})),
    )
    .await;
    assert_eq!(unknown["error"]["code"], -32601);
    assert_eq!(unknown["error"]["data"]["kind"], "unknown_tool");
}

#[tokio::test]
async fn invalid_arguments_are_protocol_errors() {
    let app = app();
    let session = open_session(&app).await;
    let v = rpc_response(
        &app,
        post(Some(&session), json!({"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"text":42}}})),
    )
    .await;
    assert_eq!(v["error"]["code"], -32602);
}
