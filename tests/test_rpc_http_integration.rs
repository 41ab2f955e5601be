use axum::body::{to_bytes, Body};
use hyper::Request;
use serde_json::{json, Value as J};
use tower::ServiceExt;

use x402_mcp::infra::config::AppConfig;
use x402_mcp::infra::http_app::build_app_with_rpc_shim;

const BODY_LIMIT: usize = 1024 * 1024;

async fn call(body: J) -> J {
    let registry = x402_mcp::tools::build_registry(&AppConfig::default()).unwrap();
    let app = build_app_with_rpc_shim(registry);
    let req = Request::builder()
        .method("POST")
        .uri("/rpc")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_echo_and_unknown_tool_end_to_end() {
    let v = call(json!({"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"health_check"}})).await;
    assert_eq!(v["result"], json!({"status": "ok"}));

    let v = call(json!({"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"text":"hello"}}})).await;
    assert_eq!(v["result"], "hello");

    let v = call(json!({"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"unknown_tool"}})).await;
    assert_eq!(v["error"]["code"], -32601);
    assert!(v["error"]["message"].as_str().unwrap().contains("unknown_tool"));
}

#[tokio::test]
async fn discovery_through_the_shim_uses_the_facilitator() {
    let server = httpmock::MockServer::start();
    let m = server.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/discovery/resources")
            .query_param("limit", "100")
            .query_param("offset", "0");
        then.status(200).json_body(json!({
            "x402Version": 1,
            "items": [{
                "resource": "https://api.example.com/weather",
                "type": "http",
                "x402Version": 1,
                "accepts": [{
                    "scheme": "exact",
                    "network": "base",
                    "maxAmountRequired": "2000000",
                    "resource": "https://api.example.com/weather",
                    "description": "weather",
                    "mimeType": "application/json",
                    "payTo": "0x209693Bc6afc0C5328bA36FaF03C514EF312287C",
                    "maxTimeoutSeconds": 60,
                    "asset": "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"
                }]
            }],
            "pagination": { "limit": 100, "offset": 0, "total": 1 }
        }));
    });

    let mut cfg = AppConfig::default();
    cfg.facilitator.url = server.base_url();
    let registry = x402_mcp::tools::build_registry(&cfg).unwrap();
    let app = build_app_with_rpc_shim(registry);

    let body = json!({"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"discovery_resource","arguments":{"max_price":1000000}}});
    let req = Request::builder()
        .method("POST")
        .uri("/rpc")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let v: J = serde_json::from_slice(&bytes).unwrap();
    m.assert();
    assert_eq!(v["result"]["items"], json!([]));
    assert_eq!(v["result"]["pagination"]["total"], 1);
}
