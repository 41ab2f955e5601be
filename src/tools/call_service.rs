use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::clients::paid_http::{HttpMethod, PaidHttpClient, ServiceRequest};
use crate::clients::ClientError;
use crate::core::tool::{parse_args, Tool, ToolError, ToolSpec};
use crate::signing::EvmAccount;

/// Calls an x402-protected endpoint, paying with the caller's key when asked to.
#[derive(Clone)]
pub struct CallServiceTool {
    client: PaidHttpClient,
}

impl CallServiceTool {
    pub fn new(client: PaidHttpClient) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct CallServiceArgs {
    private_key: String,
    resource: String,
    method: String,
    input_data: Map<String, Value>,
    custom_network_filter: Option<String>,
}

impl ToolSpec for CallServiceTool {
    fn name(&self) -> &'static str {
        "call_service"
    }
    fn description(&self) -> &'static str {
        "Call an x402 resource, settling any 402 Payment Required with a signed payment from the given wallet"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "private_key": {
                    "type": "string",
                    "pattern": "^(0x)?[0-9a-fA-F]{64}$",
                    "description": "Hex secp256k1 key of the paying wallet"
                },
                "resource": {
                    "type": "string",
                    "pattern": "^https?://",
                    "description": "Full resource URL"
                },
                "method": {
                    "type": "string",
                    "pattern": "^([Gg][Ee][Tt]|[Pp][Oo][Ss][Tt])$",
                    "description": "get or post"
                },
                "input_data": {
                    "type": "object",
                    "description": "Query parameters for get, JSON body for post"
                },
                "custom_network_filter": {
                    "type": "string",
                    "description": "Only pay on this network, e.g. base-sepolia"
                }
            },
            "required": ["private_key", "resource", "method", "input_data"]
        })
    }
    fn output_schema(&self) -> Option<serde_json::Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "result": { "type": "string" },
                "hash": { "type": ["string", "null"] }
            },
            "required": ["result", "hash"]
        }))
    }
}

fn to_tool_error(err: ClientError) -> ToolError {
    match err {
        ClientError::InvalidResource(_) | ClientError::UnsupportedMethod(_) => {
            ToolError::InvalidArguments(err.to_string())
        }
        other => ToolError::Message(other.to_string()),
    }
}

#[async_trait]
impl Tool for CallServiceTool {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let args: CallServiceArgs = parse_args(arguments)?;
        let account = EvmAccount::from_hex(&args.private_key)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        let method: HttpMethod = args.method.parse().map_err(to_tool_error)?;
        tracing::info!(
            resource = %args.resource,
            method = ?method,
            payer = %account.checksum_address(),
            "call_service"
        );

        let response = self
            .client
            .call(
                &account,
                ServiceRequest {
                    resource: &args.resource,
                    method,
                    input: &args.input_data,
                    network_filter: args.custom_network_filter.as_deref(),
                },
            )
            .await
            .map_err(to_tool_error)?;

        let hash = response.settlement.map(|s| s.transaction);
        Ok(json!({ "result": response.body, "hash": hash }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::HttpConfig;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use httpmock::prelude::*;

    const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn tool() -> CallServiceTool {
        CallServiceTool::new(PaidHttpClient::from_config(&HttpConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn returns_body_and_settlement_hash() {
        let server = MockServer::start();
        let settle = BASE64.encode(r#"{"success":true,"transaction":"0xabc123","network":"base-sepolia"}"#);
        let paid = server.mock(|when, then| {
            when.method(GET).path("/joke").header_exists("X-PAYMENT");
            then.status(200).header("X-PAYMENT-RESPONSE", settle.as_str()).body("a joke");
        });
        server.mock(|when, then| {
            when.method(GET).path("/joke");
            then.status(402).json_body(json!({
                "x402Version": 1,
                "error": "X-PAYMENT header is required",
                "accepts": [{
                    "scheme": "exact",
                    "network": "base-sepolia",
                    "maxAmountRequired": "10000",
                    "resource": "/joke",
                    "description": "",
                    "mimeType": "text/plain",
                    "payTo": "0x209693Bc6afc0C5328bA36FaF03C514EF312287C",
                    "maxTimeoutSeconds": 60,
                    "asset": "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
                    "extra": { "name": "USDC", "version": "2" }
                }]
            }));
        });

        let out = tool()
            .call(&json!({
                "private_key": KEY,
                "resource": server.url("/joke"),
                "method": "GET",
                "input_data": {}
            }))
            .await
            .unwrap();
        paid.assert_hits(1);
        assert_eq!(out, json!({ "result": "a joke", "hash": "0xabc123" }));
    }

    #[tokio::test]
    async fn free_endpoint_has_null_hash() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/echo").json_body(json!({"q": "hi"}));
            then.status(200).body("{\"q\":\"hi\"}");
        });
        let out = tool()
            .call(&json!({
                "private_key": format!("0x{KEY}"),
                "resource": server.url("/echo"),
                "method": "post",
                "input_data": { "q": "hi" }
            }))
            .await
            .unwrap();
        assert_eq!(out["result"], "{\"q\":\"hi\"}");
        assert!(out["hash"].is_null());
    }

    #[tokio::test]
    async fn upstream_errors_are_handler_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/down");
            then.status(503).body("maintenance");
        });
        let err = tool()
            .call(&json!({
                "private_key": KEY,
                "resource": server.url("/down"),
                "method": "get",
                "input_data": {}
            }))
            .await
            .unwrap_err();
        match err {
            ToolError::Message(m) => assert!(m.contains("503")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn url_without_path_is_an_argument_error() {
        let err = tool()
            .call(&json!({
                "private_key": KEY,
                "resource": "https://api.example.com",
                "method": "get",
                "input_data": {}
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
