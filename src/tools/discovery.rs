use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::clients::facilitator::ResourceCatalog;
use crate::core::tool::{parse_args, Tool, ToolError, ToolSpec};
use crate::domain::{ListDiscoveryRequest, ResourceFilter};

/// Lists payable resources from the facilitator's Bazaar.
#[derive(Clone)]
pub struct DiscoveryResourceTool {
    catalog: Arc<dyn ResourceCatalog>,
}

impl DiscoveryResourceTool {
    pub fn new(catalog: Arc<dyn ResourceCatalog>) -> Self {
        Self { catalog }
    }
}

fn default_limit() -> u32 {
    100
}

#[derive(Debug, Deserialize)]
struct DiscoveryArgs {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    offset: u32,
    asset: Option<String>,
    max_price: Option<u128>,
}

impl ToolSpec for DiscoveryResourceTool {
    fn name(&self) -> &'static str {
        "discovery_resource"
    }
    fn description(&self) -> &'static str {
        "List x402 resources from the Bazaar, optionally filtered by asset and maximum price (atomic units, 1000000 = 1 USDC)"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "type": { "type": "string", "description": "Resource type, e.g. \"http\"" },
                "limit": { "type": "integer", "minimum": 1, "maximum": 100, "default": 100 },
                "offset": { "type": "integer", "minimum": 0, "default": 0 },
                "asset": { "type": "string", "description": "ERC-20 contract address of the payment asset" },
                "max_price": { "type": "integer", "minimum": 0, "description": "Upper bound on maxAmountRequired" }
            },
            "additionalProperties": false
        })
    }
    fn output_schema(&self) -> Option<serde_json::Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "x402Version": { "type": "integer" },
                "items": { "type": "array" },
                "pagination": { "type": "object" }
            },
            "required": ["items"]
        }))
    }
}

#[async_trait]
impl Tool for DiscoveryResourceTool {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let args: DiscoveryArgs = parse_args(arguments)?;
        let request = ListDiscoveryRequest { kind: args.kind, limit: args.limit, offset: args.offset };
        let filter = ResourceFilter { asset: args.asset, max_price: args.max_price };

        let listing = self
            .catalog
            .list(&request)
            .await
            .map_err(|e| ToolError::Message(e.to_string()))?;
        let fetched = listing.items.len();
        let filtered = filter.apply(listing);
        tracing::info!(fetched, kept = filtered.items.len(), "discovery listing");

        serde_json::to_value(filtered).map_err(|e| ToolError::Message(e.to_string()))
    }
}
