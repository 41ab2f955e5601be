use serde::{Deserialize, Serialize};

use super::payment::PaymentRequirements;

/// Query sent to the facilitator's discovery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDiscoveryRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListDiscoveryRequest {
    fn default() -> Self {
        Self { kind: None, limit: 100, offset: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResource {
    pub resource: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x402_version: u32,
    #[serde(default)]
    pub accepts: Vec<PaymentRequirements>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResponse {
    pub x402_version: u32,
    #[serde(default)]
    pub items: Vec<DiscoveryResource>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Post-fetch filters; both optional.
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub asset: Option<String>,
    pub max_price: Option<u128>,
}

impl ResourceFilter {
    pub fn is_empty(&self) -> bool {
        self.asset.is_none() && self.max_price.is_none()
    }

    /// Some accepted payment must satisfy every set filter at once.
    pub fn matches(&self, item: &DiscoveryResource) -> bool {
        if self.is_empty() {
            return true;
        }
        item.accepts.iter().any(|req| {
            self.asset.as_deref().map_or(true, |a| req.asset == a)
                && self
                    .max_price
                    .map_or(true, |max| req.max_amount().is_some_and(|amount| amount <= max))
        })
    }

    /// Pagination is left as the facilitator reported it.
    pub fn apply(&self, mut response: DiscoveryResponse) -> DiscoveryResponse {
        response.items.retain(|item| self.matches(item));
        response
    }
}
