use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const X402_VERSION: u32 = 1;
pub const EXACT_SCHEME: &str = "exact";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("no supported payment requirements")]
    NoMatchingRequirements,
    #[error("malformed payment requirements: {0}")]
    Malformed(String),
    #[error("payment rejected: {0}")]
    Rejected(String),
}

/// One way a resource accepts payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    pub scheme: String,
    pub network: String,
    /// Atomic units, decimal string.
    pub max_amount_required: String,
    pub resource: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,
    pub pay_to: String,
    #[serde(default)]
    pub max_timeout_seconds: u64,
    pub asset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl PaymentRequirements {
    /// `None` when the amount is not a plain unsigned integer.
    pub fn max_amount(&self) -> Option<u128> {
        self.max_amount_required.trim().parse().ok()
    }

    fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.as_ref()?.get(key)?.as_str()
    }

    /// EIP-712 domain name and version of the payment token.
    pub fn token_domain(&self) -> Result<(&str, &str), PaymentError> {
        match (self.extra_str("name"), self.extra_str("version")) {
            (Some(name), Some(version)) => Ok((name, version)),
            _ => Err(PaymentError::Malformed(format!(
                "missing token name/version in extra for asset {}",
                self.asset
            ))),
        }
    }
}

/// Body of an HTTP 402 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequiredResponse {
    pub x402_version: u32,
    #[serde(default)]
    pub accepts: Vec<PaymentRequirements>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Decoded form of the `X-PAYMENT` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub x402_version: u32,
    pub scheme: String,
    pub network: String,
    pub payload: ExactEvmPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactEvmPayload {
    pub signature: String,
    pub authorization: Authorization,
}

/// EIP-3009 `transferWithAuthorization` arguments, all as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub from: String,
    pub to: String,
    pub value: String,
    pub valid_after: String,
    pub valid_before: String,
    pub nonce: String,
}

/// Decoded form of the `X-PAYMENT-RESPONSE` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub transaction: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub payer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
}

/// Filters applied when choosing among a resource's accepted payments.
#[derive(Debug, Clone, Default)]
pub struct RequirementFilter<'a> {
    pub network: Option<&'a str>,
    pub scheme: Option<&'a str>,
    pub max_value: Option<u128>,
}

/// First requirement, in server order, that passes every set filter.
pub fn select_requirement<'r>(
    accepts: &'r [PaymentRequirements],
    filter: &RequirementFilter<'_>,
) -> Result<&'r PaymentRequirements, PaymentError> {
    accepts
        .iter()
        .find(|req| {
            filter.scheme.map_or(true, |s| req.scheme == s)
                && filter.network.map_or(true, |n| req.network == n)
                && filter
                    .max_value
                    .map_or(true, |max| req.max_amount().is_some_and(|amount| amount <= max))
        })
        .ok_or(PaymentError::NoMatchingRequirements)
}
