//! HTTP client that settles `402 Payment Required` with a signed x402 payment.

use std::str::FromStr;

use reqwest::{Client, Response, StatusCode};
use serde_json::{Map, Value};

use super::ClientError;
use crate::domain::payment::{select_requirement, RequirementFilter, EXACT_SCHEME};
use crate::domain::{PaymentError, PaymentRequiredResponse, SettleResponse};
use crate::infra::config::HttpConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client_with;
use crate::signing::{decode_payment_response, encode_payment_header, random_nonce, sign_exact_payment, EvmAccount};

pub const PAYMENT_HEADER: &str = "X-PAYMENT";
pub const PAYMENT_RESPONSE_HEADER: &str = "X-PAYMENT-RESPONSE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl FromStr for HttpMethod {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            _ => Err(ClientError::UnsupportedMethod(s.to_owned())),
        }
    }
}

/// Split `scheme://authority/path?query` into base and endpoint.
/// A URL without any path (`https://host`) is rejected.
pub fn split_resource(resource: &str) -> Result<(&str, &str), ClientError> {
    let rest = resource
        .strip_prefix("https://")
        .or_else(|| resource.strip_prefix("http://"))
        .ok_or_else(|| {
            ClientError::InvalidResource(format!("{resource} is not an http:// or https:// URL"))
        })?;
    let scheme_len = resource.len() - rest.len();
    match rest.find('/') {
        Some(idx) if idx > 0 => Ok(resource.split_at(scheme_len + idx)),
        _ => Err(ClientError::InvalidResource(format!("{resource} has no host and path"))),
    }
}

fn query_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// GET arguments as query pairs. Strings are sent verbatim, null as an empty
/// value, and arrays as one pair per element.
fn query_pairs(input: &Map<String, Value>) -> Vec<(String, String)> {
    input
        .iter()
        .flat_map(|(k, v)| match v {
            Value::Array(items) => items.iter().map(|item| (k.clone(), query_value(item))).collect(),
            other => vec![(k.clone(), query_value(other))],
        })
        .collect()
}

pub struct ServiceRequest<'a> {
    pub resource: &'a str,
    pub method: HttpMethod,
    pub input: &'a Map<String, Value>,
    pub network_filter: Option<&'a str>,
}

#[derive(Debug)]
pub struct ServiceResponse {
    pub body: String,
    pub settlement: Option<SettleResponse>,
}

#[derive(Clone)]
pub struct PaidHttpClient {
    http: Client,
}

impl PaidHttpClient {
    pub fn from_config(cfg: &HttpConfig) -> Result<Self, ClientError> {
        Ok(Self { http: make_http_client_with(cfg)? })
    }

    async fn send(
        &self,
        url: &str,
        method: HttpMethod,
        input: &Map<String, Value>,
        payment: Option<&str>,
    ) -> Result<Response, ClientError> {
        let builder = match method {
            HttpMethod::Get if input.is_empty() => self.http.get(url),
            HttpMethod::Get => self.http.get(url).query(&query_pairs(input)),
            HttpMethod::Post => self.http.post(url).json(input),
        };
        let (mut builder, rid) = add_standard_headers(builder, None);
        if let Some(header) = payment {
            builder = builder
                .header(PAYMENT_HEADER, header)
                .header("Access-Control-Expose-Headers", PAYMENT_RESPONSE_HEADER);
        }
        tracing::info!(url = url, request_id = %rid, paid = payment.is_some(), "calling x402 service");
        Ok(builder.send().await?)
    }

    /// One request; on 402, pay and retry exactly once.
    pub async fn call(&self, account: &EvmAccount, req: ServiceRequest<'_>) -> Result<ServiceResponse, ClientError> {
        let (base, endpoint) = split_resource(req.resource)?;
        let url = format!("{base}{endpoint}");

        let mut resp = self.send(&url, req.method, req.input, None).await?;
        if resp.status() == StatusCode::PAYMENT_REQUIRED {
            let required: PaymentRequiredResponse = resp
                .json()
                .await
                .map_err(|e| ClientError::Decode(format!("402 body: {e}")))?;
            let filter = RequirementFilter {
                network: req.network_filter,
                scheme: Some(EXACT_SCHEME),
                max_value: None,
            };
            let requirement = select_requirement(&required.accepts, &filter)?;
            tracing::info!(
                network = %requirement.network,
                amount = %requirement.max_amount_required,
                pay_to = %requirement.pay_to,
                payer = %account.checksum_address(),
                "paying for resource"
            );
            let payload = sign_exact_payment(account, requirement, chrono::Utc::now().timestamp(), random_nonce())?;
            let header = encode_payment_header(&payload)?;

            resp = self.send(&url, req.method, req.input, Some(&header)).await?;
            if resp.status() == StatusCode::PAYMENT_REQUIRED {
                let reason = resp
                    .json::<PaymentRequiredResponse>()
                    .await
                    .ok()
                    .and_then(|r| r.error)
                    .unwrap_or_else(|| "payment required".into());
                return Err(PaymentError::Rejected(reason).into());
            }
        }

        let status = resp.status();
        let settlement = match resp.headers().get(PAYMENT_RESPONSE_HEADER) {
            Some(raw) => match raw.to_str().map_err(|e| e.to_string()).and_then(|s| {
                decode_payment_response(s).map_err(|e| e.to_string())
            }) {
                Ok(settle) => {
                    tracing::info!(transaction = %settle.transaction, "payment settled");
                    Some(settle)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable payment response header");
                    None
                }
            },
            None => {
                tracing::warn!("no payment response header found");
                None
            }
        };
        let body = resp.text().await?;
        tracing::debug!(status = status.as_u16(), body = %body, "service response");
        if !status.is_success() {
            return Err(ClientError::Status { status: status.as_u16(), body });
        }
        Ok(ServiceResponse { body, settlement })
    }
}
