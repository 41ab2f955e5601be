use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;

use super::ClientError;
use crate::domain::{DiscoveryResponse, ListDiscoveryRequest};
use crate::infra::config::{AppConfig, FacilitatorConfig, HttpConfig};
use crate::infra::http::headers::{add_standard_headers, generate_request_id};
use crate::infra::runtime::limits::{make_http_client_with, retry_async};

/// Source of discoverable x402 resources.
#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    async fn list(&self, request: &ListDiscoveryRequest) -> Result<DiscoveryResponse, ClientError>;
}

#[derive(Clone)]
pub struct FacilitatorClient {
    base: String,
    http: Client,
    api_key: Option<String>,
    retries: u32,
}

impl FacilitatorClient {
    pub fn new(base: impl Into<String>) -> Result<Self, ClientError> {
        let cfg = FacilitatorConfig { url: base.into(), ..FacilitatorConfig::default() };
        Self::with_settings(&cfg, &HttpConfig::default())
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, ClientError> {
        Self::with_settings(&cfg.facilitator, &cfg.http)
    }

    fn with_settings(facilitator: &FacilitatorConfig, http: &HttpConfig) -> Result<Self, ClientError> {
        Ok(Self {
            base: facilitator.url.trim_end_matches('/').to_owned(),
            http: make_http_client_with(http)?,
            api_key: facilitator.api_key.clone(),
            retries: facilitator.retries,
        })
    }

    async fn fetch(&self, url: &str, query: &[(&str, String)], req_id: &str) -> Result<DiscoveryResponse, ClientError> {
        let (mut builder, _rid) = add_standard_headers(self.http.get(url).query(query), Some(req_id.to_owned()));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { status: status.as_u16(), body });
        }
        resp.json::<DiscoveryResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ResourceCatalog for FacilitatorClient {
    async fn list(&self, request: &ListDiscoveryRequest) -> Result<DiscoveryResponse, ClientError> {
        let url = format!("{}/discovery/resources", self.base);
        let mut query: Vec<(&str, String)> = Vec::with_capacity(3);
        if let Some(kind) = &request.kind {
            query.push(("type", kind.clone()));
        }
        query.push(("limit", request.limit.to_string()));
        query.push(("offset", request.offset.to_string()));

        tracing::debug!(endpoint = %url, limit = request.limit, offset = request.offset, "facilitator.list request");
        let req_id = generate_request_id();
        let start = Instant::now();
        let res = retry_async(self.retries, ClientError::is_retryable, |_| self.fetch(&url, &query, &req_id)).await;
        if res.is_err() {
            crate::infra::logging::log_metric("discovery_resource", "facilitator_error_total", 1.0);
        }
        let out = res?;
        crate::infra::logging::log_metric(
            "discovery_resource",
            "facilitator_latency_ms",
            start.elapsed().as_millis() as f64,
        );
        Ok(out)
    }
}
