pub mod call_service;
pub mod discovery;
pub mod echo;
pub mod health;
pub mod registry;

use std::sync::Arc;

use thiserror::Error;

use crate::clients::facilitator::{FacilitatorClient, ResourceCatalog};
use crate::clients::paid_http::PaidHttpClient;
use crate::clients::ClientError;
use crate::core::error::RegistryError;
use crate::infra::config::AppConfig;

pub use registry::{RegistryBuilder, ToolMeta, ToolRegistry};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("cannot build HTTP client: {0}")]
    Client(#[from] ClientError),
}

/// The server's fixed tool set, wired to the configured facilitator.
pub fn build_registry(cfg: &AppConfig) -> Result<ToolRegistry, BuildError> {
    let catalog = Arc::new(FacilitatorClient::from_config(cfg)?);
    build_registry_with(cfg, catalog)
}

pub fn build_registry_with(
    cfg: &AppConfig,
    catalog: Arc<dyn ResourceCatalog>,
) -> Result<ToolRegistry, BuildError> {
    let paid = PaidHttpClient::from_config(&cfg.http)?;
    let registry = ToolRegistry::builder()
        .register(health::HealthCheckTool)?
        .register(echo::EchoTool)?
        .register(discovery::DiscoveryResourceTool::new(catalog))?
        .register(call_service::CallServiceTool::new(paid))?
        .build();
    tracing::info!(tools = ?registry.names(), "tool registry sealed");
    Ok(registry)
}
