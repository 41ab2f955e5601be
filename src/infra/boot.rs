use std::net::SocketAddr;

use crate::infra::config::{AppConfig, Config};
use crate::infra::mcp::X402Svc;
use crate::tools::{build_registry, ToolRegistry};

/// Build the registry from configuration and serve in the configured mode.
pub async fn run_server() -> anyhow::Result<()> {
    let cfg = Config::from_env();
    cfg.validate()?;
    let app_cfg = AppConfig::load()?;
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        disable_rpc_shim = cfg.disable_rpc_shim,
        facilitator = %app_cfg.facilitator.url,
        "BOOT x402-mcp"
    );
    let registry = build_registry(&app_cfg)?;
    serve(&cfg, registry).await
}

pub async fn serve(cfg: &Config, registry: ToolRegistry) -> anyhow::Result<()> {
    if cfg.mode == "stdio" {
        crate::infra::runtime::mcp_transport::serve_stdio(X402Svc::new(registry))
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let app = if cfg.disable_rpc_shim {
        crate::infra::http_app::build_app(registry)
    } else {
        crate::infra::http_app::build_app_with_rpc_shim(registry)
    };

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
