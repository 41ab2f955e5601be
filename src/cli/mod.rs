use clap::{Parser, Subcommand};
use serde_json::json;
use std::process::ExitCode;

use crate::infra::config::{AppConfig, Config};

#[derive(Parser)]
#[command(name = "x402-mcp")]
#[command(about = "MCP server for discovering and paying x402 resources")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server (default)
    Serve,
    /// Health check a running HTTP server
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Show service status
    Status {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting service
        #[arg(long)]
        validate: bool,
    },
    /// Print the tool listing
    Tools,
    /// Query the Bazaar through the discovery_resource tool
    Discover {
        /// Resource type, e.g. http
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
    },
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Serve => match crate::infra::boot::run_server().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "server exited with error");
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Status { url } => match show_status(&url).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Status check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate: _ } => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Tools => match list_tools() {
            Ok(out) => {
                println!("{out}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Cannot build tool registry: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Discover { kind, limit, offset } => match discover(kind, limit, offset).await {
            Ok(out) => {
                println!("{out}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Discovery failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<(), Box<dyn std::error::Error>> {
    Config::from_env().validate()?;
    AppConfig::load()?;
    Ok(())
}

async fn show_status(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();

    let health_response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await?;

    println!(
        "🏥 Health Status: {}",
        if health_response.status().is_success() {
            "✅ Healthy"
        } else {
            "❌ Unhealthy"
        }
    );

    let tools_response = client
        .post(format!("{}/rpc", url))
        .json(&json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": {} }))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await;

    match tools_response {
        Ok(resp) if resp.status().is_success() => {
            let count = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v["result"]["tools"].as_array().map(Vec::len));
            match count {
                Some(n) => println!("🔧 Tools: ✅ {n} available"),
                None => println!("🔧 Tools: ✅ Available"),
            }
        }
        Ok(resp) => println!("🔧 Tools: ❌ HTTP {}", resp.status()),
        Err(_) => println!("🔧 Tools: ❌ Unavailable"),
    }

    let cfg = Config::from_env();
    let app_cfg = AppConfig::load()?;
    println!("\n📋 Configuration:");
    println!("  Mode: {}", cfg.mode);
    println!("  Port: {}", cfg.port);
    println!("  RPC shim: {}", if cfg.disable_rpc_shim { "disabled" } else { "enabled" });
    println!("  Facilitator: {}", app_cfg.facilitator.url);
    println!(
        "  Payment networks: {}",
        crate::domain::network::supported_networks().collect::<Vec<_>>().join(", ")
    );
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );

    Ok(())
}

fn list_tools() -> Result<String, Box<dyn std::error::Error>> {
    let registry = crate::tools::build_registry(&AppConfig::load()?)?;
    let tools: Vec<_> = registry
        .list()
        .into_iter()
        .map(|t| json!({ "name": t.name, "description": t.description, "inputSchema": t.input_schema }))
        .collect();
    Ok(serde_json::to_string_pretty(&tools)?)
}

async fn discover(kind: Option<String>, limit: u32, offset: u32) -> Result<String, Box<dyn std::error::Error>> {
    let registry = crate::tools::build_registry(&AppConfig::load()?)?;
    let mut args = json!({ "limit": limit, "offset": offset });
    if let Some(kind) = kind {
        args["type"] = json!(kind);
    }
    let out = registry.dispatch("discovery_resource", &args).await?;
    Ok(serde_json::to_string_pretty(&out)?)
}
