use clap::Parser;
use std::process::ExitCode;

use x402_mcp::cli::{run_commands, Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    x402_mcp::infra::logging::init();

    let cli = Cli::parse();
    run_commands(cli.command.unwrap_or(Commands::Serve)).await
}
