mod auth;
mod cli;
mod client;
mod config;
mod error;
mod insights;
mod mcp;
mod output;
mod provider;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // stdout belongs to the MCP client in serve mode; stay quiet.
    if !cli.is_serve() {
        output::print_banner();
    }

    info!("Starting adolens - Azure DevOps Server insights");
    cli.execute().await?;

    Ok(())
}
