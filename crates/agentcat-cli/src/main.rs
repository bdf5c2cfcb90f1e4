mod cli;
mod config;
mod output;
mod service;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::Config;
use service::CatalogService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;

    let service = CatalogService::new(config);
    service.run(cli.command).await
}
