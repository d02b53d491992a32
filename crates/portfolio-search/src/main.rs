mod config;
mod error;
mod server;
mod update;

use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use server::PortfolioSearchServer;
use update::ReloadService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting portfolio-search MCP server");

    let config = Config::from_env()?;
    info!(
        content_path = %config.content_path,
        synonyms_override = config.synonyms_path.is_some(),
        "configuration loaded"
    );

    // Build the registry once; reload_portfolio replaces it later if the file changes
    let reload_service = ReloadService::new(config);
    let portfolio = reload_service.load()?;

    let server = PortfolioSearchServer::new(portfolio, reload_service);

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
