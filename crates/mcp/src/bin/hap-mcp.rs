// MCP server entry point. Credentials come from the environment; stdout is
// reserved for the protocol, so logs go to stderr.

use anyhow::{Context, Result};
use hap_api::{ApiConfig, HapClient};
use hap_mcp::{register_all, McpServer, ToolRegistry};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ApiConfig::from_env().context("reading HAP credentials from the environment")?;
    let client = Arc::new(HapClient::new(config)?);

    let mut registry = ToolRegistry::new();
    register_all(&mut registry, client);

    McpServer::new(registry).start().await
}
