//! `malipo serve`

use crate::commands::build_registry;
use crate::config::Config;
use crate::error::Result;
use crate::mcp::McpServer;

/// Runs the MCP server on stdin/stdout until the client closes stdin.
///
/// # Examples
///
/// ```no_run
/// use malipo::commands::serve::run_serve;
/// use malipo::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// run_serve(&Config::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_serve(config: &Config) -> Result<()> {
    let registry = build_registry(config)?;
    let server = McpServer::new(registry);
    tracing::info!(
        server = %server.server_info().name,
        version = %server.server_info().version,
        environment = %config.environment,
        "Starting MCP server"
    );
    server.serve_stdio().await?;
    tracing::info!("MCP server stopped");
    Ok(())
}
