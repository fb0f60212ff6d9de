//! Malipo - payments MCP server and CLI
//!
//! Main entry point for the Malipo binary.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use malipo::cli::{Cli, Commands, ToolsCommand};
use malipo::commands;
use malipo::config::{Config, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration; it is validated when the SDK is built from it
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let config = Config::load(config_path, &cli)?;

    match cli.command {
        Commands::Serve => {
            tracing::info!("Starting MCP server mode");
            commands::serve::run_serve(&config).await?;
            Ok(())
        }
        Commands::Tools { command } => match command {
            ToolsCommand::List { json } => {
                commands::tools::list_tools(&config, json)?;
                Ok(())
            }
            ToolsCommand::Call { name, args } => {
                commands::tools::call_tool(&config, &name, args.as_deref()).await?;
                Ok(())
            }
        },
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr; stdout carries MCP protocol messages.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "malipo=debug" } else { "malipo=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
