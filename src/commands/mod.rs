/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `serve`: run the MCP server over stdio
- `tools`: list tools or call one directly

Both build the SDK from the loaded configuration and register the tools of
every configured provider.
*/

pub mod serve;
pub mod tools;

use crate::config::Config;
use crate::error::Result;
use crate::sdk::Malipo;
use crate::tools::ToolRegistry;

/// Builds the SDK from `config` and registers its tools.
pub fn build_registry(config: &Config) -> Result<ToolRegistry> {
    let sdk = Malipo::from_config(config)?;
    if sdk.configured_providers().is_empty() {
        tracing::warn!("No payment providers configured; no tools will be exposed");
    }
    Ok(ToolRegistry::from_sdk(&sdk))
}
