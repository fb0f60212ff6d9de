//! `malipo tools list` and `malipo tools call`

use prettytable::{row, Table};
use serde_json::Value;

use crate::commands::build_registry;
use crate::config::Config;
use crate::error::{MalipoError, Result};
use crate::mcp::types::McpTool;

/// Prints the tools of every configured provider.
///
/// With `json`, prints the full definitions (including input schemas) as a
/// JSON array; otherwise prints a table.
pub fn list_tools(config: &Config, json: bool) -> Result<()> {
    let registry = build_registry(config)?;
    let definitions = registry.all_definitions();

    if json {
        let text =
            serde_json::to_string_pretty(&definitions).map_err(MalipoError::Serialization)?;
        println!("{}", text);
        return Ok(());
    }

    if definitions.is_empty() {
        println!("No tools available. Configure at least one provider.");
        return Ok(());
    }

    println!("\nAvailable tools ({}):\n", definitions.len());
    tools_table(&definitions).printstd();
    println!();
    Ok(())
}

/// Calls `name` with `args` and prints the MCP result envelope.
///
/// # Errors
///
/// Fails on invalid JSON arguments, an unknown tool, or when the tool
/// reports a provider error (after printing it).
pub async fn call_tool(config: &Config, name: &str, args: Option<&str>) -> Result<()> {
    let registry = build_registry(config)?;
    let args = parse_tool_args(args)?;

    tracing::info!(tool = %name, "Calling tool");
    let result = registry.call(name, args).await?;
    let is_error = result.is_error;
    let envelope = result.into_call_response();
    let text = serde_json::to_string_pretty(&envelope).map_err(MalipoError::Serialization)?;
    println!("{}", text);

    if is_error {
        anyhow::bail!("Tool {} returned an error", name);
    }
    Ok(())
}

/// Parses `--args`; absent means an empty object.
pub fn parse_tool_args(args: Option<&str>) -> Result<Value> {
    let Some(raw) = args else {
        return Ok(Value::Object(Default::default()));
    };
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| MalipoError::InvalidArguments(format!("--args is not valid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(
            MalipoError::InvalidArguments("--args must be a JSON object".to_string()).into(),
        );
    }
    Ok(value)
}

fn tools_table(definitions: &[McpTool]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Tool", "Access", "Description"]);
    for tool in definitions {
        let access = match tool.annotations.as_ref().and_then(|a| a.read_only_hint) {
            Some(true) => "read-only",
            Some(false) => "mutating",
            None => "-",
        };
        table.add_row(row![
            tool.name,
            access,
            tool.description.as_deref().unwrap_or("")
        ]);
    }
    table
}
