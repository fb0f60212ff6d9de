//! Command-line interface definition for Malipo
//!
//! This module defines the CLI structure using clap's derive API: an MCP
//! server command and helpers for listing and calling tools directly.

use clap::{Parser, Subcommand};

use crate::config::{Environment, DEFAULT_CONFIG_PATH};

/// Malipo - payments SDK and MCP tool server
///
/// Exposes PayChangu, pawaPay and OneKhusa operations as MCP tools.
#[derive(Parser, Debug, Clone)]
#[command(name = "malipo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "MALIPO_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the target environment for every provider
    #[arg(short, long, value_enum)]
    pub environment: Option<Environment>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Malipo
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the MCP server on stdin/stdout
    Serve,

    /// Inspect and invoke tools without an MCP client
    Tools {
        /// Tools subcommand
        #[command(subcommand)]
        command: ToolsCommand,
    },
}

/// Tool subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ToolsCommand {
    /// List the tools of every configured provider
    List {
        /// Print full tool definitions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call one tool and print its result envelope
    Call {
        /// Tool name, e.g. pawapay_deposit_status
        name: String,

        /// Tool arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
