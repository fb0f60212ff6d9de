//! Error types for Malipo
//!
//! This module defines the ambient error type used by configuration loading,
//! the command-line interface, and the MCP server, using `thiserror` for
//! ergonomic error handling.
//!
//! Provider API failures do not use this type. They are reported as
//! [`crate::http::NetworkErrorResponse`] values inside an
//! [`crate::http::ApiResult`], so callers always see one failure shape.

use thiserror::Error;

/// Main error type for Malipo operations
///
/// Covers everything that can go wrong outside a provider API call:
/// configuration, credentials, tool dispatch, and MCP framing.
#[derive(Error, Debug)]
pub enum MalipoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing credentials for a provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// A provider was used without being configured
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// A tool name that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments that do not match the tool's input schema
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// MCP protocol errors (framing, unexpected messages)
    #[error("MCP error: {0}")]
    Mcp(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Malipo operations
///
/// Uses `anyhow::Error` as the error type, allowing rich error context and
/// easy propagation. SDK calls use [`crate::http::ApiResult`] instead.
pub type Result<T> = anyhow::Result<T>;
