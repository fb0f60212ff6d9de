//! Malipo - payments SDK and MCP tool server
//!
//! Typed async clients for three Malawian payment providers (PayChangu,
//! pawaPay, OneKhusa) behind one HTTP layer, plus an MCP server that exposes
//! every SDK method as a tool.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `http`: HTTP client wrapper, auth strategies, error normalization and
//!   the OAuth token manager
//! - `providers`: One client per payment provider, methods grouped the way
//!   each provider groups its API
//! - `sdk`: The [`Malipo`] facade holding the configured clients
//! - `tools`: Tool executor trait, registry and per-provider tool sets
//! - `mcp`: Stdio JSON-RPC server speaking the Model Context Protocol
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`, `commands`: Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use malipo::config::PawaPayConfig;
//! use malipo::providers::pawapay::DepositRequest;
//! use malipo::{Config, Malipo};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config {
//!         pawapay: Some(PawaPayConfig::new("api-token")),
//!         ..Config::default()
//!     };
//!     let sdk = Malipo::from_config(&config)?;
//!
//!     let request: DepositRequest = serde_json::from_value(serde_json::json!({
//!         "amount": "1500",
//!         "correspondent": "AIRTEL_MWI",
//!         "msisdn": "265991234567"
//!     }))?;
//!     match sdk.require_pawapay()?.deposits().initiate(request).await {
//!         Ok(body) => println!("{}", body),
//!         Err(err) => eprintln!("deposit failed: {}", err),
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod providers;
pub mod sdk;
pub mod tools;

// Re-export commonly used types
pub use config::Config;
pub use error::{MalipoError, Result};
pub use http::{ApiResult, NetworkErrorResponse};
pub use sdk::Malipo;
