//! MCP (Model Context Protocol) server for Malipo
//!
//! Exposes every configured SDK method as an MCP tool over stdio.
//!
//! The implementation targets protocol revision **2025-11-25** with
//! **2025-03-26** as a backwards-compatibility fallback.
//!
//! # Module Layout
//!
//! - `types`  -- JSON-RPC primitives and the MCP types the server speaks
//! - `server` -- Newline-delimited JSON-RPC loop and method dispatch

pub mod server;
pub mod types;

pub use server::McpServer;
