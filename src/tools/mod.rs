//! Tools module for Malipo
//!
//! Every SDK method is exposed as one MCP tool named
//! `<provider>_<operation>`. This module defines the executor trait, the
//! uniform result envelope, and the registry the MCP server dispatches
//! through. Provider tool sets live in the submodules.

/// Builds an [`SdkTool`] whose handler owns a clone of `$client`.
///
/// `|$c, $args: $ty| body` binds the cloned client and the decoded
/// arguments inside an `async move` block.
macro_rules! sdk_tool {
    ($client:expr, $name:expr, $desc:expr, |$c:ident, $args:tt: $ty:ty| $body:expr) => {{
        let client = std::sync::Arc::clone($client);
        $crate::tools::SdkTool::new($name, $desc, move |$args: $ty| {
            let $c = std::sync::Arc::clone(&client);
            async move { $body }
        })
    }};
}

pub mod args;
pub mod onekhusa;
pub mod pawapay;
pub mod paychangu;
pub mod sdk_tool;

pub use sdk_tool::SdkTool;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{MalipoError, Result};
use crate::http::NetworkErrorResponse;
use crate::mcp::types::{CallToolResponse, McpTool, ToolResponseContent};
use crate::sdk::Malipo;

/// Outcome of running a tool whose arguments were valid.
///
/// A provider failure is still a tool result (with `is_error` set), not a
/// protocol error: the caller gets the normalized error body to act on.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// `true` when the underlying operation failed
    pub is_error: bool,
    /// Result value, or the serialized `NetworkErrorResponse`
    pub value: Value,
}

impl ToolResult {
    /// A successful result
    pub fn success(value: Value) -> Self {
        Self {
            is_error: false,
            value,
        }
    }

    /// A failed result carrying the normalized error
    pub fn error(error: &NetworkErrorResponse) -> Self {
        let value = serde_json::to_value(error).unwrap_or_else(|_| {
            serde_json::json!({
                "errorMessage": error.error_message,
                "statusCode": error.status_code,
                "errorObject": error.error_object,
            })
        });
        Self {
            is_error: true,
            value,
        }
    }

    /// Converts to the MCP `tools/call` result envelope
    ///
    /// The value appears twice: pretty-printed as text content, and as
    /// `structuredContent`.
    pub fn into_call_response(self) -> CallToolResponse {
        let text = serde_json::to_string_pretty(&self.value).unwrap_or_else(|_| self.value.to_string());
        CallToolResponse {
            content: vec![ToolResponseContent::Text { text }],
            structured_content: Some(self.value),
            is_error: self.is_error,
        }
    }
}

/// Tool executor trait for implementing tool execution logic
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use malipo::error::Result;
/// use malipo::mcp::types::McpTool;
/// use malipo::tools::{ToolExecutor, ToolResult};
/// use serde_json::Value;
///
/// struct Echo;
///
/// #[async_trait]
/// impl ToolExecutor for Echo {
///     fn tool_definition(&self) -> McpTool {
///         McpTool {
///             name: "echo".to_string(),
///             description: Some("Returns its arguments".to_string()),
///             input_schema: serde_json::json!({"type": "object"}),
///             annotations: None,
///         }
///     }
///
///     async fn execute(&self, args: Value) -> Result<ToolResult> {
///         Ok(ToolResult::success(args))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let mut registry = malipo::tools::ToolRegistry::new();
/// registry.register(std::sync::Arc::new(Echo));
/// let result = registry.call("echo", serde_json::json!({"x": 1})).await.unwrap();
/// assert!(!result.is_error);
/// assert_eq!(result.value["x"], 1);
/// # });
/// ```
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Returns the tool's MCP definition
    fn tool_definition(&self) -> McpTool;

    /// Executes the tool with the given arguments
    ///
    /// # Errors
    ///
    /// Returns [`MalipoError::InvalidArguments`] when `args` does not match
    /// the input schema. Provider failures are reported inside `Ok`.
    async fn execute(&self, args: Value) -> Result<ToolResult>;
}

/// Tool registry for managing available tools
///
/// Tools are kept sorted by name so listings are stable.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn ToolExecutor>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with the tools of every provider configured in `sdk`
    pub fn from_sdk(sdk: &Malipo) -> Self {
        let mut registry = Self::new();
        if let Some(client) = sdk.paychangu() {
            paychangu::register(&mut registry, client);
        }
        if let Some(client) = sdk.pawapay() {
            pawapay::register(&mut registry, client);
        }
        if let Some(client) = sdk.onekhusa() {
            onekhusa::register(&mut registry, client);
        }
        tracing::debug!(count = registry.len(), "Registered SDK tools");
        registry
    }

    /// Register a tool executor under its definition's name
    ///
    /// A later registration with the same name replaces the earlier one.
    pub fn register(&mut self, executor: Arc<dyn ToolExecutor>) {
        let name = executor.tool_definition().name;
        self.tools.insert(name, executor);
    }

    /// Get a tool executor by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolExecutor>> {
        self.tools.get(name).cloned()
    }

    /// Definitions of all registered tools, sorted by name
    pub fn all_definitions(&self) -> Vec<McpTool> {
        self.tools.values().map(|t| t.tool_definition()).collect()
    }

    /// Names of all registered tools, sorted
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Runs the named tool
    ///
    /// # Errors
    ///
    /// Returns [`MalipoError::UnknownTool`] for an unregistered name and
    /// [`MalipoError::InvalidArguments`] for arguments the tool rejects.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| MalipoError::UnknownTool(name.to_string()))?;
        tool.execute(args).await
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct MockTool;

    #[async_trait]
    impl ToolExecutor for MockTool {
        fn tool_definition(&self) -> McpTool {
            McpTool {
                name: "mock_tool".to_string(),
                description: Some("A mock tool".to_string()),
                input_schema: json!({"type": "object", "properties": {}}),
                annotations: None,
            }
        }

        async fn execute(&self, args: Value) -> Result<ToolResult> {
            Ok(ToolResult::success(args))
        }
    }

    #[test]
    fn test_tool_registry_new() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_tool_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("mock_tool").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.names(), vec!["mock_tool"]);
    }

    #[tokio::test]
    async fn test_tool_registry_call() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool));
        let result = registry.call("mock_tool", json!({"a": 1})).await.unwrap();
        assert_eq!(result, ToolResult::success(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_tool_registry_call_unknown() {
        let registry = ToolRegistry::new();
        let err = registry.call("nope", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: nope");
    }

    #[test]
    fn test_success_envelope() {
        let response = ToolResult::success(json!({"id": "d-1"})).into_call_response();
        assert!(!response.is_error);
        assert_eq!(response.structured_content, Some(json!({"id": "d-1"})));
        let ToolResponseContent::Text { text } = &response.content[0];
        assert_eq!(serde_json::from_str::<Value>(text).unwrap(), json!({"id": "d-1"}));
    }

    #[test]
    fn test_error_envelope_carries_network_error() {
        let err = NetworkErrorResponse::from_status(400, r#"{"message":"bad request"}"#);
        let response = ToolResult::error(&err).into_call_response();
        assert!(response.is_error);
        assert_eq!(
            response.structured_content,
            Some(json!({
                "errorMessage": "bad request",
                "statusCode": 400,
                "errorObject": "{\"message\":\"bad request\"}"
            }))
        );
    }

    #[test]
    fn test_registry_from_empty_sdk() {
        let registry = ToolRegistry::from_sdk(&Malipo::default());
        assert!(registry.is_empty());
    }
}
