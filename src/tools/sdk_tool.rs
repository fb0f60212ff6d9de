//! Adapter from one SDK method to one MCP tool
//!
//! [`SdkTool`] owns the tool's definition, generated once from the argument
//! type's JSON schema, and a handler closure that calls the SDK. Arguments
//! are decoded with `serde_json::from_value`; the SDK's `ApiResult` is
//! mapped onto [`ToolResult`].

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{MalipoError, Result};
use crate::http::{ApiResult, NetworkErrorResponse};
use crate::mcp::types::{McpTool, ToolAnnotations};
use crate::tools::{ToolExecutor, ToolResult};

/// Returns the JSON schema of `A` as an MCP input schema.
///
/// The `$schema` and `title` keys are dropped; MCP clients only need the
/// object schema itself.
pub fn input_schema<A: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(A);
    let mut value = serde_json::to_value(schema).unwrap_or_else(|_| empty_object_schema());
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    if value.get("type").is_none() {
        return empty_object_schema();
    }
    value
}

fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// A tool that decodes arguments of type `A` and runs `handler`.
///
/// # Examples
///
/// ```
/// use malipo::http::ApiResult;
/// use malipo::tools::{SdkTool, ToolExecutor};
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct Args {
///     /// Who to greet
///     name: String,
/// }
///
/// let tool = SdkTool::new("demo_greet", "Greets someone", |args: Args| async move {
///     ApiResult::Ok(format!("hello {}", args.name))
/// });
/// assert_eq!(tool.tool_definition().name, "demo_greet");
/// ```
pub struct SdkTool<A, F> {
    definition: McpTool,
    handler: F,
    _args: PhantomData<fn(A)>,
}

impl<A, F> SdkTool<A, F>
where
    A: JsonSchema,
{
    /// Creates a tool named `name` backed by `handler`.
    pub fn new(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self {
        Self {
            definition: McpTool {
                name: name.into(),
                description: Some(description.into()),
                input_schema: input_schema::<A>(),
                annotations: None,
            },
            handler,
            _args: PhantomData,
        }
    }

    /// Marks the tool as read-only and idempotent.
    pub fn read_only(mut self) -> Self {
        self.definition.annotations = Some(ToolAnnotations {
            read_only_hint: Some(true),
            idempotent_hint: Some(true),
            open_world_hint: Some(true),
            ..Default::default()
        });
        self
    }

    /// Marks the tool as moving money or changing provider state.
    pub fn mutating(mut self) -> Self {
        self.definition.annotations = Some(ToolAnnotations {
            read_only_hint: Some(false),
            destructive_hint: Some(true),
            open_world_hint: Some(true),
            ..Default::default()
        });
        self
    }
}

#[async_trait]
impl<A, F, Fut, T> ToolExecutor for SdkTool<A, F>
where
    A: DeserializeOwned + JsonSchema + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
    T: Serialize + Send + 'static,
{
    fn tool_definition(&self) -> McpTool {
        self.definition.clone()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        // Tools without parameters may be called with no arguments at all.
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        let args: A = serde_json::from_value(args).map_err(|e| {
            MalipoError::InvalidArguments(format!("{}: {}", self.definition.name, e))
        })?;

        tracing::debug!(tool = %self.definition.name, "Executing tool");
        let result = match (self.handler)(args).await {
            Ok(value) => match serde_json::to_value(value) {
                Ok(value) => ToolResult::success(value),
                Err(e) => ToolResult::error(&NetworkErrorResponse::local(format!(
                    "Failed to serialize result: {}",
                    e
                ))),
            },
            Err(err) => ToolResult::error(&err),
        };

        if result.is_error {
            tracing::warn!(tool = %self.definition.name, "Tool call returned a provider error");
        }
        Ok(result)
    }
}
