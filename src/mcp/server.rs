//! Stdio MCP server
//!
//! Reads newline-delimited JSON-RPC 2.0 messages, runs each request on its
//! own task, and funnels responses through a single writer task so lines
//! never interleave. Notifications are never answered.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::error::{MalipoError, Result};
use crate::mcp::types::{
    negotiate_protocol_version, CallToolParams, Implementation, InitializeParams,
    InitializeResponse, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListToolsResponse,
    ServerCapabilities, METHOD_INITIALIZE, METHOD_INITIALIZED, METHOD_PING, METHOD_TOOLS_CALL,
    METHOD_TOOLS_LIST,
};
use crate::tools::ToolRegistry;

const SERVER_NAME: &str = "malipo";

const INSTRUCTIONS: &str = "Payment tools for PayChangu, pawaPay and OneKhusa. \
Tool names are <provider>_<operation>. Provider failures come back as tool \
results with isError set and a body of {errorMessage, statusCode, errorObject}.";

/// MCP server exposing a [`ToolRegistry`].
///
/// # Examples
///
/// ```no_run
/// use malipo::mcp::McpServer;
/// use malipo::tools::ToolRegistry;
///
/// # async fn example() -> anyhow::Result<()> {
/// let server = McpServer::new(ToolRegistry::new());
/// server.serve_stdio().await?;
/// # Ok(())
/// # }
/// ```
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    info: Implementation,
}

impl McpServer {
    /// Creates a server over `registry`.
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some("Malawian payment provider tools".to_string()),
            },
        }
    }

    /// The implementation info sent in `initialize` responses.
    pub fn server_info(&self) -> &Implementation {
        &self.info
    }

    /// The tools this server exposes.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serves on the process's stdin and stdout until stdin closes.
    pub async fn serve_stdio(self) -> Result<()> {
        Arc::new(self)
            .serve(tokio::io::stdin(), tokio::io::stdout())
            .await
    }

    /// Serves messages read from `reader`, writing replies to `writer`.
    ///
    /// Returns after `reader` reaches end of input and every in-flight
    /// request has been answered.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        tracing::info!(tools = self.registry.len(), "MCP server listening on stdio");

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await.map_err(MalipoError::Io)? {
            if line.trim().is_empty() {
                continue;
            }
            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                let Some(response) = server.handle_message(&line).await else {
                    return;
                };
                match serde_json::to_string(&response) {
                    Ok(text) => {
                        if tx.send(text).is_err() {
                            tracing::warn!("Response dropped: writer has stopped");
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to serialize response"),
                }
            });
        }

        tracing::info!("Input closed, draining in-flight requests");
        drop(tx);
        writer_task
            .await
            .map_err(|e| MalipoError::Mcp(format!("writer task failed: {}", e)))?
            .map_err(MalipoError::Io)?;
        Ok(())
    }

    /// Handles one raw input line.
    ///
    /// Returns `None` for notifications, which get no reply.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e),
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request(e)));
            }
        };

        if request.jsonrpc != "2.0" {
            let id = request.id.unwrap_or(Value::Null);
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!(
                    "unsupported jsonrpc version '{}'",
                    request.jsonrpc
                )),
            ));
        }

        if request.is_notification() {
            if request.method == METHOD_INITIALIZED {
                tracing::debug!("Client initialized");
            } else {
                tracing::debug!(method = %request.method, "Ignoring notification");
            }
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        tracing::debug!(method = %request.method, id = %id, "Handling request");
        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        };
        Some(response)
    }

    async fn dispatch(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> std::result::Result<Value, JsonRpcError> {
        match method {
            METHOD_INITIALIZE => self.initialize(params),
            METHOD_PING => Ok(serde_json::json!({})),
            METHOD_TOOLS_LIST => to_result(&ListToolsResponse {
                tools: self.registry.all_definitions(),
            }),
            METHOD_TOOLS_CALL => self.call_tool(params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }

    fn initialize(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: InitializeParams = match params {
            Some(params) => serde_json::from_value(params).map_err(JsonRpcError::invalid_params)?,
            None => InitializeParams::default(),
        };
        let version = negotiate_protocol_version(&params.protocol_version);
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = %client.version,
                protocol = version,
                "MCP session initialized"
            );
        }
        to_result(&InitializeResponse {
            protocol_version: version.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(serde_json::json!({ "listChanged": false })),
            },
            server_info: self.info.clone(),
            instructions: Some(INSTRUCTIONS.to_string()),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("missing params"))
            .and_then(|p| serde_json::from_value(p).map_err(JsonRpcError::invalid_params))?;

        let args = params.arguments.unwrap_or(Value::Null);
        match self.registry.call(&params.name, args).await {
            Ok(result) => to_result(&result.into_call_response()),
            Err(err) => {
                let caller_error = matches!(
                    err.downcast_ref::<MalipoError>(),
                    Some(MalipoError::UnknownTool(_) | MalipoError::InvalidArguments(_))
                );
                if caller_error {
                    tracing::debug!(tool = %params.name, error = %err, "Rejected tool call");
                    Err(JsonRpcError::invalid_params(err))
                } else {
                    tracing::error!(tool = %params.name, error = %err, "Tool failed");
                    Err(JsonRpcError::internal(err))
                }
            }
        }
    }
}

fn to_result<T: serde::Serialize>(value: &T) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(JsonRpcError::internal)
}
