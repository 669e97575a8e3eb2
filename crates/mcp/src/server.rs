//! MCP server loop (newline-delimited JSON-RPC over a byte stream).

use std::future::Future;

use serde_json::Value;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{debug, warn};

use crate::error::Result;
use crate::protocol::{
    CallToolParams, CallToolResult, Implementation, InitializeParams, InitializeResult,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, Tool,
    negotiate_version,
};

/// Maximum accepted size of a single incoming message (1MB).
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// The tool surface a [`Server`] exposes.
///
/// This is the boundary between the protocol plumbing and the code that
/// actually does something with a tool call.
pub trait ToolService: Send + Sync {
    /// Descriptors returned from `tools/list`.
    fn tools(&self) -> Vec<Tool>;

    /// Execute a `tools/call` request.
    fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> impl Future<Output = Result<CallToolResult>> + Send;
}

/// An MCP server answering requests for a single client.
pub struct Server<S> {
    info: Implementation,
    service: S,
}

impl<S: ToolService> Server<S> {
    pub fn new(info: Implementation, service: S) -> Self {
        Self { info, service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Serve over the process's stdin/stdout until stdin closes.
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve until `reader` reaches EOF.
    ///
    /// Messages are handled one at a time: the response to a request is
    /// written before the next line is read. At most `MAX_MESSAGE_SIZE + 1`
    /// bytes of a line are buffered; the rest of an oversized line is skipped.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = (&mut reader)
                .take(MAX_MESSAGE_SIZE as u64 + 1)
                .read_until(b'\n', &mut line)
                .await?;
            if read == 0 {
                debug!("client closed input");
                return Ok(());
            }

            let response = if line.len() > MAX_MESSAGE_SIZE && !line.ends_with(b"\n") {
                skip_line(&mut reader).await?;
                warn!(limit = MAX_MESSAGE_SIZE, "rejecting oversized message");
                Some(too_large(line.len()))
            } else {
                match std::str::from_utf8(&line) {
                    Ok(text) => {
                        let message = text.trim();
                        if message.is_empty() {
                            continue;
                        }
                        self.handle_message(message).await
                    }
                    Err(e) => {
                        warn!(error = %e, "message is not valid UTF-8");
                        Some(JsonRpcResponse::failure(
                            None,
                            JsonRpcError::parse_error(e.to_string()),
                        ))
                    }
                }
            };

            if let Some(response) = response {
                let json = serde_json::to_string(&response)?;
                writer.write_all(json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
    }

    /// Handle one raw message, returning the response to send (if any).
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        if message.len() > MAX_MESSAGE_SIZE {
            warn!(size = message.len(), "rejecting oversized message");
            return Some(too_large(message.len()));
        }

        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable message");
                return Some(JsonRpcResponse::failure(
                    None,
                    JsonRpcError::parse_error(e.to_string()),
                ));
            }
        };

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::failure(
                None,
                JsonRpcError::invalid_request(e.to_string()),
            )),
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return request.id.map(|id| {
                JsonRpcResponse::failure(
                    Some(id),
                    JsonRpcError::invalid_request("jsonrpc must be \"2.0\""),
                )
            });
        }

        debug!(method = %request.method, "handling message");
        let outcome = self.dispatch(&request).await;

        if request.is_notification() {
            if let Err(e) = outcome {
                debug!(method = %request.method, error = %e, "notification failed");
            }
            return None;
        }

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => JsonRpcResponse::failure(request.id, error),
        })
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> std::result::Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => {
                let params: InitializeParams = request.params_as()?;
                if let Some(client) = &params.client_info {
                    debug!(client = %client.name, version = %client.version, "client connected");
                }
                to_value(InitializeResult {
                    protocol_version: negotiate_version(&params.protocol_version).to_string(),
                    capabilities: ServerCapabilities::default(),
                    server_info: self.info.clone(),
                })
            }
            "ping" => Ok(Value::Object(Default::default())),
            "tools/list" => to_value(ListToolsResult {
                tools: self.service.tools(),
            }),
            "tools/call" => {
                let params: CallToolParams = request.params_as()?;
                let result = self
                    .service
                    .call_tool(&params.name, params.arguments)
                    .await
                    .map_err(|e| e.to_rpc_error())?;
                to_value(result)
            }
            method if method.starts_with("notifications/") => Ok(Value::Null),
            method => Err(JsonRpcError::method_not_found(method)),
        }
    }
}

fn too_large(size: usize) -> JsonRpcResponse {
    JsonRpcResponse::failure(
        None,
        JsonRpcError::invalid_request(format!(
            "message too large: at least {size} bytes (max {MAX_MESSAGE_SIZE})"
        )),
    )
}

/// Discard input up to and including the next newline.
async fn skip_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

fn to_value(value: impl serde::Serialize) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal(e.to_string()))
}
