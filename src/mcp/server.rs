//! MCP Server
//!
//! Newline-delimited JSON-RPC messages over stdio.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use wordsim_core::WordSimSearcher;

use super::handlers::ToolHandlers;
use super::protocol::*;
use super::tools::get_tools;

pub const SERVER_NAME: &str = "WSServer";

pub struct McpServer {
    handlers: ToolHandlers,
}

fn preview(line: &str) -> String {
    match line.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}

impl McpServer {
    pub fn new(searcher: Arc<dyn WordSimSearcher>) -> Self {
        Self {
            handlers: ToolHandlers::new(searcher),
        }
    }

    /// Serve stdin/stdout until stdin closes
    pub async fn run(&self) -> anyhow::Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server started, waiting for messages");
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            debug!(message = %preview(&line), "<-");

            let Some(response) = self.handle(&line).await else {
                continue;
            };
            let out = serde_json::to_string(&response)?;
            debug!(message = %preview(&out), "->");

            writer.write_all(out.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        info!("MCP server shutting down");
        Ok(())
    }

    /// Handle a single JSON-RPC message. Notifications get no response.
    pub async fn handle(&self, msg: &str) -> Option<JsonRpcResponse> {
        let req: JsonRpcRequest = match serde_json::from_str(msg) {
            Ok(r) => r,
            Err(e) => return Some(JsonRpcResponse::error(None, PARSE_ERROR, e.to_string())),
        };
        if req.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                req.id,
                INVALID_REQUEST,
                "unsupported jsonrpc version",
            ));
        }
        if req.is_notification() {
            debug!(method = %req.method, "notification");
            return None;
        }

        let id = req.id.clone();
        let result = match req.method.as_str() {
            "initialize" => serde_json::to_value(InitializeResult {
                protocol_version: PROTOCOL_VERSION.into(),
                capabilities: ServerCapabilities {
                    tools: ToolsCapability {
                        list_changed: false,
                    },
                },
                server_info: ServerInfo {
                    name: SERVER_NAME.into(),
                    version: env!("CARGO_PKG_VERSION").into(),
                },
            }),

            "ping" => Ok(Value::Object(Default::default())),

            "tools/list" => serde_json::to_value(ToolsListResult { tools: get_tools() }),

            "tools/call" => {
                let params: ToolCallParams = match serde_json::from_value(req.params) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string()))
                    }
                };
                let result = self.handlers.handle(&params.name, params.arguments).await;
                serde_json::to_value(result)
            }

            other => {
                warn!(method = other, "unknown method");
                return Some(JsonRpcResponse::error(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Unknown method: {}", other),
                ));
            }
        };

        Some(match result {
            Ok(v) => JsonRpcResponse::success(id, v),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {}", e)),
        })
    }
}
