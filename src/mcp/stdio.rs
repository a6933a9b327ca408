use log::{info, warn};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::jsonrpc::{json_rpc_error, JsonRpcRequest, INVALID_REQUEST, PARSE_ERROR};
use super::McpServer;
use crate::error::Result;

/// Serve MCP on the process's stdin/stdout until stdin closes.
pub async fn run_stdio(server: &McpServer) -> Result<()> {
    info!("MCP server listening on stdio");
    serve(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Newline-delimited JSON-RPC loop over any reader/writer pair.
///
/// Each line is one message; each response is one line. Blank lines are
/// skipped. A line that is not JSON gets a parse error with a null id; JSON
/// that is not a request gets an invalid-request error.
pub async fn serve<R, W>(server: &McpServer, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(raw) {
            Ok(message) => dispatch(server, message).await,
            Err(e) => {
                warn!("Unparsable MCP message: {e}");
                Some(json_rpc_error(None, PARSE_ERROR, &format!("Parse error: {e}")))
            }
        };

        if let Some(response) = response {
            let mut bytes = serde_json::to_vec(&response)?;
            bytes.push(b'\n');
            writer.write_all(&bytes).await?;
            writer.flush().await?;
        }
    }

    info!("stdin closed, MCP server stopping");
    Ok(())
}

async fn dispatch(server: &McpServer, message: Value) -> Option<Value> {
    let id = message.get("id").filter(|id| !id.is_null()).cloned();
    match serde_json::from_value::<JsonRpcRequest>(message) {
        Ok(request) => server.handle(request).await,
        Err(e) => {
            warn!("Malformed MCP request: {e}");
            Some(json_rpc_error(id, INVALID_REQUEST, &format!("Invalid request: {e}")))
        }
    }
}
