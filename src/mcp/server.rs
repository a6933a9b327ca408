use log::{debug, warn};
use serde_json::{json, Value};

use super::jsonrpc::{
    json_rpc_error, json_rpc_response, JsonRpcRequest, INVALID_PARAMS, METHOD_NOT_FOUND,
};
use super::tools::{call_tool, tool_descriptors, ToolCallError};
use super::{MCP_VERSION, SERVER_NAME};
use crate::provider::AdoProvider;

pub struct McpServer {
    provider: AdoProvider,
    default_limit: usize,
}

impl McpServer {
    pub fn new(provider: AdoProvider, default_limit: usize) -> Self {
        Self {
            provider,
            default_limit,
        }
    }

    /// Handle one JSON-RPC message; `None` means nothing is written back.
    pub(crate) async fn handle(&self, request: JsonRpcRequest) -> Option<Value> {
        debug!("MCP request: {}", request.method);
        if !request.expects_response() {
            return None;
        }

        match request.method.as_str() {
            "initialize" => {
                // Echo the client's protocol version; fall back to ours.
                let protocol_version = request
                    .params
                    .as_ref()
                    .and_then(|v| v.get("protocolVersion"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(MCP_VERSION)
                    .to_string();

                Some(json_rpc_response(
                    request.id,
                    json!({
                        "protocolVersion": protocol_version,
                        "serverInfo": {
                            "name": SERVER_NAME,
                            "version": env!("CARGO_PKG_VERSION")
                        },
                        "capabilities": {
                            "tools": {}
                        }
                    }),
                ))
            }
            "notifications/initialized" | "initialized" => None,
            "ping" => Some(json_rpc_response(request.id, json!({}))),
            "tools/list" => Some(json_rpc_response(
                request.id,
                json!({ "tools": tool_descriptors(self.default_limit) }),
            )),
            "tools/call" => Some(self.handle_tool_call(request.id, request.params).await),
            _ => Some(json_rpc_error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            )),
        }
    }

    async fn handle_tool_call(&self, id: Option<Value>, params: Option<Value>) -> Value {
        let Some(Value::Object(mut params)) = params else {
            return json_rpc_error(id, INVALID_PARAMS, "params must be an object");
        };

        let name = match params.remove("name") {
            Some(Value::String(name)) => name,
            _ => return json_rpc_error(id, INVALID_PARAMS, "params.name must be a string"),
        };
        let arguments = params.remove("arguments").unwrap_or(Value::Null);

        match call_tool(&self.provider, &name, arguments, self.default_limit).await {
            Ok(value) => {
                let text =
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                json_rpc_response(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": text }],
                        "isError": false
                    }),
                )
            }
            Err(ToolCallError::Failed(e)) => {
                warn!("Tool {name} failed: {e}");
                json_rpc_response(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": e.to_string() }],
                        "isError": true
                    }),
                )
            }
            Err(e) => json_rpc_error(id, INVALID_PARAMS, &e.to_string()),
        }
    }
}
