//! Model Context Protocol front end.
//!
//! Exposes the provider operations as MCP tools over newline-delimited
//! JSON-RPC on stdio. Requests are handled one at a time, in order.

mod jsonrpc;
mod server;
mod stdio;
mod tools;

pub use server::McpServer;
pub use stdio::run_stdio;

pub(crate) const MCP_VERSION: &str = "2024-11-05";
pub(crate) const SERVER_NAME: &str = "azure-devops-server";
