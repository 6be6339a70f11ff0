//! MCP (Model Context Protocol) server
//!
//! Exposes the searcher as agent tools over JSON-RPC on stdio:
//!
//! - `similarly_used_words` ranked similarly used words of a word
//! - `list_models` embedding models of a dataset
//! - `collocations` ranked collocates of a lemma
//!
//! ```bash
//! wssmcp config.yaml
//! ```
//!
//! With `mcp.selfContained: true` the models are loaded in-process,
//! otherwise calls are proxied to a running wsserver.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
