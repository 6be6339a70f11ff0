//! Word-Sim-Service
//!
//! Transport and process lifecycle around `wordsim_core`: configuration,
//! logging, the REST API served by `wsserver` and the MCP agent-tool server
//! run by `wssmcp`.

pub mod bootstrap;
pub mod config;
pub mod logging;

#[cfg(feature = "server")]
pub mod api;

#[cfg(feature = "mcp")]
pub mod mcp;

pub use config::ServiceConfig;

/// Version banner printed when no configuration is given
pub fn version_info() -> String {
    format!("Word-Sim-Service {}", env!("CARGO_PKG_VERSION"))
}
