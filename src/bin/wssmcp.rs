//! Word-Sim-Service MCP server
//!
//! Runs the agent-tool server on stdio. Logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! wssmcp config.yaml
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use word_sim_service::bootstrap::mcp_searcher;
use word_sim_service::logging::{self, LogTarget};
use word_sim_service::mcp::McpServer;
use word_sim_service::ServiceConfig;

#[derive(Parser)]
#[command(name = "wssmcp")]
#[command(about = "MCP server exposing similarly used words and collocations")]
#[command(long_about = None)]
struct Cli {
    /// Path to the YAML configuration
    #[arg(env = "WSSERVER_CONFIG")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut conf = ServiceConfig::from_file(&cli.config)?;
    logging::init(&conf.logging.level, LogTarget::Stderr)?;
    conf.apply_defaults();

    let searcher = mcp_searcher(&conf)?;
    info!(
        self_contained = conf.mcp.self_contained,
        "wssmcp {} ready",
        env!("CARGO_PKG_VERSION")
    );

    McpServer::new(searcher).run().await
}
