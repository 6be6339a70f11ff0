//! Logging setup shared by the binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where formatted log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    /// stdout carries protocol traffic (MCP)
    Stderr,
}

/// Crates and binaries whose events pass the default filter
const TARGETS: &[&str] = &[
    "wsserver",
    "wssmcp",
    "word_sim_service",
    "wordsim_core",
    "wordsim_client",
    "tower_http",
];

/// Filter directives used when `RUST_LOG` is unset
pub fn default_directives(level: &str) -> String {
    let level = if level.trim().is_empty() { "info" } else { level };
    TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// `RUST_LOG` wins over the configured level.
pub fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(level: &str, target: LogTarget) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(filter_for(level));
    match target {
        LogTarget::Stdout => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
        LogTarget::Stderr => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?,
    }
    Ok(())
}
