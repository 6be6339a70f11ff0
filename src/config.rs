//! Service configuration
//!
//! Loaded from a YAML (or JSON) file given on the command line. Field names
//! are camelCase.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use wordsim_core::ModelConf;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_LISTEN_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default)]
    pub listen_address: String,
    #[serde(default)]
    pub listen_port: u16,
    #[serde(default)]
    pub server_read_timeout_secs: u64,
    #[serde(default)]
    pub server_write_timeout_secs: u64,
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub models: Vec<ModelConf>,
    #[serde(default)]
    pub corpora: HashMap<String, CorpusConf>,
    #[serde(default)]
    pub logging: LoggingConf,
    #[serde(default)]
    pub mcp: McpConf,
}

/// Per-corpus settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusConf {
    #[serde(default)]
    pub info: CorpusInfo,
    /// Syntax database serving lemma lookups and collocations
    #[serde(default)]
    pub syntax_db: Option<SyntaxDbConf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyntaxDbConf {
    pub url: String,
}

/// Descriptive corpus metadata returned by `GET /dataset/:corpusId`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusInfo {
    #[serde(default)]
    pub corpname: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub citation_info: CitationInfo,
    #[serde(default)]
    pub srch_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CitationInfo {
    #[serde(default)]
    pub default_ref: String,
    #[serde(default)]
    pub article_ref: Vec<String>,
    #[serde(default)]
    pub other_bibliography: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConf {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConf {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpConf {
    /// Answer tool calls in-process instead of proxying a running wsserver
    #[serde(default)]
    pub self_contained: bool,
    /// Base URL of the wsserver used when not self-contained
    #[serde(default)]
    pub server_url: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Fill in unset server settings, warning about each default used
    pub fn apply_defaults(&mut self) {
        if self.server_write_timeout_secs == 0 {
            self.server_write_timeout_secs = DEFAULT_TIMEOUT_SECS;
            warn!(
                "serverWriteTimeoutSecs not specified, using default: {}",
                DEFAULT_TIMEOUT_SECS
            );
        }
        if self.server_read_timeout_secs == 0 {
            self.server_read_timeout_secs = DEFAULT_TIMEOUT_SECS;
            warn!(
                "serverReadTimeoutSecs not specified, using default: {}",
                DEFAULT_TIMEOUT_SECS
            );
        }
        if self.listen_address.is_empty() {
            self.listen_address = DEFAULT_LISTEN_ADDRESS.to_string();
            warn!(
                "listenAddress not specified, using default: {}",
                DEFAULT_LISTEN_ADDRESS
            );
        }
        if self.listen_port == 0 {
            self.listen_port = DEFAULT_LISTEN_PORT;
            warn!(
                "listenPort not specified, using default: {}",
                DEFAULT_LISTEN_PORT
            );
        }
    }

    pub fn corpus_info(&self, corpus: &str) -> Option<&CorpusInfo> {
        self.corpora.get(corpus).map(|c| &c.info)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_address, self.listen_port)
    }
}
