//! Assembles searchers from configuration.

use std::sync::Arc;

use tracing::info;

use wordsim_client::{HttpSearcher, HttpSyntaxStore};
use wordsim_core::embedding::Word2VecLoader;
use wordsim_core::syntax::CorpusStores;
use wordsim_core::{LocalSearcher, ModelRegistry, WordSimSearcher};

use crate::config::{ConfigError, ServiceConfig};

/// One HTTP syntax store per corpus that configures a syntax database
pub fn corpus_stores(conf: &ServiceConfig) -> Result<CorpusStores, ConfigError> {
    let mut stores = CorpusStores::new();
    for (corpus, corpus_conf) in &conf.corpora {
        if let Some(db) = &corpus_conf.syntax_db {
            let store = HttpSyntaxStore::new(&db.url)
                .map_err(|e| ConfigError::Invalid(format!("corpus {}: {:#}", corpus, e)))?;
            info!(corpus = %corpus, url = %db.url, "syntax database configured");
            stores.insert(corpus.clone(), Arc::new(store));
        }
    }
    Ok(stores)
}

pub fn local_searcher(conf: &ServiceConfig) -> Result<LocalSearcher, ConfigError> {
    let registry = ModelRegistry::new(&conf.data_dir, conf.models.clone())
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    info!(
        models = registry.models().len(),
        data_dir = %conf.data_dir.display(),
        "model registry ready"
    );
    Ok(LocalSearcher::new(
        Arc::new(registry),
        Arc::new(Word2VecLoader),
        Arc::new(corpus_stores(conf)?),
    ))
}

/// The searcher the MCP server uses: in-process when `mcp.selfContained`,
/// otherwise a proxy of the wsserver at `mcp.serverUrl` (falling back to
/// the configured listen address).
pub fn mcp_searcher(conf: &ServiceConfig) -> Result<Arc<dyn WordSimSearcher>, ConfigError> {
    if conf.mcp.self_contained {
        return Ok(Arc::new(local_searcher(conf)?));
    }
    let url = conf
        .mcp
        .server_url
        .clone()
        .unwrap_or_else(|| format!("http://{}/", conf.listen_addr()));
    info!(url = %url, "proxying tool calls to wsserver");
    let searcher =
        HttpSearcher::new(&url).map_err(|e| ConfigError::Invalid(format!("{:#}", e)))?;
    Ok(Arc::new(searcher))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_models_are_rejected() {
        let conf = ServiceConfig::from_yaml(
            r#"
models:
  - {corpname: syn, id: m, path: a.bin}
  - {corpname: syn, id: m, path: b.bin}
"#,
        )
        .unwrap();
        let err = local_searcher(&conf).err().unwrap();
        assert!(err.to_string().contains("syn/m"));
    }

    #[test]
    fn bad_syntax_db_url_is_rejected() {
        let conf = ServiceConfig::from_yaml(
            r#"
corpora:
  syn:
    syntaxDb: {url: "not a url"}
"#,
        )
        .unwrap();
        assert!(matches!(corpus_stores(&conf), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn stores_follow_corpus_config() {
        let conf = ServiceConfig::from_yaml(
            r#"
corpora:
  syn:
    syntaxDb: {url: "http://localhost:9000/syn/"}
  plain:
    info: {corpname: plain}
"#,
        )
        .unwrap();
        let stores = corpus_stores(&conf).unwrap();
        assert!(stores.contains("syn"));
        assert!(!stores.contains("plain"));
    }

    #[test]
    fn mcp_proxy_defaults_to_listen_address() {
        let mut conf = ServiceConfig::default();
        conf.apply_defaults();
        assert!(mcp_searcher(&conf).is_ok());
    }
}
