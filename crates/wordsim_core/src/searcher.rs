//! WordSimSearcher trait and its in-process variant.
//! Transports (REST, MCP) depend on this trait only; the remote proxy
//! variant lives in `wordsim_client`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::collocations::CollocationForwarder;
use crate::dictionary::Dictionary;
use crate::embedding::ModelLoader;
use crate::error::{AppError, Result};
use crate::model_cache::ModelCache;
use crate::registry::{ModelConf, ModelRegistry};
use crate::similarity::SimilarityQueryEngine;
use crate::syntax::{CollocationOptions, CorpusStores};
use crate::types::{DictItem, ModelInfo, ResultRow, SimilarityQuery, SimpleCollocation};

#[async_trait]
pub trait WordSimSearcher: Send + Sync {
    async fn list_models(&self, corpus: &str) -> Result<Vec<ModelInfo>>;

    async fn model_info(&self, corpus: &str, model: &str) -> Result<ModelConf>;

    async fn similarly_used_words(&self, query: &SimilarityQuery) -> Result<Vec<ResultRow>>;

    async fn collocations(
        &self,
        corpus: &str,
        word: &str,
        options: &CollocationOptions,
    ) -> Result<Vec<SimpleCollocation>>;

    async fn dictionary(&self, corpus: &str, word: &str) -> Result<Vec<DictItem>>;
}

/// Owns the model cache and the corpus stores directly
pub struct LocalSearcher {
    cache: Arc<ModelCache>,
    similarity: SimilarityQueryEngine,
    collocations: CollocationForwarder,
    dictionary: Dictionary,
}

impl LocalSearcher {
    pub fn new(
        registry: Arc<ModelRegistry>,
        loader: Arc<dyn ModelLoader>,
        stores: Arc<CorpusStores>,
    ) -> Self {
        let cache = Arc::new(ModelCache::new(registry, loader));
        Self {
            similarity: SimilarityQueryEngine::new(Arc::clone(&cache), Arc::clone(&stores)),
            collocations: CollocationForwarder::new(Arc::clone(&stores)),
            dictionary: Dictionary::new(stores),
            cache,
        }
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }
}

#[async_trait]
impl WordSimSearcher for LocalSearcher {
    async fn list_models(&self, corpus: &str) -> Result<Vec<ModelInfo>> {
        Ok(self.cache.list_models(corpus).await)
    }

    async fn model_info(&self, corpus: &str, model: &str) -> Result<ModelConf> {
        self.cache
            .registry()
            .find(corpus, model)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("model {}/{} not found", corpus, model)))
    }

    async fn similarly_used_words(&self, query: &SimilarityQuery) -> Result<Vec<ResultRow>> {
        self.similarity.similarly_used_words(query).await
    }

    async fn collocations(
        &self,
        corpus: &str,
        word: &str,
        options: &CollocationOptions,
    ) -> Result<Vec<SimpleCollocation>> {
        self.collocations.collocations(corpus, word, options).await
    }

    async fn dictionary(&self, corpus: &str, word: &str) -> Result<Vec<DictItem>> {
        self.dictionary.lookup(corpus, word).await
    }
}
