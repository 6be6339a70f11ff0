//! Lazily loaded embedding models
//!
//! Each (corpus, model) key owns a [`OnceCell`]; the first caller loads the
//! artifact while concurrent callers of the same key wait for that load.
//! A failed load leaves the cell empty so a later request may retry.
//! Loaded models are never evicted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::embedding::{EmbeddingModel, ModelError, ModelLoader, Neighbor};
use crate::registry::{ModelConf, ModelKey, ModelRegistry};
use crate::types::ModelInfo;

type ModelSlot = Arc<OnceCell<Arc<dyn EmbeddingModel>>>;

pub struct ModelCache {
    registry: Arc<ModelRegistry>,
    loader: Arc<dyn ModelLoader>,
    models: Mutex<HashMap<ModelKey, ModelSlot>>,
}

impl ModelCache {
    pub fn new(registry: Arc<ModelRegistry>, loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            registry,
            loader,
            models: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Nearest neighbours of `word` (suffixed with `_probe` for PoS-aware
    /// models). One extra neighbour is requested because the query token
    /// itself is usually the top hit.
    pub async fn query(
        &self,
        conf: &ModelConf,
        word: &str,
        probe: &str,
        limit: usize,
    ) -> Result<Vec<Neighbor>, ModelError> {
        let model = self.access(conf).await?;
        let expr = if conf.contains_pos {
            format!("{}_{}", word, probe)
        } else {
            word.to_string()
        };
        let k = limit.saturating_add(1);
        debug!(model = %conf.key(), expr = %expr, k, "querying embedding model");
        tokio::task::spawn_blocking(move || model.nearest(&expr, k))
            .await
            .map_err(|e| ModelError::Task(e.to_string()))?
    }

    /// One entry per model configured for `corpus`. A model that cannot be
    /// loaded is still listed, with its error and a zero size.
    pub async fn list_models(&self, corpus: &str) -> Vec<ModelInfo> {
        let mut ans = Vec::new();
        for conf in self.registry.for_corpus(corpus) {
            let info = match self.access(conf).await {
                Ok(model) => ModelInfo {
                    name: conf.id.clone(),
                    size: model.size(),
                    description: conf.description.clone(),
                    error: None,
                },
                Err(e) => {
                    warn!(model = %conf.key(), error = %e, "model unavailable");
                    ModelInfo {
                        name: conf.id.clone(),
                        size: 0,
                        description: conf.description.clone(),
                        error: Some(e.to_string()),
                    }
                }
            };
            ans.push(info);
        }
        ans
    }

    /// Whether the model behind `key` has already been loaded
    pub async fn is_loaded(&self, key: &ModelKey) -> bool {
        self.models
            .lock()
            .await
            .get(key)
            .map(|slot| slot.initialized())
            .unwrap_or(false)
    }

    async fn access(&self, conf: &ModelConf) -> Result<Arc<dyn EmbeddingModel>, ModelError> {
        let slot = {
            let mut models = self.models.lock().await;
            Arc::clone(models.entry(conf.key()).or_default())
        };
        let model = slot.get_or_try_init(|| self.load(conf)).await?;
        Ok(Arc::clone(model))
    }

    async fn load(&self, conf: &ModelConf) -> Result<Arc<dyn EmbeddingModel>, ModelError> {
        let path = self.registry.data_path(conf);
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(ModelError::ModelNotFound(conf.key()));
        }

        info!(model = %conf.key(), path = %path.display(), "loading embedding model");
        let loader = Arc::clone(&self.loader);
        let model = tokio::task::spawn_blocking(move || loader.open(&path))
            .await
            .map_err(|e| ModelError::Task(e.to_string()))??;
        info!(model = %conf.key(), size = model.size(), "embedding model loaded");
        Ok(model)
    }
}
