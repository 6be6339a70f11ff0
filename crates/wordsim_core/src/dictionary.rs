//! Dictionary lookup over a corpus syntax store.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::syntax::CorpusStores;
use crate::types::DictItem;

pub struct Dictionary {
    stores: Arc<CorpusStores>,
}

impl Dictionary {
    pub fn new(stores: Arc<CorpusStores>) -> Self {
        Self { stores }
    }

    /// Every (pos, text type) entry of lemmas spelled exactly `word`
    pub async fn lookup(&self, corpus: &str, word: &str) -> Result<Vec<DictItem>> {
        let store = self
            .stores
            .get(corpus)
            .ok_or_else(|| AppError::not_found(format!("unknown dataset: {}", corpus)))?;

        let variants = store.lemmas_by_prefix(word).await.map_err(|e| {
            AppError::internal(format!("failed to get matching lemmas of '{}'", word)).with_cause(e)
        })?;

        let mut items = Vec::new();
        for variant in variants.into_iter().filter(|v| v.value == word) {
            let props = store.lemma_props(variant.token_id).await.map_err(|e| {
                AppError::internal(format!("failed to get properties of lemma '{}'", word))
                    .with_cause(e)
            })?;
            items.extend(props.into_iter().map(|p| DictItem {
                lemma: variant.value.clone(),
                pos: p.pos,
                freq: if p.freq.is_finite() { p.freq } else { 0.0 },
                text_type: p.text_type,
            }));
        }
        Ok(items)
    }
}
