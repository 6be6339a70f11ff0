//! Probe candidate generation
//!
//! Decides which `_TAG` suffixes are tried against a model for a word.
//! First matching rule wins:
//!
//! 1. model without PoS/syntax tokens: a single empty probe
//! 2. explicit probe from the caller: just that probe
//! 3. corpus with a syntax store: deprels the word's lemma occurs in
//! 4. otherwise the coarse PoS tag set

use std::sync::Arc;

use tracing::debug;

use crate::error::{AppError, Result};
use crate::registry::ModelConf;
use crate::syntax::{CorpusStore, CorpusStores};

/// Coarse part-of-speech tags tried when nothing better is known
pub const COARSE_POS_TAGS: [&str; 12] = ["N", "A", "P", "C", "V", "D", "R", "J", "T", "I", "Z", "X"];

/// Deprel entries consulted per matching lemma
pub const MAX_DEPRELS_PER_LEMMA: usize = 10;

pub struct CandidateGenerator {
    stores: Arc<CorpusStores>,
}

impl CandidateGenerator {
    pub fn new(stores: Arc<CorpusStores>) -> Self {
        Self { stores }
    }

    /// Ordered probe list for `word`. May be empty when the syntax store
    /// knows no deprels for the word.
    pub async fn probes(
        &self,
        conf: &ModelConf,
        explicit: Option<&str>,
        word: &str,
    ) -> Result<Vec<String>> {
        if !conf.contains_pos {
            return Ok(vec![String::new()]);
        }
        if let Some(probe) = explicit.filter(|p| !p.is_empty()) {
            return Ok(vec![probe.to_string()]);
        }
        if let Some(store) = self.stores.get(&conf.corpname) {
            let probes = deprel_probes(store.as_ref(), word).await?;
            debug!(corpus = %conf.corpname, word, probes = ?probes, "deprel probes");
            return Ok(probes);
        }
        Ok(COARSE_POS_TAGS.iter().map(|t| t.to_string()).collect())
    }
}

async fn deprel_probes(store: &dyn CorpusStore, word: &str) -> Result<Vec<String>> {
    let variants = store.lemmas_by_prefix(word).await.map_err(|e| {
        AppError::internal(format!("failed to get matching variants of '{}'", word)).with_cause(e)
    })?;

    let mut probes: Vec<String> = Vec::new();
    for variant in variants.iter().filter(|v| v.value == word) {
        let entries = store.deprel_values(variant.token_id).await.map_err(|e| {
            AppError::internal(format!("failed to get syntactic functions of '{}'", word))
                .with_cause(e)
        })?;
        for entry in entries.iter().take(MAX_DEPRELS_PER_LEMMA) {
            let probe = deprel_suffix(&entry.value);
            if !probe.is_empty() && !probes.iter().any(|p| p == probe) {
                probes.push(probe.to_string());
            }
        }
    }
    Ok(probes)
}

/// The part after the last `_`, trimmed; the whole value if there is none.
pub fn deprel_suffix(value: &str) -> &str {
    value
        .rsplit_once('_')
        .map(|(_, suffix)| suffix)
        .unwrap_or(value)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{
        CollocationEngine, CollocationOptions, DeprelValue, LemmaProps, LemmaVariant,
        RawCollocation, StoreError, SyntaxStore, TokenId,
    };
    use async_trait::async_trait;
    use std::path::PathBuf;

    struct DeprelStore {
        deprels: Vec<&'static str>,
    }

    #[async_trait]
    impl SyntaxStore for DeprelStore {
        async fn lemmas_by_prefix(&self, prefix: &str) -> std::result::Result<Vec<LemmaVariant>, StoreError> {
            Ok(vec![
                LemmaVariant {
                    value: prefix.to_string(),
                    token_id: 1,
                },
                LemmaVariant {
                    value: format!("{prefix}side"),
                    token_id: 2,
                },
            ])
        }

        async fn deprel_values(&self, token: TokenId) -> std::result::Result<Vec<DeprelValue>, StoreError> {
            if token != 1 {
                return Err(StoreError::Unavailable("only exact matches expected".into()));
            }
            Ok(self
                .deprels
                .iter()
                .map(|v| DeprelValue {
                    value: v.to_string(),
                })
                .collect())
        }

        async fn lemma_props(&self, _token: TokenId) -> std::result::Result<Vec<LemmaProps>, StoreError> {
            Ok(vec![])
        }
    }

    #[async_trait]
    impl CollocationEngine for DeprelStore {
        async fn collocations(
            &self,
            _word: &str,
            _options: &CollocationOptions,
        ) -> std::result::Result<Vec<RawCollocation>, StoreError> {
            Ok(vec![])
        }
    }

    fn conf(contains_pos: bool) -> ModelConf {
        ModelConf {
            corpname: "demo".into(),
            id: "m".into(),
            path: PathBuf::from("m.bin"),
            description: String::new(),
            contains_pos,
        }
    }

    fn generator_with(deprels: Vec<&'static str>) -> CandidateGenerator {
        let mut stores = CorpusStores::new();
        stores.insert("demo", Arc::new(DeprelStore { deprels }));
        CandidateGenerator::new(Arc::new(stores))
    }

    #[tokio::test]
    async fn plain_model_gets_single_empty_probe() {
        let gen = generator_with(vec!["nsubj"]);
        let probes = gen.probes(&conf(false), None, "lake").await.unwrap();
        assert_eq!(probes, vec![String::new()]);
    }

    #[tokio::test]
    async fn explicit_probe_wins() {
        let gen = generator_with(vec!["nsubj"]);
        let probes = gen.probes(&conf(true), Some("obj"), "lake").await.unwrap();
        assert_eq!(probes, vec!["obj".to_string()]);
    }

    #[tokio::test]
    async fn fallback_is_coarse_pos_tags() {
        let gen = CandidateGenerator::new(Arc::new(CorpusStores::new()));
        let probes = gen.probes(&conf(true), Some(""), "lake").await.unwrap();
        assert_eq!(probes.len(), 12);
        assert_eq!(probes[0], "N");
        assert_eq!(probes[11], "X");
    }

    #[tokio::test]
    async fn syntax_store_supplies_deprels() {
        let gen = generator_with(vec!["lake_nsubj", "lake_obj ", "nmod", "lake_nsubj"]);
        let probes = gen.probes(&conf(true), None, "lake").await.unwrap();
        assert_eq!(probes, vec!["nsubj", "obj", "nmod"]);
    }

    #[tokio::test]
    async fn deprels_are_capped_per_lemma() {
        let deprels = vec![
            "d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7", "d8", "d9", "d10", "d11",
        ];
        let gen = generator_with(deprels);
        let probes = gen.probes(&conf(true), None, "lake").await.unwrap();
        assert_eq!(probes.len(), MAX_DEPRELS_PER_LEMMA);
        assert_eq!(probes.last().map(String::as_str), Some("d9"));
    }

    #[tokio::test]
    async fn no_deprels_means_no_probes() {
        let gen = generator_with(vec![]);
        let probes = gen.probes(&conf(true), None, "lake").await.unwrap();
        assert!(probes.is_empty());
    }

    #[test]
    fn suffix_extraction() {
        assert_eq!(deprel_suffix("new_york_nmod"), "nmod");
        assert_eq!(deprel_suffix("obj"), "obj");
        assert_eq!(deprel_suffix("lake_ amod "), "amod");
        assert_eq!(deprel_suffix("lake_"), "");
    }
}
