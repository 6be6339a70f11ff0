//! In-memory fakes of the embedding engine and the corpus syntax store.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use wordsim_core::embedding::{EmbeddingModel, ModelError, ModelLoader, Neighbor};
use wordsim_core::syntax::{
    CollocationEngine, CollocationOptions, CorpusStores, DeprelValue, LemmaProps, LemmaVariant,
    RawCollocation, StoreError, SyntaxStore, TokenId,
};
use wordsim_core::{LemmaInfo, LocalSearcher, ModelConf, ModelRegistry};

/// Embedding model answering from a fixed table, recording every lookup
#[derive(Default)]
pub struct FakeModel {
    table: HashMap<String, Vec<Neighbor>>,
    calls: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, expr: &str, neighbors: &[(&str, f32)]) -> Self {
        self.table.insert(
            expr.to_string(),
            neighbors
                .iter()
                .map(|(w, s)| Neighbor {
                    word: w.to_string(),
                    score: *s,
                })
                .collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl EmbeddingModel for FakeModel {
    fn nearest(&self, expr: &str, k: usize) -> Result<Vec<Neighbor>, ModelError> {
        self.calls.lock().unwrap().push(expr.to_string());
        self.table
            .get(expr)
            .map(|n| n.iter().take(k).cloned().collect())
            .ok_or_else(|| ModelError::WordNotFound(expr.to_string()))
    }

    fn size(&self) -> usize {
        self.table.len()
    }
}

/// Hands out pre-built models by file name
#[derive(Default)]
pub struct FakeLoader {
    models: HashMap<String, Arc<FakeModel>>,
}

impl ModelLoader for FakeLoader {
    fn open(&self, path: &Path) -> Result<Arc<dyn EmbeddingModel>, ModelError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        match self.models.get(&name) {
            Some(model) => Ok(model.clone() as Arc<dyn EmbeddingModel>),
            None => Err(ModelError::Format(format!("cannot parse {name}"))),
        }
    }
}

/// Corpus syntax store with lemma, deprel, props and collocation tables
#[derive(Default)]
pub struct FakeStore {
    pub lemmas: Vec<LemmaVariant>,
    pub deprels: HashMap<TokenId, Vec<String>>,
    pub props: HashMap<TokenId, Vec<LemmaProps>>,
    pub collocations: Vec<RawCollocation>,
    pub fail: bool,
    pub seen_options: Mutex<Vec<CollocationOptions>>,
}

impl FakeStore {
    pub fn lemma(mut self, value: &str, token_id: TokenId, deprels: &[&str]) -> Self {
        self.lemmas.push(LemmaVariant {
            value: value.to_string(),
            token_id,
        });
        self.deprels
            .insert(token_id, deprels.iter().map(|d| d.to_string()).collect());
        self
    }

    pub fn props(mut self, token_id: TokenId, pos: &str, freq: f64, text_type: &str) -> Self {
        self.props.entry(token_id).or_default().push(LemmaProps {
            pos: pos.to_string(),
            freq,
            text_type: text_type.to_string(),
        });
        self
    }

    pub fn collocation(mut self, collocate: &str, log_dice: f64, rrf: f64) -> Self {
        self.collocations.push(RawCollocation {
            lemma: LemmaInfo {
                value: "lake".into(),
                pos: "NOUN".into(),
            },
            collocate: LemmaInfo {
                value: collocate.to_string(),
                pos: "ADJ".into(),
            },
            deprel: "amod".into(),
            log_dice,
            t_score: 1.0,
            lmi: 2.0,
            rrf,
            mutual_dist: 1.5,
        });
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            Err(StoreError::Unavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SyntaxStore for FakeStore {
    async fn lemmas_by_prefix(&self, prefix: &str) -> Result<Vec<LemmaVariant>, StoreError> {
        self.check()?;
        Ok(self
            .lemmas
            .iter()
            .filter(|l| l.value.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn deprel_values(&self, token: TokenId) -> Result<Vec<DeprelValue>, StoreError> {
        self.check()?;
        Ok(self
            .deprels
            .get(&token)
            .map(|d| d.iter().map(|v| DeprelValue { value: v.clone() }).collect())
            .unwrap_or_default())
    }

    async fn lemma_props(&self, token: TokenId) -> Result<Vec<LemmaProps>, StoreError> {
        self.check()?;
        Ok(self.props.get(&token).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CollocationEngine for FakeStore {
    async fn collocations(
        &self,
        _word: &str,
        options: &CollocationOptions,
    ) -> Result<Vec<RawCollocation>, StoreError> {
        self.check()?;
        self.seen_options.lock().unwrap().push(options.clone());
        Ok(self.collocations.iter().take(options.limit).cloned().collect())
    }
}

pub fn model_conf(corpus: &str, id: &str, contains_pos: bool) -> ModelConf {
    ModelConf {
        corpname: corpus.to_string(),
        id: id.to_string(),
        path: PathBuf::from(format!("{id}.bin")),
        description: format!("{id} test model"),
        contains_pos,
    }
}

/// A searcher over model files written into a temp directory
pub struct Fixture {
    pub dir: TempDir,
    pub searcher: LocalSearcher,
}

pub struct FixtureBuilder {
    confs: Vec<ModelConf>,
    loader: FakeLoader,
    missing: Vec<String>,
    stores: CorpusStores,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self {
            confs: Vec::new(),
            loader: FakeLoader::default(),
            missing: Vec::new(),
            stores: CorpusStores::new(),
        }
    }

    pub fn model(mut self, conf: ModelConf, model: Arc<FakeModel>) -> Self {
        self.loader
            .models
            .insert(format!("{}.bin", conf.id), model);
        self.confs.push(conf);
        self
    }

    /// Configured with a file the loader cannot parse
    pub fn broken_model(mut self, conf: ModelConf) -> Self {
        self.confs.push(conf);
        self
    }

    /// Configured but without a file on disk
    pub fn missing_model(mut self, conf: ModelConf) -> Self {
        self.missing.push(conf.id.clone());
        self.confs.push(conf);
        self
    }

    pub fn store(mut self, corpus: &str, store: Arc<FakeStore>) -> Self {
        self.stores.insert(corpus, store);
        self
    }

    pub fn build(self) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        for conf in &self.confs {
            if !self.missing.contains(&conf.id) {
                std::fs::write(dir.path().join(&conf.path), b"fake").unwrap();
            }
        }
        let registry = ModelRegistry::new(dir.path(), self.confs).unwrap();
        let searcher = LocalSearcher::new(
            Arc::new(registry),
            Arc::new(self.loader),
            Arc::new(self.stores),
        );
        Fixture { dir, searcher }
    }
}
