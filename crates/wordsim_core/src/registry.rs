//! Model configuration registry
//!
//! Static catalog of the configured (corpus, model) pairs. Populated once
//! at startup from external configuration and read-only afterwards.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration of a single embedding model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConf {
    /// Corpus the model was trained on
    pub corpname: String,
    /// Model identifier, unique within the corpus
    pub id: String,
    /// Model file; relative paths are resolved against the data directory
    pub path: PathBuf,
    #[serde(default)]
    pub description: String,
    /// Whether vocabulary tokens carry a `_TAG` suffix (PoS or deprel)
    #[serde(rename = "containsPoS", default)]
    pub contains_pos: bool,
}

impl ModelConf {
    pub fn key(&self) -> ModelKey {
        ModelKey::new(&self.corpname, &self.id)
    }

    pub fn data_path(&self, data_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            data_dir.join(&self.path)
        }
    }
}

/// Composite cache key of a model
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub corpus: String,
    pub model: String,
}

impl ModelKey {
    pub fn new(corpus: &str, model: &str) -> Self {
        Self {
            corpus: corpus.to_string(),
            model: model.to_string(),
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.corpus, self.model)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate model configuration: {0}")]
    Duplicate(ModelKey),
}

/// Read-only registry of model configurations
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    data_dir: PathBuf,
    models: Vec<ModelConf>,
}

impl ModelRegistry {
    /// Create a registry, rejecting duplicate (corpus, model) pairs
    pub fn new(data_dir: impl Into<PathBuf>, models: Vec<ModelConf>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for conf in &models {
            let key = conf.key();
            if !seen.insert(key.clone()) {
                return Err(RegistryError::Duplicate(key));
            }
        }
        Ok(Self {
            data_dir: data_dir.into(),
            models,
        })
    }

    pub fn find(&self, corpus: &str, model: &str) -> Option<&ModelConf> {
        self.models
            .iter()
            .find(|m| m.corpname == corpus && m.id == model)
    }

    /// All models configured for a corpus, in configuration order
    pub fn for_corpus<'a>(&'a self, corpus: &'a str) -> impl Iterator<Item = &'a ModelConf> + 'a {
        self.models.iter().filter(move |m| m.corpname == corpus)
    }

    pub fn data_path(&self, conf: &ModelConf) -> PathBuf {
        conf.data_path(&self.data_dir)
    }

    pub fn models(&self) -> &[ModelConf] {
        &self.models
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(corpus: &str, id: &str) -> ModelConf {
        ModelConf {
            corpname: corpus.to_string(),
            id: id.to_string(),
            path: PathBuf::from(format!("{corpus}/{id}.bin")),
            description: String::new(),
            contains_pos: false,
        }
    }

    #[test]
    fn rejects_duplicate_pairs() {
        let err = ModelRegistry::new("/data", vec![conf("syn", "w2v"), conf("syn", "w2v")])
            .unwrap_err();
        assert_eq!(err.to_string(), "duplicate model configuration: syn/w2v");
    }

    #[test]
    fn same_model_id_in_other_corpus_is_fine() {
        let registry =
            ModelRegistry::new("/data", vec![conf("syn", "w2v"), conf("intercorp", "w2v")])
                .unwrap();
        assert!(registry.find("intercorp", "w2v").is_some());
        assert!(registry.find("syn", "missing").is_none());
        assert_eq!(registry.for_corpus("syn").count(), 1);
    }

    #[test]
    fn relative_paths_resolve_against_data_dir() {
        let registry = ModelRegistry::new("/data", vec![conf("syn", "w2v")]).unwrap();
        let model = registry.find("syn", "w2v").unwrap();
        assert_eq!(registry.data_path(model), PathBuf::from("/data/syn/w2v.bin"));

        let mut absolute = conf("syn", "abs");
        absolute.path = PathBuf::from("/models/abs.bin");
        assert_eq!(
            absolute.data_path(Path::new("/data")),
            PathBuf::from("/models/abs.bin")
        );
    }

    #[test]
    fn deserialises_camel_case_config() {
        let json = r#"{"corpname":"syn","id":"w2v","path":"a.bin","containsPoS":true}"#;
        let conf: ModelConf = serde_json::from_str(json).unwrap();
        assert!(conf.contains_pos);
        assert_eq!(conf.description, "");
    }
}
