//! Embedding engine contract
//!
//! The core never computes similarities itself; it only talks to an
//! [`EmbeddingModel`] produced by a [`ModelLoader`]. Both calls are
//! blocking, the model cache moves them off the async runtime.

mod word2vec;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::registry::ModelKey;

pub use word2vec::{Word2VecLoader, Word2VecModel};

/// One nearest-neighbour hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Raw vocabulary token, possibly with a `_TAG` suffix
    pub word: String,
    /// Cosine similarity to the query expression
    pub score: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model not found: {0}")]
    ModelNotFound(ModelKey),

    #[error("word not found in vocabulary: {0}")]
    WordNotFound(String),

    #[error("failed to read model data: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model data: {0}")]
    Format(String),

    #[error("model task failed: {0}")]
    Task(String),
}

impl ModelError {
    /// True for the "expression not in vocabulary" signal that callers may
    /// recover from by trying another probe.
    pub fn is_word_not_found(&self) -> bool {
        matches!(self, Self::WordNotFound(_))
    }
}

/// A loaded, immutable embedding model
pub trait EmbeddingModel: Send + Sync {
    /// The `k` nearest vocabulary tokens to `expr`, best first.
    fn nearest(&self, expr: &str, k: usize) -> Result<Vec<Neighbor>, ModelError>;

    /// Vocabulary size
    fn size(&self) -> usize;
}

/// Parses a model artifact from storage
pub trait ModelLoader: Send + Sync {
    fn open(&self, path: &Path) -> Result<Arc<dyn EmbeddingModel>, ModelError>;
}
