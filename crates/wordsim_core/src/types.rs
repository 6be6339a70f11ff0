//! Request and response shapes shared by the searchers and the transports.

use serde::{Deserialize, Serialize};

/// A single "similarly used word" answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub word: String,
    /// Syntactic functions / PoS tags the word was found under
    pub syntax_fn: Vec<String>,
    /// Sum of the per-probe similarity scores
    pub score: f32,
}

/// Summary of a configured model, as returned by model listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub size: usize,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Parameters of a similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityQuery {
    pub corpus: String,
    pub model: String,
    /// Explicit PoS tag or syntactic function; `None` lets the engine choose
    pub probe: Option<String>,
    pub word: String,
    pub limit: usize,
    pub min_score: f32,
}

impl SimilarityQuery {
    pub fn new(corpus: &str, model: &str, word: &str) -> Self {
        Self {
            corpus: corpus.to_string(),
            model: model.to_string(),
            probe: None,
            word: word.to_string(),
            limit: 10,
            min_score: 0.0,
        }
    }

    pub fn with_probe(mut self, probe: &str) -> Self {
        self.probe = Some(probe.to_string());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LemmaInfo {
    pub value: String,
    pub pos: String,
}

/// Collocation projection returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCollocation {
    pub search_match: LemmaInfo,
    pub collocate: LemmaInfo,
    pub deprel: String,
    pub log_dice: f64,
    #[serde(rename = "tscore")]
    pub t_score: f64,
    pub lmi: f64,
    pub rrf: f64,
    pub mutual_dist: f64,
}

/// Dictionary entry of a lemma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictItem {
    pub lemma: String,
    pub pos: String,
    pub freq: f64,
    pub text_type: String,
}
