//! Syntax-indexed store and collocation engine contracts
//!
//! Both collaborators live outside this crate (a dependency-parsed corpus
//! database computing logDice / t-score / LMI / RRF). The core only issues
//! lookups and forwards collocation options unchanged.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::LemmaInfo;

pub type TokenId = u32;

/// A lemma entry matched by prefix lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LemmaVariant {
    pub value: String,
    pub token_id: TokenId,
}

/// A dependency relation a lemma occurs in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeprelValue {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LemmaProps {
    pub pos: String,
    pub freq: f64,
    pub text_type: String,
}

/// Collocation record as produced by the collocation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollocation {
    pub lemma: LemmaInfo,
    pub collocate: LemmaInfo,
    pub deprel: String,
    pub log_dice: f64,
    #[serde(rename = "tscore")]
    pub t_score: f64,
    pub lmi: f64,
    pub rrf: f64,
    pub mutual_dist: f64,
}

/// Association measure used to rank collocates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMeasure {
    #[serde(rename = "logDice")]
    LogDice,
    #[serde(rename = "tscore")]
    TScore,
    #[serde(rename = "lmi")]
    Lmi,
    #[default]
    #[serde(rename = "rrf")]
    Rrf,
}

impl SortMeasure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LogDice => "logDice",
            Self::TScore => "tscore",
            Self::Lmi => "lmi",
            Self::Rrf => "rrf",
        }
    }
}

impl FromStr for SortMeasure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logDice" | "ldice" => Ok(Self::LogDice),
            "tscore" => Ok(Self::TScore),
            "lmi" => Ok(Self::Lmi),
            "rrf" => Ok(Self::Rrf),
            other => Err(format!("unknown sort measure: {}", other)),
        }
    }
}

/// Predefined relation patterns ("collocations of type")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredefinedSearch {
    /// Nouns modifying the word (`nmod` with a NOUN parent)
    ModifiersOf,
    /// Nouns the word modifies (`nmod`, parent is a NOUN)
    NounsModifiedBy,
    /// Verbs the word is a subject of (`nsubj`, parent is a VERB)
    VerbsSubject,
    /// Verbs the word is an object of (`obj|iobj`, parent is a VERB)
    VerbsObject,
}

impl PredefinedSearch {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ModifiersOf => "modifiers-of",
            Self::NounsModifiedBy => "nouns-modified-by",
            Self::VerbsSubject => "verbs-subject",
            Self::VerbsObject => "verbs-object",
        }
    }
}

impl fmt::Display for PredefinedSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredefinedSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modifiers-of" => Ok(Self::ModifiersOf),
            "nouns-modified-by" => Ok(Self::NounsModifiedBy),
            "verbs-subject" => Ok(Self::VerbsSubject),
            "verbs-object" => Ok(Self::VerbsObject),
            other => Err(format!("unknown collocation type: {}", other)),
        }
    }
}

/// Options forwarded verbatim to the collocation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollocationOptions {
    pub pos: Option<String>,
    pub limit: usize,
    pub sort_by: SortMeasure,
    pub text_type: Option<String>,
    pub predefined: Option<PredefinedSearch>,
    pub max_avg_distance: Option<f64>,
}

impl Default for CollocationOptions {
    fn default() -> Self {
        Self {
            pos: None,
            limit: 10,
            sort_by: SortMeasure::default(),
            text_type: None,
            predefined: None,
            max_avg_distance: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("syntax store unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected syntax store response: {0}")]
    Decode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait SyntaxStore: Send + Sync {
    /// Lemma entries whose surface form starts with `prefix`
    async fn lemmas_by_prefix(&self, prefix: &str) -> Result<Vec<LemmaVariant>, StoreError>;

    async fn deprel_values(&self, token: TokenId) -> Result<Vec<DeprelValue>, StoreError>;

    async fn lemma_props(&self, token: TokenId) -> Result<Vec<LemmaProps>, StoreError>;
}

#[async_trait]
pub trait CollocationEngine: Send + Sync {
    /// Ranked collocates of `word`
    async fn collocations(
        &self,
        word: &str,
        options: &CollocationOptions,
    ) -> Result<Vec<RawCollocation>, StoreError>;
}

/// A corpus database answering both lookups and collocation queries
pub trait CorpusStore: SyntaxStore + CollocationEngine {}

impl<T: SyntaxStore + CollocationEngine> CorpusStore for T {}

/// Corpus databases keyed by corpus identifier
#[derive(Clone, Default)]
pub struct CorpusStores {
    stores: HashMap<String, Arc<dyn CorpusStore>>,
}

impl CorpusStores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, corpus: impl Into<String>, store: Arc<dyn CorpusStore>) {
        self.stores.insert(corpus.into(), store);
    }

    pub fn get(&self, corpus: &str) -> Option<&Arc<dyn CorpusStore>> {
        self.stores.get(corpus)
    }

    pub fn contains(&self, corpus: &str) -> bool {
        self.stores.contains_key(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_names_parse() {
        for p in [
            PredefinedSearch::ModifiersOf,
            PredefinedSearch::NounsModifiedBy,
            PredefinedSearch::VerbsSubject,
            PredefinedSearch::VerbsObject,
        ] {
            assert_eq!(p.as_str().parse::<PredefinedSearch>(), Ok(p));
        }
        assert!("adverbs-of".parse::<PredefinedSearch>().is_err());
    }

    #[test]
    fn sort_measure_accepts_aliases() {
        assert_eq!("ldice".parse::<SortMeasure>(), Ok(SortMeasure::LogDice));
        assert_eq!("tscore".parse::<SortMeasure>(), Ok(SortMeasure::TScore));
        assert!("ll".parse::<SortMeasure>().is_err());
        assert_eq!(SortMeasure::default(), SortMeasure::Rrf);
    }

    #[test]
    fn options_serialise_camel_case() {
        let opts = CollocationOptions {
            predefined: Some(PredefinedSearch::VerbsObject),
            ..Default::default()
        };
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["sortBy"], "rrf");
        assert_eq!(json["predefined"], "verbs-object");
        assert_eq!(json["limit"], 10);
    }
}
