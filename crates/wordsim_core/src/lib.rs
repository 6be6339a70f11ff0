//! Word similarity core
//!
//! Query orchestration and model lifecycle for "similarly used words" and
//! collocation lookups:
//!
//! - [`model_cache::ModelCache`] loads embedding models lazily, once per key
//! - [`candidates::CandidateGenerator`] picks the probes tried for a word
//! - [`similarity::SimilarityQueryEngine`] fans out, merges and re-ranks
//! - [`collocations::CollocationForwarder`] reshapes collocation engine output
//! - [`error`] holds the three-kind failure taxonomy and its classifier
//!
//! Transports talk to a [`searcher::WordSimSearcher`].

pub mod candidates;
pub mod collocations;
pub mod dictionary;
pub mod embedding;
pub mod error;
pub mod model_cache;
pub mod registry;
pub mod searcher;
pub mod similarity;
pub mod syntax;
pub mod types;

pub use error::{AppError, ErrorKind, Result, StatusCategory};
pub use registry::{ModelConf, ModelKey, ModelRegistry};
pub use searcher::{LocalSearcher, WordSimSearcher};
pub use types::{DictItem, LemmaInfo, ModelInfo, ResultRow, SimilarityQuery, SimpleCollocation};
