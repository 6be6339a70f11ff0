//! REST API
//!
//! ```text
//! GET /health
//! GET /dataset/:corpusId
//! GET /dataset/:corpusId/similarWords
//! GET /dataset/:corpusId/similarWords/:modelId
//! GET /dataset/:corpusId/similarWords/:modelId/:word[/:fn]   ?limit&minScore
//! GET /dataset/:corpusId/collocations/:word[/:pos]           ?limit&sortBy&textType&maxAvgDist
//! GET /dataset/:corpusId/collocationsOfType/:type/:word[/:pos]
//! GET /dataset/:corpusId/dictionary/:word
//! ```
//!
//! Failures are JSON `{"error": ..., "kind": ...}` with the status picked by
//! the core error classifier.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::build_router;
