//! Collocation forwarding
//!
//! Options travel to the corpus collocation engine unchanged; its records
//! are reshaped into [`SimpleCollocation`] with rounded scores.

use std::sync::Arc;

use tracing::debug;

use crate::error::{AppError, Result};
use crate::syntax::{CollocationOptions, CorpusStores, RawCollocation};
use crate::types::SimpleCollocation;

pub struct CollocationForwarder {
    stores: Arc<CorpusStores>,
}

impl CollocationForwarder {
    pub fn new(stores: Arc<CorpusStores>) -> Self {
        Self { stores }
    }

    pub async fn collocations(
        &self,
        corpus: &str,
        word: &str,
        options: &CollocationOptions,
    ) -> Result<Vec<SimpleCollocation>> {
        let store = self.stores.get(corpus).ok_or_else(|| {
            AppError::not_found(format!("collocations dataset {} not found", corpus))
        })?;
        if options.limit == 0 {
            return Err(AppError::invalid_arguments("limit must be a positive number"));
        }

        debug!(corpus, word, options = ?options, "forwarding collocation query");
        let records = store.collocations(word, options).await.map_err(|e| {
            AppError::internal(format!(
                "failed to get collocations of '{}' in {}",
                word, corpus
            ))
            .with_cause(e)
        })?;
        Ok(records.into_iter().map(simplify).collect())
    }
}

fn simplify(raw: RawCollocation) -> SimpleCollocation {
    SimpleCollocation {
        search_match: raw.lemma,
        collocate: raw.collocate,
        deprel: raw.deprel,
        log_dice: round_to(raw.log_dice, 100.0),
        t_score: round_to(raw.t_score, 100.0),
        lmi: round_to(raw.lmi, 100.0),
        rrf: round_to(raw.rrf, 1000.0),
        mutual_dist: finite(raw.mutual_dist),
    }
}

fn round_to(value: f64, scale: f64) -> f64 {
    finite((value * scale).round() / scale)
}

/// JSON has no NaN or infinity
fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
