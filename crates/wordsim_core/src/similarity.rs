//! Similarity query orchestration
//!
//! One request fans out into one model lookup per probe. Per-probe neighbour
//! lists are exported into rows, merged by surface word (scores summed,
//! syntactic functions concatenated), re-ranked and truncated.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::candidates::CandidateGenerator;
use crate::embedding::{ModelError, Neighbor};
use crate::error::{AppError, Result};
use crate::model_cache::ModelCache;
use crate::syntax::CorpusStores;
use crate::types::{ResultRow, SimilarityQuery};

pub struct SimilarityQueryEngine {
    cache: Arc<ModelCache>,
    candidates: CandidateGenerator,
}

impl SimilarityQueryEngine {
    pub fn new(cache: Arc<ModelCache>, stores: Arc<CorpusStores>) -> Self {
        Self {
            cache,
            candidates: CandidateGenerator::new(stores),
        }
    }

    pub async fn similarly_used_words(&self, query: &SimilarityQuery) -> Result<Vec<ResultRow>> {
        let conf = self
            .cache
            .registry()
            .find(&query.corpus, &query.model)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "model {}/{} not found",
                    query.corpus, query.model
                ))
            })?;

        let explicit = query.probe.as_deref().filter(|p| !p.is_empty());
        if explicit.is_some() && !conf.contains_pos {
            return Err(AppError::invalid_arguments(
                "model does not support setting a syntactic probe",
            ));
        }

        let probes = self.candidates.probes(&conf, explicit, &query.word).await?;
        if probes.is_empty() {
            debug!(model = %conf.key(), word = %query.word, "no probe candidates");
            return Ok(Vec::new());
        }

        // Results come back in candidate order regardless of completion order.
        let k = query.limit.saturating_add(1);
        let lookups = probes
            .iter()
            .map(|probe| self.cache.query(&conf, &query.word, probe, k));
        let results = join_all(lookups).await;

        let mut exported = Vec::new();
        let mut not_found = 0usize;
        for (probe, result) in probes.iter().zip(results) {
            match result {
                Ok(neighbors) => exported.extend(export_rows(&neighbors, query.min_score)),
                Err(e) if e.is_word_not_found() => {
                    debug!(model = %conf.key(), probe = %probe, "probe not in vocabulary");
                    not_found += 1;
                }
                Err(e @ ModelError::ModelNotFound(_)) => {
                    return Err(AppError::not_found(format!("model {} not found", conf.key()))
                        .with_cause(e));
                }
                Err(e) => {
                    return Err(AppError::internal(format!(
                        "failed to evaluate similarity query on {}",
                        conf.key()
                    ))
                    .with_cause(e));
                }
            }
        }

        let rows = merge_rows(exported, &query.word, query.limit);
        if rows.is_empty() && not_found == probes.len() {
            return Err(AppError::not_found(format!(
                "no similarly used words found for '{}'",
                query.word
            )));
        }
        Ok(rows)
    }
}

/// Turn one probe's neighbour list into rows.
///
/// Lists with fewer than two neighbours carry no usable signal and are
/// dropped. A token's trailing `_TAG` becomes the row's syntactic function.
pub fn export_rows(neighbors: &[Neighbor], min_score: f32) -> Vec<ResultRow> {
    if neighbors.len() < 2 {
        return Vec::new();
    }
    neighbors
        .iter()
        .filter(|n| n.score >= min_score)
        .map(|n| {
            let (word, syntax_fn) = match n.word.rsplit_once('_') {
                Some((word, tag)) if !tag.is_empty() => (word, vec![tag.to_string()]),
                Some((word, _)) => (word, Vec::new()),
                None => (n.word.as_str(), Vec::new()),
            };
            ResultRow {
                word: word.to_string(),
                syntax_fn,
                score: n.score,
            }
        })
        .collect()
}

/// Group rows by word (skipping the query word), sum scores, concatenate
/// syntactic functions, sort by score descending and keep `limit` rows.
/// Ties keep first-occurrence order.
pub fn merge_rows(rows: Vec<ResultRow>, query_word: &str, limit: usize) -> Vec<ResultRow> {
    let mut merged: Vec<ResultRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        if row.word == query_word {
            continue;
        }
        match index.get(&row.word) {
            Some(&i) => {
                let entry = &mut merged[i];
                entry.syntax_fn.extend(row.syntax_fn);
                entry.score += row.score;
            }
            None => {
                index.insert(row.word.clone(), merged.len());
                merged.push(row);
            }
        }
    }

    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn n(word: &str, score: f32) -> Neighbor {
        Neighbor {
            word: word.to_string(),
            score,
        }
    }

    fn row(word: &str, tag: &str, score: f32) -> ResultRow {
        ResultRow {
            word: word.to_string(),
            syntax_fn: vec![tag.to_string()],
            score,
        }
    }

    #[test]
    fn single_neighbor_lists_are_dropped() {
        assert!(export_rows(&[n("lake_N", 1.0)], 0.0).is_empty());
        assert!(export_rows(&[], 0.0).is_empty());
    }

    #[test]
    fn export_splits_trailing_tag() {
        let rows = export_rows(&[n("lake_N", 1.0), n("new_york_nmod", 0.5), n("pond", 0.4)], 0.0);
        assert_eq!(rows[0].word, "lake");
        assert_eq!(rows[0].syntax_fn, vec!["N"]);
        assert_eq!(rows[1].word, "new_york");
        assert_eq!(rows[1].syntax_fn, vec!["nmod"]);
        assert_eq!(rows[2].word, "pond");
        assert!(rows[2].syntax_fn.is_empty());
    }

    #[test]
    fn zero_min_score_keeps_zero_scores() {
        let rows = export_rows(&[n("a", 0.3), n("b", 0.0), n("c", -0.1)], 0.0);
        let words: Vec<_> = rows.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["a", "b"]);
    }

    #[test]
    fn merge_sums_scores_across_probes() {
        let merged = merge_rows(
            vec![row("pond", "N", 0.80), row("river", "N", 0.9), row("pond", "V", 0.55)],
            "lake",
            10,
        );
        assert_eq!(merged[0].word, "pond");
        assert!((merged[0].score - 1.35).abs() < 1e-6);
        assert_eq!(merged[0].syntax_fn, vec!["N", "V"]);
        assert_eq!(merged[1].word, "river");
    }

    #[test]
    fn merge_excludes_query_word_case_sensitively() {
        let merged = merge_rows(
            vec![row("lake", "N", 1.0), row("Lake", "N", 0.9), row("pond", "N", 0.8)],
            "lake",
            10,
        );
        let words: Vec<_> = merged.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["Lake", "pond"]);
    }

    #[test]
    fn merge_ties_keep_insertion_order() {
        let merged = merge_rows(
            vec![row("b", "N", 0.5), row("a", "N", 0.5), row("c", "V", 0.5)],
            "x",
            2,
        );
        let words: Vec<_> = merged.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["b", "a"]);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<ResultRow>> {
        prop::collection::vec(
            (prop::sample::select(vec!["lake", "pond", "sea", "river", "bay"]), 0u8..4, 0u32..1000),
            0..40,
        )
        .prop_map(|items| {
            items
                .into_iter()
                .map(|(w, t, s)| row(w, &format!("t{t}"), s as f32 / 1000.0))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn merged_rows_are_unique_bounded_and_sorted(rows in arb_rows(), limit in 0usize..6) {
            let merged = merge_rows(rows, "lake", limit);
            prop_assert!(merged.len() <= limit);
            prop_assert!(merged.iter().all(|r| r.word != "lake"));
            for pair in merged.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
            let mut words: Vec<_> = merged.iter().map(|r| r.word.clone()).collect();
            words.sort();
            words.dedup();
            prop_assert_eq!(words.len(), merged.len());
        }

        #[test]
        fn merged_score_is_sum_of_parts(rows in arb_rows()) {
            let merged = merge_rows(rows.clone(), "lake", usize::MAX);
            for m in &merged {
                let expected: f32 = rows.iter().filter(|r| r.word == m.word).map(|r| r.score).sum();
                let parts = rows.iter().filter(|r| r.word == m.word).count();
                prop_assert!((m.score - expected).abs() < 1e-4);
                prop_assert_eq!(m.syntax_fn.len(), parts);
            }
        }
    }
}
