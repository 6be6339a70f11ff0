//! REST routes over a [`WordSimSearcher`].

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::{json, Value};

use wordsim_core::syntax::{CollocationOptions, PredefinedSearch, SortMeasure};
use wordsim_core::{
    AppError, DictItem, ModelConf, ModelInfo, ResultRow, SimilarityQuery, SimpleCollocation,
    WordSimSearcher,
};

use crate::api::error::ApiError;
use crate::config::CorpusInfo;

type Searcher = Arc<dyn WordSimSearcher>;
type Corpora = Arc<HashMap<String, CorpusInfo>>;
type Params = HashMap<String, String>;
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Build the API router. `corpora` backs the corpus info endpoint.
pub fn build_router(searcher: Searcher, corpora: HashMap<String, CorpusInfo>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dataset/:corpus_id", get(corpus_info))
        .route("/dataset/:corpus_id/similarWords", get(list_models))
        .route("/dataset/:corpus_id/similarWords/:model_id", get(model_info))
        .route(
            "/dataset/:corpus_id/similarWords/:model_id/:word",
            get(similar_words),
        )
        .route(
            "/dataset/:corpus_id/similarWords/:model_id/:word/:fn",
            get(similar_words_of_fn),
        )
        .route("/dataset/:corpus_id/collocations/:word", get(collocations))
        .route(
            "/dataset/:corpus_id/collocations/:word/:pos",
            get(collocations_of_pos),
        )
        .route(
            "/dataset/:corpus_id/collocationsOfType/:type/:word",
            get(collocations_of_type),
        )
        .route(
            "/dataset/:corpus_id/collocationsOfType/:type/:word/:pos",
            get(collocations_of_type_and_pos),
        )
        .route("/dataset/:corpus_id/dictionary/:word", get(dictionary))
        .layer(Extension(searcher))
        .layer(Extension(Arc::new(corpora)))
}

fn param<T: FromStr>(params: &Params, name: &str) -> Result<Option<T>, AppError> {
    params
        .get(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| AppError::invalid_arguments(format!("invalid value of '{}'", name)))
        })
        .transpose()
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn corpus_info(
    Extension(corpora): Extension<Corpora>,
    Path(corpus): Path<String>,
) -> ApiResult<CorpusInfo> {
    corpora
        .get(&corpus)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("corpus {} not found", corpus)).into())
}

async fn list_models(
    Extension(searcher): Extension<Searcher>,
    Path(corpus): Path<String>,
) -> ApiResult<Vec<ModelInfo>> {
    Ok(Json(searcher.list_models(&corpus).await?))
}

async fn model_info(
    Extension(searcher): Extension<Searcher>,
    Path((corpus, model)): Path<(String, String)>,
) -> ApiResult<ModelConf> {
    Ok(Json(searcher.model_info(&corpus, &model).await?))
}

async fn similar_words(
    Extension(searcher): Extension<Searcher>,
    Path((corpus, model, word)): Path<(String, String, String)>,
    Query(params): Query<Params>,
) -> ApiResult<Vec<ResultRow>> {
    similar(searcher, corpus, model, word, None, params).await
}

async fn similar_words_of_fn(
    Extension(searcher): Extension<Searcher>,
    Path((corpus, model, word, probe)): Path<(String, String, String, String)>,
    Query(params): Query<Params>,
) -> ApiResult<Vec<ResultRow>> {
    similar(searcher, corpus, model, word, Some(probe), params).await
}

async fn similar(
    searcher: Searcher,
    corpus: String,
    model: String,
    word: String,
    probe: Option<String>,
    params: Params,
) -> ApiResult<Vec<ResultRow>> {
    let limit = param::<usize>(&params, "limit")?.unwrap_or(10);
    if limit == 0 {
        return Err(AppError::invalid_arguments("invalid value of 'limit'").into());
    }
    let min_score = param::<f32>(&params, "minScore")?.unwrap_or(0.0);

    let mut query = SimilarityQuery::new(&corpus, &model, &word)
        .with_limit(limit)
        .with_min_score(min_score);
    query.probe = probe;
    Ok(Json(searcher.similarly_used_words(&query).await?))
}

fn collocation_options(
    params: &Params,
    pos: Option<String>,
    predefined: Option<PredefinedSearch>,
) -> Result<CollocationOptions, AppError> {
    let defaults = CollocationOptions::default();
    let sort_by = match params.get("sortBy") {
        Some(raw) => SortMeasure::from_str(raw).map_err(AppError::invalid_arguments)?,
        None => defaults.sort_by,
    };
    Ok(CollocationOptions {
        pos,
        limit: param::<usize>(params, "limit")?.unwrap_or(defaults.limit),
        sort_by,
        text_type: params.get("textType").cloned(),
        predefined,
        max_avg_distance: param::<f64>(params, "maxAvgDist")?,
    })
}

async fn collocations(
    Extension(searcher): Extension<Searcher>,
    Path((corpus, word)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> ApiResult<Vec<SimpleCollocation>> {
    let options = collocation_options(&params, None, None)?;
    Ok(Json(searcher.collocations(&corpus, &word, &options).await?))
}

async fn collocations_of_pos(
    Extension(searcher): Extension<Searcher>,
    Path((corpus, word, pos)): Path<(String, String, String)>,
    Query(params): Query<Params>,
) -> ApiResult<Vec<SimpleCollocation>> {
    let options = collocation_options(&params, Some(pos), None)?;
    Ok(Json(searcher.collocations(&corpus, &word, &options).await?))
}

async fn collocations_of_type(
    Extension(searcher): Extension<Searcher>,
    Path((corpus, kind, word)): Path<(String, String, String)>,
    Query(params): Query<Params>,
) -> ApiResult<Vec<SimpleCollocation>> {
    let predefined = PredefinedSearch::from_str(&kind).map_err(AppError::invalid_arguments)?;
    let options = collocation_options(&params, None, Some(predefined))?;
    Ok(Json(searcher.collocations(&corpus, &word, &options).await?))
}

async fn collocations_of_type_and_pos(
    Extension(searcher): Extension<Searcher>,
    Path((corpus, kind, word, pos)): Path<(String, String, String, String)>,
    Query(params): Query<Params>,
) -> ApiResult<Vec<SimpleCollocation>> {
    let predefined = PredefinedSearch::from_str(&kind).map_err(AppError::invalid_arguments)?;
    let options = collocation_options(&params, Some(pos), Some(predefined))?;
    Ok(Json(searcher.collocations(&corpus, &word, &options).await?))
}

async fn dictionary(
    Extension(searcher): Extension<Searcher>,
    Path((corpus, word)): Path<(String, String)>,
) -> ApiResult<Vec<DictItem>> {
    Ok(Json(searcher.dictionary(&corpus, &word).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn collocation_options_from_query() {
        let opts = collocation_options(
            &params(&[("limit", "5"), ("sortBy", "ldice"), ("maxAvgDist", "2.5")]),
            Some("NOUN".into()),
            None,
        )
        .unwrap();
        assert_eq!(opts.limit, 5);
        assert_eq!(opts.sort_by, SortMeasure::LogDice);
        assert_eq!(opts.max_avg_distance, Some(2.5));
        assert_eq!(opts.pos.as_deref(), Some("NOUN"));
    }

    #[test]
    fn bad_params_are_invalid_arguments() {
        let err = collocation_options(&params(&[("limit", "many")]), None, None).unwrap_err();
        assert_eq!(err.message(), "invalid value of 'limit'");
        assert!(collocation_options(&params(&[("sortBy", "ll")]), None, None).is_err());
    }
}
