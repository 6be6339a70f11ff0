//! HttpSearcher: the WordSimSearcher contract forwarded to a wsserver REST API.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use wordsim_core::error::{classify_tag, AppError, Result, StatusCategory};
use wordsim_core::syntax::CollocationOptions;
use wordsim_core::{
    DictItem, ModelConf, ModelInfo, ResultRow, SimilarityQuery, SimpleCollocation,
    WordSimSearcher,
};

use crate::{endpoint, REQUEST_TIMEOUT};

/// Error body produced by the REST API
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    kind: String,
}

pub struct HttpSearcher {
    client: Client,
    base_url: Url,
}

impl HttpSearcher {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid server URL '{}'", base_url))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.base_url, segments).ok_or_else(|| {
            AppError::internal(format!("failed to create API URL from {}", self.base_url))
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T> {
        debug!(url = %url, "remote searcher request");
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("request to {} failed", url)).with_cause(e))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                AppError::internal(format!("failed to decode response of {}", url)).with_cause(e)
            });
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        Err(remote_error(status.as_u16(), body))
    }
}

/// Rebuild an AppError from a failed response. The `kind` tag wins over
/// the status code when present.
fn remote_error(status: u16, body: ErrorBody) -> AppError {
    let category = if body.kind.is_empty() {
        StatusCategory::from_http_status(status)
    } else {
        classify_tag(&body.kind)
    };
    let message = if body.error.is_empty() {
        format!("remote searcher responded with status {}", status)
    } else {
        body.error
    };
    AppError::new(category.error_kind(), message)
}

fn collocation_params(options: &CollocationOptions) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", options.limit.to_string()),
        ("sortBy", options.sort_by.as_str().to_string()),
    ];
    if let Some(text_type) = &options.text_type {
        params.push(("textType", text_type.clone()));
    }
    if let Some(dist) = options.max_avg_distance {
        params.push(("maxAvgDist", dist.to_string()));
    }
    params
}

#[async_trait]
impl WordSimSearcher for HttpSearcher {
    async fn list_models(&self, corpus: &str) -> Result<Vec<ModelInfo>> {
        let url = self.url(&["dataset", corpus, "similarWords"])?;
        self.get_json(url, &[]).await
    }

    async fn model_info(&self, corpus: &str, model: &str) -> Result<ModelConf> {
        let url = self.url(&["dataset", corpus, "similarWords", model])?;
        self.get_json(url, &[]).await
    }

    async fn similarly_used_words(&self, query: &SimilarityQuery) -> Result<Vec<ResultRow>> {
        let mut segments = vec![
            "dataset",
            query.corpus.as_str(),
            "similarWords",
            query.model.as_str(),
            query.word.as_str(),
        ];
        if let Some(probe) = query.probe.as_deref().filter(|p| !p.is_empty()) {
            segments.push(probe);
        }
        let url = self.url(&segments)?;
        let params = [
            ("limit", query.limit.to_string()),
            ("minScore", query.min_score.to_string()),
        ];
        self.get_json(url, &params).await
    }

    async fn collocations(
        &self,
        corpus: &str,
        word: &str,
        options: &CollocationOptions,
    ) -> Result<Vec<SimpleCollocation>> {
        let predefined = options.predefined.map(|p| p.as_str());
        let mut segments = match predefined {
            Some(kind) => vec!["dataset", corpus, "collocationsOfType", kind, word],
            None => vec!["dataset", corpus, "collocations", word],
        };
        if let Some(pos) = options.pos.as_deref().filter(|p| !p.is_empty()) {
            segments.push(pos);
        }
        let url = self.url(&segments)?;
        self.get_json(url, &collocation_params(options)).await
    }

    async fn dictionary(&self, corpus: &str, word: &str) -> Result<Vec<DictItem>> {
        let url = self.url(&["dataset", corpus, "dictionary", word])?;
        self.get_json(url, &[]).await
    }
}
