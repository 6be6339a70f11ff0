//! Corpus syntax database reached over HTTP
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `GET lemmas?prefix=<word>` lemma variants
//! - `GET lemmas/<tokenId>/deprels` deprel values of a lemma
//! - `GET lemmas/<tokenId>/props` pos / freq / text type of a lemma
//! - `GET collocations/<word>?<options>` ranked collocates

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use wordsim_core::syntax::{
    CollocationEngine, CollocationOptions, DeprelValue, LemmaProps, LemmaVariant,
    RawCollocation, StoreError, SyntaxStore, TokenId,
};

use crate::{endpoint, REQUEST_TIMEOUT};

pub struct HttpSyntaxStore {
    client: Client,
    base_url: Url,
}

impl HttpSyntaxStore {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid syntax database URL '{}'", base_url))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, StoreError> {
        let url = endpoint(&self.base_url, segments)
            .ok_or_else(|| StoreError::Unavailable(format!("unusable base URL {}", self.base_url)))?;
        debug!(url = %url, "syntax database request");

        let response = self
            .client
            .get(url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", url, e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "{} responded with status {}",
                url, status
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(format!("{}: {}", url, e)))
    }
}

fn option_params(options: &CollocationOptions) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", options.limit.to_string()),
        ("sortBy", options.sort_by.as_str().to_string()),
    ];
    if let Some(pos) = &options.pos {
        params.push(("pos", pos.clone()));
    }
    if let Some(text_type) = &options.text_type {
        params.push(("textType", text_type.clone()));
    }
    if let Some(predefined) = options.predefined {
        params.push(("predefined", predefined.as_str().to_string()));
    }
    if let Some(dist) = options.max_avg_distance {
        params.push(("maxAvgDistance", dist.to_string()));
    }
    params
}

#[async_trait]
impl SyntaxStore for HttpSyntaxStore {
    async fn lemmas_by_prefix(&self, prefix: &str) -> Result<Vec<LemmaVariant>, StoreError> {
        self.get_json(&["lemmas"], &[("prefix", prefix.to_string())])
            .await
    }

    async fn deprel_values(&self, token: TokenId) -> Result<Vec<DeprelValue>, StoreError> {
        let id = token.to_string();
        self.get_json(&["lemmas", &id, "deprels"], &[]).await
    }

    async fn lemma_props(&self, token: TokenId) -> Result<Vec<LemmaProps>, StoreError> {
        let id = token.to_string();
        self.get_json(&["lemmas", &id, "props"], &[]).await
    }
}

#[async_trait]
impl CollocationEngine for HttpSyntaxStore {
    async fn collocations(
        &self,
        word: &str,
        options: &CollocationOptions,
    ) -> Result<Vec<RawCollocation>, StoreError> {
        self.get_json(&["collocations", word], &option_params(options))
            .await
    }
}
