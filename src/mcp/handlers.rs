//! Tool call handlers
//!
//! Every tool answers with a text block of ranked lines. Argument problems
//! and searcher failures become `isError` results, never protocol errors.

use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::info;

use wordsim_core::syntax::{CollocationOptions, SortMeasure};
use wordsim_core::{ModelInfo, ResultRow, SimilarityQuery, SimpleCollocation, WordSimSearcher};

use super::protocol::ToolCallResult;
use super::tools::{DEFAULT_LIMIT, DEFAULT_MIN_SCORE};

pub struct ToolHandlers {
    searcher: Arc<dyn WordSimSearcher>,
}

impl ToolHandlers {
    pub fn new(searcher: Arc<dyn WordSimSearcher>) -> Self {
        Self { searcher }
    }

    /// Handle a tool call by name
    pub async fn handle(&self, name: &str, args: Value) -> ToolCallResult {
        info!(tool = name, "tool invoked");
        match self.dispatch(name, args).await {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => ToolCallResult::error(format!("Error: {}", e)),
        }
    }

    async fn dispatch(&self, name: &str, args: Value) -> Result<String> {
        match name {
            "similarly_used_words" => self.similarly_used_words(&args).await,
            "list_models" => self.list_models(&args).await,
            "collocations" => self.collocations(&args).await,
            _ => Err(anyhow!("Unknown tool: {}", name)),
        }
    }

    async fn similarly_used_words(&self, args: &Value) -> Result<String> {
        let dataset = required_str(args, "dataset_id")?;
        let model = required_str(args, "model_id")?;
        let word = required_str(args, "word")?;
        let limit = optional_usize(args, "limit")?.unwrap_or(DEFAULT_LIMIT);
        let min_score = args["min_score"].as_f64().unwrap_or(DEFAULT_MIN_SCORE);

        let mut query = SimilarityQuery::new(dataset, model, word)
            .with_limit(limit)
            .with_min_score(min_score as f32);
        query.probe = args["pos_or_sfn"]
            .as_str()
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let rows = self.searcher.similarly_used_words(&query).await?;
        Ok(format_rows(&rows))
    }

    async fn list_models(&self, args: &Value) -> Result<String> {
        let dataset = required_str(args, "dataset_id")?;
        let models = self.searcher.list_models(dataset).await?;
        Ok(format_models(&models))
    }

    async fn collocations(&self, args: &Value) -> Result<String> {
        let dataset = required_str(args, "dataset_id")?;
        let word = required_str(args, "word")?;
        let mut options = CollocationOptions {
            pos: args["pos"].as_str().map(str::to_string),
            limit: optional_usize(args, "limit")?.unwrap_or(DEFAULT_LIMIT),
            ..Default::default()
        };
        if let Some(sort_by) = args["sort_by"].as_str() {
            options.sort_by = SortMeasure::from_str(sort_by).map_err(|e| anyhow!(e))?;
        }
        let colls = self.searcher.collocations(dataset, word, &options).await?;
        Ok(format_collocations(&colls, options.sort_by))
    }
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args[name]
        .as_str()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("required argument \"{}\" not found", name))
}

fn optional_usize(args: &Value, name: &str) -> Result<Option<usize>> {
    match &args[name] {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .map(|v| Some(v as usize))
            .ok_or_else(|| anyhow!("argument \"{}\" must be a non-negative integer", name)),
        _ => Err(anyhow!("argument \"{}\" must be a number", name)),
    }
}

pub fn format_rows(rows: &[ResultRow]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "{}. {} (score {:.2})", i + 1, row.word, row.score);
    }
    out
}

pub fn format_models(models: &[ModelInfo]) -> String {
    let mut out = String::new();
    for model in models {
        let _ = match &model.error {
            Some(err) => writeln!(out, "{} (unavailable: {})", model.name, err),
            None => writeln!(
                out,
                "{} ({} words): {}",
                model.name, model.size, model.description
            ),
        };
    }
    out
}

pub fn format_collocations(colls: &[SimpleCollocation], sort_by: SortMeasure) -> String {
    let mut out = String::new();
    for (i, c) in colls.iter().enumerate() {
        let score = match sort_by {
            SortMeasure::LogDice => c.log_dice,
            SortMeasure::TScore => c.t_score,
            SortMeasure::Lmi => c.lmi,
            SortMeasure::Rrf => c.rrf,
        };
        let _ = writeln!(
            out,
            "{}. {} [{}, {}] ({} {})",
            i + 1,
            c.collocate.value,
            c.collocate.pos,
            c.deprel,
            sort_by.as_str(),
            score
        );
    }
    out
}
