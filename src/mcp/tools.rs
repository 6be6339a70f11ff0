//! Tool definitions advertised by the MCP server.

use serde_json::json;

use super::protocol::Tool;

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "similarly_used_words".into(),
            description: "Find words that are similarly used in the dataset".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dataset_id": {
                        "type": "string",
                        "description": "The dataset ID to search in"
                    },
                    "model_id": {
                        "type": "string",
                        "description": "The model ID to use"
                    },
                    "pos_or_sfn": {
                        "type": "string",
                        "description": "Part of speech or syntactic function"
                    },
                    "word": {
                        "type": "string",
                        "description": "The word to find similar usage for"
                    },
                    "limit": {
                        "type": "number",
                        "default": DEFAULT_LIMIT,
                        "description": "Maximum number of results to return"
                    },
                    "min_score": {
                        "type": "number",
                        "default": DEFAULT_MIN_SCORE,
                        "description": "Minimum similarity score threshold"
                    }
                },
                "required": ["dataset_id", "model_id", "word"]
            }),
        },
        Tool {
            name: "list_models".into(),
            description: "List word embedding models available for a dataset".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dataset_id": {
                        "type": "string",
                        "description": "The dataset ID"
                    }
                },
                "required": ["dataset_id"]
            }),
        },
        Tool {
            name: "collocations".into(),
            description: "Find collocates of a word ranked by an association measure".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dataset_id": {
                        "type": "string",
                        "description": "The dataset ID to search in"
                    },
                    "word": {
                        "type": "string",
                        "description": "The lemma to find collocates for"
                    },
                    "pos": {
                        "type": "string",
                        "description": "Part of speech filter"
                    },
                    "limit": {
                        "type": "number",
                        "default": DEFAULT_LIMIT,
                        "description": "Maximum number of results to return"
                    },
                    "sort_by": {
                        "type": "string",
                        "enum": ["logDice", "tscore", "lmi", "rrf"],
                        "default": "rrf",
                        "description": "Association measure used for ranking"
                    }
                },
                "required": ["dataset_id", "word"]
            }),
        },
    ]
}
