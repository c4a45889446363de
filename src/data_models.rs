use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::FetchError;

/// Summarized record for one fetched page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PageResult {
    pub title: String,
    pub url: String,
    pub description: String,
    pub main_points: Vec<String>,
    pub categories: BTreeMap<String, String>,
    pub content: String,
    pub excerpt: String,
}

/// What became of a single candidate URL.
#[derive(Debug)]
pub enum PageOutcome {
    Fetched(PageResult),
    /// Origin matched the ignore list; no request was made.
    Ignored,
    Failed(FetchError),
}

impl PageOutcome {
    pub fn into_page(self) -> Option<PageResult> {
        match self {
            PageOutcome::Fetched(page) => Some(page),
            PageOutcome::Ignored | PageOutcome::Failed(_) => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub query: String,
    pub timestamp: String,
    pub total_results: usize,
    pub results: Vec<PageResult>,
}

impl ResponseEnvelope {
    pub fn new(query: impl Into<String>, results: Vec<PageResult>) -> ResponseEnvelope {
        ResponseEnvelope {
            query: query.into(),
            timestamp: now_rfc3339(),
            total_results: results.len(),
            results,
        }
    }
}

/// Top level return value. Serializes either as the envelope itself or as
/// `{"error": "..."}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SearchOutcome {
    Envelope(ResponseEnvelope),
    Error { error: String },
}

impl SearchOutcome {
    pub fn error(message: impl Into<String>) -> SearchOutcome {
        SearchOutcome::Error {
            error: message.into(),
        }
    }

    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match self {
            SearchOutcome::Envelope(envelope) => Some(envelope),
            SearchOutcome::Error { .. } => None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("Error serializing response: {e}") }).to_string()
        })
    }
}

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
