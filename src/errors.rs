use reqwest::StatusCode;
use thiserror::Error;

/// Failure of the initial search request. Fatal to the whole invocation.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("search engine returned HTTP {0}")]
    Status(StatusCode),
    #[error("invalid search url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failure of a single page fetch. Never escapes the fetcher during a search.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{url} is on the ignore list")]
    Ignored { url: String },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Request(e) if e.is_timeout())
    }
}
