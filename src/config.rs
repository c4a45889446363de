use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str = "https://search.brave.com/search";

/// Options for a single search invocation. Built once, then handed to every
/// component by reference; nothing reads defaults on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of search snippets turned into candidate URLs.
    pub max_results: usize,
    /// Page content is cut to this many words.
    pub page_content_words_limit: usize,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Comma separated origins (substring match) that are never fetched.
    pub ignored_websites: String,
    /// Emit a citation event for every processed page.
    pub citation_links: bool,
    pub max_concurrent_requests: usize,
    /// Run the summarizer (main points and categories) on page content.
    pub summarize_content: bool,
    pub max_main_points: usize,
    pub excerpt_length: usize,
    pub search_url: String,
    /// Return results in candidate order instead of completion order.
    pub preserve_order: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_results: 5,
            page_content_words_limit: 5000,
            timeout: 20,
            ignored_websites: String::new(),
            citation_links: true,
            max_concurrent_requests: 3,
            summarize_content: true,
            max_main_points: 5,
            excerpt_length: 200,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            preserve_order: false,
        }
    }
}

impl Config {
    /// Reads `WEBSIFT_*` variables (and a `.env` file if present), falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        let defaults = Config::default();
        let config = Config {
            max_results: get_env_or_default("WEBSIFT_MAX_RESULTS", defaults.max_results)?,
            page_content_words_limit: get_env_or_default(
                "WEBSIFT_PAGE_CONTENT_WORDS_LIMIT",
                defaults.page_content_words_limit,
            )?,
            timeout: get_env_or_default("WEBSIFT_TIMEOUT", defaults.timeout)?,
            ignored_websites: get_env_or_default(
                "WEBSIFT_IGNORED_WEBSITES",
                defaults.ignored_websites,
            )?,
            citation_links: get_env_or_default("WEBSIFT_CITATION_LINKS", defaults.citation_links)?,
            max_concurrent_requests: get_env_or_default(
                "WEBSIFT_MAX_CONCURRENT_REQUESTS",
                defaults.max_concurrent_requests,
            )?,
            summarize_content: get_env_or_default(
                "WEBSIFT_SUMMARIZE_CONTENT",
                defaults.summarize_content,
            )?,
            max_main_points: get_env_or_default("WEBSIFT_MAX_MAIN_POINTS", defaults.max_main_points)?,
            excerpt_length: get_env_or_default("WEBSIFT_EXCERPT_LENGTH", defaults.excerpt_length)?,
            search_url: get_env_or_default("WEBSIFT_SEARCH_URL", defaults.search_url)?,
            preserve_order: get_env_or_default("WEBSIFT_PRESERVE_ORDER", defaults.preserve_order)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_requests == 0 {
            bail!("max_concurrent_requests must be at least 1");
        }
        if self.timeout == 0 {
            bail!("timeout must be at least 1 second");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// The ignore list split on commas, trimmed, empty entries dropped.
    pub fn ignored_sites(&self) -> Vec<String> {
        self.ignored_websites
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

fn get_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_or_default(key, env::var(key).ok(), default)
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
