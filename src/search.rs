//! Brave Search desktop results page scraping.

use std::sync::Arc;

use anyhow::Result;
use reqwest::Url;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use scraper::{ElementRef, Html};

use crate::config::Config;
use crate::errors::SearchError;
use crate::fetcher::parse_selector;

const SNIPPET_SELECTOR: &str = "div.snippet";

const SEARCH_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const SEARCH_ACCEPT_LANGUAGE: &str = "en-GB,en;q=0.8";
const SEARCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";
const BROWSER_HINTS: [(&str, &str); 4] = [
    (
        "sec-ch-ua",
        r#""Brave";v="135", "Not-A.Brand";v="8", "Chromium";v="135""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", r#""Windows""#),
    ("sec-gpc", "1"),
];

pub struct SearchClient {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl SearchClient {
    pub fn new(config: Arc<Config>) -> Result<SearchClient> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(SEARCH_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(SEARCH_ACCEPT_LANGUAGE));
        headers.insert(USER_AGENT, HeaderValue::from_static(SEARCH_USER_AGENT));
        for (name, value) in BROWSER_HINTS {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;
        Ok(SearchClient { client, config })
    }

    pub fn search_url(&self, query: &str) -> Result<Url, SearchError> {
        Url::parse_with_params(
            &self.config.search_url,
            &[("q", query), ("source", "desktop")],
        )
        .map_err(|e| SearchError::InvalidUrl {
            url: self.config.search_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Candidate result urls, in listing order, at most `max_results`.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let url = self.search_url(query)?;
        log::info!("searching: {url}");

        let res = self.client.get(url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }
        let body = res.text().await?;

        let urls = extract_result_urls(&body, &url, self.config.max_results);
        log::info!("found {} candidate urls for {query:?}", urls.len());
        Ok(urls)
    }
}

/// Walks the document in order, remembering the last `<a>` seen. Each of the
/// first `limit` snippets with text yields that link's href, resolved against
/// `base`.
pub fn extract_result_urls(html: &str, base: &Url, limit: usize) -> Vec<String> {
    let Some(snippet_selector) = parse_selector(SNIPPET_SELECTOR) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    let mut urls = Vec::new();
    let mut last_href: Option<String> = None;
    let mut snippets_seen = 0;

    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if snippet_selector.matches(&element) {
            if snippets_seen == limit {
                break;
            }
            snippets_seen += 1;

            let text = element.text().collect::<String>();
            if text.trim().is_empty() {
                continue;
            }
            match &last_href {
                Some(href) => urls.push(resolve(base, href)),
                None => log::debug!("snippet without a preceding link, skipping"),
            }
        }
        // checked after the snippet itself so links inside it only count for later snippets
        if element.value().name() == "a" {
            last_href = element.value().attr("href").map(|h| h.to_string());
        }
    }

    urls
}

fn resolve(base: &Url, href: &str) -> String {
    match base.join(href) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    }
}
