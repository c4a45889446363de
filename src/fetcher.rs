use std::sync::Arc;

use anyhow::Result;
use reqwest::Url;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use scraper::{Html, Selector};

use crate::analyzer::{CharacterFilter, HtmlTextFilter, TextNormalizer};
use crate::config::Config;
use crate::data_models::{PageOutcome, PageResult};
use crate::errors::FetchError;
use crate::summarizer::{Summarizer, excerpt};

pub const NO_TITLE: &str = "No title";

const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";
const PAGE_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Title and description pulled out of a page's markup.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

/// Fetches a single page and reduces it to a [`PageResult`].
pub struct PageFetcher {
    client: reqwest::Client,
    config: Arc<Config>,
    ignored_sites: Vec<String>,
    normalizer: TextNormalizer,
    summarizer: Summarizer,
}

impl PageFetcher {
    pub fn new(config: Arc<Config>) -> Result<PageFetcher> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(PAGE_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(PAGE_ACCEPT_LANGUAGE));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(PageFetcher {
            client,
            ignored_sites: config.ignored_sites(),
            normalizer: TextNormalizer::standard()?,
            summarizer: Summarizer::new(config.max_main_points, config.excerpt_length)?,
            config,
        })
    }

    /// Never fails: ignored and broken pages come back as the matching
    /// [`PageOutcome`] variant.
    pub async fn fetch(&self, url: &str) -> PageOutcome {
        match self.try_fetch(url).await {
            Ok(page) => PageOutcome::Fetched(page),
            Err(FetchError::Ignored { .. }) => {
                log::debug!("skipping ignored url: {url}");
                PageOutcome::Ignored
            }
            Err(e) => {
                log::debug!("error fetching page {url}, error: {:#}", e);
                PageOutcome::Failed(e)
            }
        }
    }

    pub async fn try_fetch(&self, url: &str) -> Result<PageResult, FetchError> {
        if self.is_ignored(url) {
            return Err(FetchError::Ignored {
                url: url.to_string(),
            });
        }
        let html = self.fetch_page(url).await?;
        Ok(self.build_result(url, &html))
    }

    /// True when any ignore-list entry is a substring of the url's origin.
    pub fn is_ignored(&self, url: &str) -> bool {
        if self.ignored_sites.is_empty() {
            return false;
        }
        let Some(origin) = origin_of(url) else {
            return false;
        };
        self.ignored_sites.iter().any(|site| origin.contains(site.as_str()))
    }

    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let res = self.client.get(parsed).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        let body = res.text().await?;
        Ok(body)
    }

    pub fn build_result(&self, url: &str, html: &str) -> PageResult {
        let meta = parse_meta(html);
        let text = HtmlTextFilter.filter(html.to_string());
        let content = self
            .normalizer
            .normalize_and_truncate(text, self.config.page_content_words_limit);

        let (main_points, categories, excerpt) = if self.config.summarize_content {
            let summary = self.summarizer.summarize(&content);
            (summary.main_points, summary.categories, summary.excerpt)
        } else {
            (
                Vec::new(),
                Default::default(),
                excerpt(&content, self.config.excerpt_length),
            )
        };

        PageResult {
            title: meta.title,
            url: url.to_string(),
            description: meta.description,
            main_points,
            categories,
            content,
            excerpt,
        }
    }
}

/// `scheme://host[:port]`, or `None` for urls without a host.
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

pub fn parse_meta(html: &str) -> PageMeta {
    let document = Html::parse_document(html);

    let title = select_first(&document, "title")
        .map(|t| collapse_whitespace(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = select_attr(&document, r#"meta[name="description"]"#, "content")
        .or_else(|| select_attr(&document, r#"meta[property="og:description"]"#, "content"))
        .map(|d| collapse_whitespace(&d))
        .unwrap_or_default();

    PageMeta { title, description }
}

fn select_first(document: &Html, selector: &str) -> Option<String> {
    let selector = parse_selector(selector)?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

fn select_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = parse_selector(selector)?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(|v| v.to_string())
        .next()
}

pub(crate) fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(s) => Some(s),
        Err(e) => {
            log::error!("invalid css selector {selector:?}, error: {e}");
            None
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(config: Config) -> PageFetcher {
        PageFetcher::new(Arc::new(config)).unwrap()
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://example.com/a/b?c=d").as_deref(),
            Some("https://example.com")
        );
        assert_eq!(
            origin_of("http://127.0.0.1:8080/x").as_deref(),
            Some("http://127.0.0.1:8080")
        );
        assert_eq!(origin_of("not a url"), None);
        assert_eq!(origin_of("mailto:someone@example.com"), None);
    }

    #[test]
    fn test_is_ignored_matches_origin_only() {
        let f = fetcher(Config {
            ignored_websites: "example.com, wikipedia".to_string(),
            ..Default::default()
        });
        assert!(f.is_ignored("https://example.com/page"));
        assert!(f.is_ignored("https://www.example.com/"));
        assert!(f.is_ignored("https://en.wikipedia.org/wiki/Paris"));
        // the path is not part of the origin
        assert!(!f.is_ignored("https://other.org/example.com"));
        assert!(!f.is_ignored("https://rust-lang.org"));
    }

    #[test]
    fn test_empty_ignore_list() {
        let f = fetcher(Config::default());
        assert!(!f.is_ignored("https://example.com"));
    }

    #[test]
    fn test_parse_meta() {
        let html = r#"<html><head><title>  Hello
            World </title><meta name="description" content="A page about things"></head>
            <body><p>x</p></body></html>"#;
        let meta = parse_meta(html);
        assert_eq!(meta.title, "Hello World");
        assert_eq!(meta.description, "A page about things");
    }

    #[test]
    fn test_parse_meta_fallbacks() {
        let meta = parse_meta("<html><body><p>no head here</p></body></html>");
        assert_eq!(meta.title, NO_TITLE);
        assert_eq!(meta.description, "");

        let og = parse_meta(
            r#"<html><head><title></title><meta property="og:description" content="From OG"></head></html>"#,
        );
        assert_eq!(og.title, NO_TITLE);
        assert_eq!(og.description, "From OG");
    }

    #[test]
    fn test_build_result() {
        let f = fetcher(Config {
            page_content_words_limit: 12,
            ..Default::default()
        });
        let html = r#"<html><head><title>Paris</title></head><body>
            <h1>Paris 🗼</h1>
            <p>Paris is the capital and largest city of France. It has many museums.</p>
            <script>var x = 1;</script>
            </body></html>"#;
        let page = f.build_result("https://example.org/paris", html);
        assert_eq!(page.title, "Paris");
        assert_eq!(page.url, "https://example.org/paris");
        assert_eq!(
            page.content,
            "Paris Paris is the capital and largest city of France. It has"
        );
        assert_eq!(page.excerpt, page.content);
        assert_eq!(
            page.main_points,
            vec!["Paris Paris is the capital and largest city of France"]
        );
        assert!(page.categories.contains_key("overview"));
    }

    #[test]
    fn test_build_result_without_summary() {
        let f = fetcher(Config {
            summarize_content: false,
            ..Default::default()
        });
        let html = "<html><body><p>Rust is a language that is fast and safe.</p></body></html>";
        let page = f.build_result("https://example.org", html);
        assert!(page.main_points.is_empty());
        assert!(page.categories.is_empty());
        assert_eq!(page.content, "Rust is a language that is fast and safe.");
        assert_eq!(page.excerpt, page.content);
    }
}
