use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{Semaphore, mpsc};

use crate::config::Config;
use crate::data_models::{PageOutcome, PageResult, ResponseEnvelope, SearchOutcome};
use crate::events::{EventEmitter, ProgressEvent, emit};
use crate::fetcher::PageFetcher;
use crate::search::SearchClient;

/// Runs one search, fans the candidate urls out to the page fetcher and
/// collects whatever comes back.
pub struct Orchestrator {
    config: Arc<Config>,
    search_client: SearchClient,
    fetcher: Arc<PageFetcher>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Result<Orchestrator> {
        config.validate()?;
        let config = Arc::new(config);
        Ok(Orchestrator {
            search_client: SearchClient::new(config.clone())?,
            fetcher: Arc::new(PageFetcher::new(config.clone())?),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Same as [`Orchestrator::run`], serialized to JSON text.
    pub async fn run_json(&self, query: &str, emitter: Option<&dyn EventEmitter>) -> String {
        self.run(query, emitter).await.to_json()
    }

    pub async fn run(&self, query: &str, emitter: Option<&dyn EventEmitter>) -> SearchOutcome {
        if query.trim().is_empty() {
            let message = "Query cannot be empty";
            emit(emitter, ProgressEvent::status_with_label(message, true, "error"));
            emit(emitter, ProgressEvent::message(format!("⚠️ {message}")));
            return SearchOutcome::error(message);
        }

        emit(
            emitter,
            ProgressEvent::status(format!("Searching the web for: {query}"), false),
        );

        let urls = match self.search_client.search(query).await {
            Ok(urls) => urls,
            Err(e) => {
                let message = format!("Error performing search: {e}");
                log::error!("{message}");
                emit(
                    emitter,
                    ProgressEvent::status_with_label(message.clone(), true, "error"),
                );
                emit(emitter, ProgressEvent::message(format!("⚠️ {message}")));
                return SearchOutcome::error(message);
            }
        };

        emit(
            emitter,
            ProgressEvent::status(format!("Found {} URLs, fetching pages", urls.len()), false),
        );

        let results = self.fetch_all(urls, emitter).await;

        emit(emitter, processed_status(results.len()));
        SearchOutcome::Envelope(ResponseEnvelope::new(query, results))
    }

    /// Fetches a single given page. Unlike a search, a failure here is reported
    /// as the error payload.
    pub async fn scrape_page(&self, url: &str, emitter: Option<&dyn EventEmitter>) -> SearchOutcome {
        emit(emitter, ProgressEvent::status(format!("Fetching {url}"), false));
        match self.fetcher.try_fetch(url).await {
            Ok(page) => {
                self.cite(emitter, &page);
                emit(emitter, processed_status(1));
                SearchOutcome::Envelope(ResponseEnvelope::new(url, vec![page]))
            }
            Err(e) => {
                let message = format!("Error fetching page: {e}");
                log::warn!("{message}");
                emit(
                    emitter,
                    ProgressEvent::status_with_label(message.clone(), true, "error"),
                );
                emit(emitter, ProgressEvent::message(format!("⚠️ {message}")));
                SearchOutcome::error(message)
            }
        }
    }

    /// One task per url, at most `max_concurrent_requests` fetching at once.
    /// Results arrive in completion order; this task is the only one that
    /// touches the emitter.
    async fn fetch_all(
        &self,
        urls: Vec<String>,
        emitter: Option<&dyn EventEmitter>,
    ) -> Vec<PageResult> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_requests));
        let (fetched_tx, mut fetched_rx) = mpsc::unbounded_channel::<(usize, PageOutcome)>();

        for (idx, url) in urls.into_iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let semaphore = semaphore.clone();
            let fetched_tx = fetched_tx.clone();
            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                log::info!("fetching url: {url}");
                let outcome = fetcher.fetch(&url).await;
                if fetched_tx.send((idx, outcome)).is_err() {
                    log::warn!("result collector gone, dropping result for {url}");
                }
            });
        }
        drop(fetched_tx);

        let mut collected: Vec<(usize, PageResult)> = Vec::new();
        while let Some((idx, outcome)) = fetched_rx.recv().await {
            match outcome {
                PageOutcome::Fetched(page) => {
                    self.cite(emitter, &page);
                    collected.push((idx, page));
                }
                PageOutcome::Ignored => {}
                PageOutcome::Failed(e) if e.is_timeout() => {
                    log::info!("candidate #{idx} timed out after {}s", self.config.timeout);
                }
                PageOutcome::Failed(e) => {
                    log::warn!("candidate #{idx} dropped: {e}");
                }
            }
        }

        if self.config.preserve_order {
            collected.sort_by_key(|(idx, _)| *idx);
        }
        collected.into_iter().map(|(_, page)| page).collect()
    }

    fn cite(&self, emitter: Option<&dyn EventEmitter>, page: &PageResult) {
        if self.config.citation_links {
            emit(emitter, ProgressEvent::citation(page));
        }
    }
}

fn processed_status(count: usize) -> ProgressEvent {
    let noun = if count == 1 { "page" } else { "pages" };
    ProgressEvent::status_with_label(format!("Processed {count} {noun}"), true, "complete")
}
