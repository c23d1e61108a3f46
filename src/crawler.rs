//! Frontier controller: the fetch → flatten → extract → persist → expand loop.
//!
//! The controller is strictly sequential. Each iteration awaits its fetch,
//! completion call and file write before the next URL is considered, and a
//! failure anywhere inside one iteration only ends that iteration.

use crate::canonical::{canonicalize, resolve_link};
use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::extractor::RecipeExtractor;
use crate::fetcher::PageFetcher;
use crate::flatten::flatten_html;
use crate::model::{ExtractionOutcome, RecipeRecord};
use crate::providers::ProviderFactory;
use crate::store::{RecordStore, StoredRecipe};
use log::{debug, error, info, warn};
use std::collections::HashSet;

/// Pending and attempted URLs of one crawl, all in canonical form.
///
/// The frontier is a stack: new links go on top and the top is visited next,
/// which makes the crawl depth-first. The visited set only ever grows.
#[derive(Debug, Clone, Default)]
pub struct CrawlerState {
    frontier: Vec<String>,
    visited: HashSet<String>,
}

impl CrawlerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending URLs, oldest first; the last entry is visited next.
    pub fn frontier(&self) -> &[String] {
        &self.frontier
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&canonicalize(url))
    }

    /// Puts a URL on top of the frontier.
    pub fn push(&mut self, url: &str) {
        self.frontier.push(canonicalize(url));
    }

    /// Takes the most recently added URL.
    pub fn pop(&mut self) -> Option<String> {
        self.frontier.pop()
    }

    /// Appends discovered links, marks `processed` as visited and prunes.
    ///
    /// Relative links are resolved against `processed` when it is known.
    /// Returns how many entries the frontier grew by.
    pub fn expand<'a>(
        &mut self,
        processed: Option<&str>,
        links: impl IntoIterator<Item = &'a String>,
    ) -> usize {
        let before = self.frontier.len();
        self.frontier.extend(
            links
                .into_iter()
                .map(|link| canonicalize(&resolve_link(processed, link))),
        );
        if let Some(url) = processed {
            self.visited.insert(canonicalize(url));
        }
        self.prune();
        self.frontier.len().saturating_sub(before)
    }

    /// Marks `url` as attempted without adding links, then prunes.
    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(canonicalize(url));
        self.prune();
    }

    /// Drops visited entries and repeated entries from the frontier.
    ///
    /// The earliest occurrence of a repeated URL keeps its place.
    fn prune(&mut self) {
        let visited = &self.visited;
        let mut pending = HashSet::new();
        self.frontier
            .retain(|url| !visited.contains(url) && pending.insert(url.clone()));
    }
}

/// What happened to one URL or pasted text.
#[derive(Debug)]
pub enum StepOutcome {
    /// A record was written; `discovered` new URLs joined the frontier
    Persisted {
        stored: StoredRecipe,
        discovered: usize,
    },
    /// The model reported that no recipe could be extracted
    Skipped { reason: String },
    /// Fetching, extraction or persistence failed
    Errored { error: CrawlError },
}

/// Counters for one frontier drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub attempted: usize,
    pub persisted: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl CrawlSummary {
    pub fn record(&mut self, outcome: &StepOutcome) {
        self.attempted += 1;
        match outcome {
            StepOutcome::Persisted { .. } => self.persisted += 1,
            StepOutcome::Skipped { .. } => self.skipped += 1,
            StepOutcome::Errored { .. } => self.errored += 1,
        }
    }

    pub fn merge(&mut self, other: CrawlSummary) {
        self.attempted += other.attempted;
        self.persisted += other.persisted;
        self.skipped += other.skipped;
        self.errored += other.errored;
    }
}

/// Owns the crawl state and drives each page through the pipeline.
pub struct Crawler {
    state: CrawlerState,
    fetcher: PageFetcher,
    extractor: RecipeExtractor,
    store: RecordStore,
    max_pages: Option<usize>,
}

impl Crawler {
    pub fn new(fetcher: PageFetcher, extractor: RecipeExtractor, store: RecordStore) -> Self {
        Self {
            state: CrawlerState::new(),
            fetcher,
            extractor,
            store,
            max_pages: None,
        }
    }

    /// Wires fetcher, default provider and store from configuration.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let provider = ProviderFactory::get_default_provider(config)?;
        let extractor = RecipeExtractor::new(provider).with_language(config.crawl.language.clone());
        let fetcher = PageFetcher::new(config.crawl.timeout())?;
        let store = RecordStore::new(config.crawl.output_dir.clone());

        Ok(Self::new(fetcher, extractor, store).with_max_pages(config.crawl.max_pages))
    }

    /// Caps how many frontier entries one drain attempts.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Queues `url` on top of the frontier without processing it.
    pub fn enqueue(&mut self, url: &str) {
        self.state.push(url);
    }

    pub fn state(&self) -> &CrawlerState {
        &self.state
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Runs one URL through fetch, extraction, persistence and expansion.
    ///
    /// The URL ends up visited whatever the outcome.
    pub async fn process_url(&mut self, url: &str) -> StepOutcome {
        info!("Processing {}", url);

        let outcome = match self.fetch_and_extract(url).await {
            Ok(ExtractionOutcome::Extracted(record)) => {
                self.persist_and_expand(record, Some(url)).await
            }
            Ok(ExtractionOutcome::Failed(reason)) => StepOutcome::Skipped { reason },
            Err(error) => StepOutcome::Errored { error },
        };

        match &outcome {
            StepOutcome::Persisted { stored, discovered } => info!(
                "Saved recipe {} from {} ({} new links, {} pending)",
                stored.id,
                url,
                discovered,
                self.state.frontier().len()
            ),
            StepOutcome::Skipped { reason } => {
                warn!("No recipe extracted from {}: {}", url, reason);
                self.state.mark_visited(url);
            }
            StepOutcome::Errored { error } => {
                error!("An error occurred while processing {}: {}", url, error);
                self.state.mark_visited(url);
            }
        }

        outcome
    }

    /// Extracts a recipe from pasted text, without fetching anything.
    ///
    /// The record has no source URL and nothing is marked visited; its
    /// suggestion links still join the frontier.
    pub async fn process_text(&mut self, text: &str) -> StepOutcome {
        info!("Processing pasted recipe text");

        let outcome = match self.extractor.extract(text, None).await {
            Ok(ExtractionOutcome::Extracted(record)) => self.persist_and_expand(record, None).await,
            Ok(ExtractionOutcome::Failed(reason)) => StepOutcome::Skipped { reason },
            Err(error) => StepOutcome::Errored { error },
        };

        match &outcome {
            StepOutcome::Persisted { stored, discovered } => info!(
                "Saved pasted recipe {} ({} new links)",
                stored.id, discovered
            ),
            StepOutcome::Skipped { reason } => warn!("No recipe in pasted text: {}", reason),
            StepOutcome::Errored { error } => error!("An error occurred: {}", error),
        }

        outcome
    }

    /// Pops the most recent frontier entry and processes it.
    ///
    /// Returns `None` when the frontier is empty.
    pub async fn process_next(&mut self) -> Option<StepOutcome> {
        let next_url = self.state.pop()?;
        info!("Auto fetching {}", next_url);
        Some(self.process_url(&next_url).await)
    }

    /// Visits frontier entries, most recent first, until none are left or the
    /// page limit is reached.
    pub async fn run_frontier(&mut self) -> CrawlSummary {
        let mut summary = CrawlSummary::default();

        loop {
            if self.max_pages.is_some_and(|max| summary.attempted >= max) {
                info!(
                    "Reached the limit of {} pages, {} left in the frontier",
                    summary.attempted,
                    self.state.frontier().len()
                );
                break;
            }

            let Some(outcome) = self.process_next().await else {
                info!("Cannot auto-fetch more recipes, the frontier is empty");
                break;
            };
            summary.record(&outcome);
        }

        summary
    }

    /// Seeds the crawl with `url` and drains the frontier.
    pub async fn crawl(&mut self, url: &str) -> CrawlSummary {
        let mut summary = CrawlSummary::default();
        let outcome = self.process_url(url).await;
        summary.record(&outcome);

        summary.merge(self.run_frontier().await);
        summary
    }

    async fn persist_and_expand(
        &mut self,
        record: RecipeRecord,
        source_url: Option<&str>,
    ) -> StepOutcome {
        match self.store.persist(record, source_url).await {
            Ok(stored) => {
                let discovered = self
                    .state
                    .expand(source_url, stored.record.suggestion_links());
                StepOutcome::Persisted { stored, discovered }
            }
            Err(error) => StepOutcome::Errored { error },
        }
    }

    async fn fetch_and_extract(&self, url: &str) -> Result<ExtractionOutcome, CrawlError> {
        let html = self.fetcher.fetch(url).await?;
        let text = flatten_html(&html);
        debug!("Flattened {} into {} characters", url, text.len());
        self.extractor.extract(&text, Some(url)).await
    }
}
