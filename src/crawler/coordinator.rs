//! Crawler coordinator - round-based crawl orchestration
//!
//! A crawl proceeds in rounds until the frontier is empty. Each round has two
//! phases separated by a barrier:
//! - Fetch: async workers drain the frontier into the downloaded buffer
//! - Process: blocking workers drain the downloaded buffer, extending the
//!   frontier with the next depth and recording action results
//!
//! Every page of depth N is therefore fetched before any page of depth N + 1.

use crate::action::ExtractionAction;
use crate::crawler::fetcher::{drain_frontier, PageSource};
use crate::crawler::parser::LinkFilter;
use crate::crawler::processor::Processor;
use crate::output::{epoch_seconds_now, CrawlReport};
use crate::state::{CrawlState, FrontierEntry, MaxDepth};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Default upper bound on workers per phase
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Shared stop request for a running crawl
///
/// Checked before each round starts; a cancelled crawl finishes its current
/// round and returns a report of what it collected so far.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the crawl stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Number of workers to spawn for a queue of `queued` items
fn worker_count(queued: usize, max_workers: usize) -> usize {
    queued.min(max_workers)
}

/// Main crawler coordinator structure
pub struct Coordinator {
    source: Arc<dyn PageSource>,
    action: Arc<dyn ExtractionAction>,
    max_depth: MaxDepth,
    filter: Option<LinkFilter>,
    max_workers: usize,
    cancel: CancelFlag,
    start_address: Option<String>,
    state: Arc<CrawlState>,
}

impl Coordinator {
    /// Creates a coordinator with an empty frontier
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use trawl::config::FetcherSettings;
    /// use trawl::{Coordinator, HttpFetcher, MaxDepth};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = HttpFetcher::new(&FetcherSettings::default())?;
    /// let action = |content: &str| {
    ///     if content.contains("Rust") { vec!["Rust".to_string()] } else { Vec::new() }
    /// };
    /// let report = Coordinator::new(Arc::new(fetcher), Arc::new(action), MaxDepth::Limited(1))
    ///     .with_max_workers(4)
    ///     .seed("https://www.rust-lang.org/")
    ///     .run()
    ///     .await;
    /// println!("{} pages matched", report.results().len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        source: Arc<dyn PageSource>,
        action: Arc<dyn ExtractionAction>,
        max_depth: MaxDepth,
    ) -> Self {
        Self {
            source,
            action,
            max_depth,
            filter: None,
            max_workers: DEFAULT_MAX_WORKERS,
            cancel: CancelFlag::new(),
            start_address: None,
            state: Arc::new(CrawlState::new()),
        }
    }

    /// Restricts which anchors are followed; `None` follows all of them
    pub fn with_filter(mut self, filter: Option<LinkFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the per-phase worker bound (at least 1)
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Uses `cancel` to stop the crawl early
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Adds a depth 0 entry to the frontier
    ///
    /// The first seed becomes the report's start address. Empty and repeated
    /// seeds are ignored.
    pub fn seed(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        if address.is_empty() {
            tracing::warn!("Ignoring empty seed address");
            return self;
        }
        if self.start_address.is_none() {
            self.start_address = Some(address.clone());
        }
        if !self.state.enqueue(FrontierEntry::new(address.clone(), 0)) {
            tracing::debug!("Seed {} already queued", address);
        }
        self
    }

    /// Shared state of this crawl, for inspection after [`Coordinator::run`]
    pub fn state(&self) -> Arc<CrawlState> {
        Arc::clone(&self.state)
    }

    /// Handle that cancels this crawl
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Runs rounds until the frontier is exhausted or the crawl is cancelled
    pub async fn run(self) -> CrawlReport {
        let start_address = self.start_address.clone().unwrap_or_default();
        tracing::info!(
            "Starting crawl from {} (max depth {}, {} workers per phase)",
            start_address,
            self.max_depth,
            self.max_workers
        );

        let processor = Arc::new(Processor::new(
            self.max_depth,
            self.filter.clone(),
            Arc::clone(&self.action),
        ));

        let start_time = epoch_seconds_now();
        let mut round = 0;

        while !self.state.frontier.is_empty() {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "Crawl cancelled after {} rounds with {} entries still queued",
                    round,
                    self.state.frontier.len()
                );
                break;
            }
            round += 1;

            let fetched = self.fetch_phase().await;
            let processed = self.process_phase(&processor).await;

            tracing::info!(
                "Round {}: {} fetched, {} processed, {} queued, {} pages with matches",
                round,
                fetched,
                processed,
                self.state.frontier.len(),
                self.state.results.len()
            );
        }

        let end_time = epoch_seconds_now();
        let results = self.state.results.snapshot();

        tracing::info!(
            "Crawl completed: {} pages visited in {} rounds, {:.3}s",
            self.state.seen.visited_count(),
            round,
            end_time - start_time
        );

        CrawlReport::new(start_address, self.max_depth, start_time, end_time, results)
    }

    async fn fetch_phase(&self) -> usize {
        let workers = worker_count(self.state.frontier.len(), self.max_workers).max(1);
        let mut set = JoinSet::new();

        for _ in 0..workers {
            let source = Arc::clone(&self.source);
            let state = Arc::clone(&self.state);
            set.spawn(async move { drain_frontier(source.as_ref(), &state).await });
        }

        let mut fetched = 0;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(count) => fetched += count,
                Err(e) => tracing::error!("Fetch worker failed: {}", e),
            }
        }
        fetched
    }

    async fn process_phase(&self, processor: &Arc<Processor>) -> usize {
        let workers = worker_count(self.state.downloaded.len(), self.max_workers);
        let mut set = JoinSet::new();

        for _ in 0..workers {
            let processor = Arc::clone(processor);
            let state = Arc::clone(&self.state);
            set.spawn_blocking(move || processor.drain(&state));
        }

        let mut processed = 0;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(count) => processed += count,
                Err(e) => tracing::error!("Processor worker failed: {}", e),
            }
        }
        processed
    }
}
