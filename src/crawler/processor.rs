//! Content processing for downloaded pages

use crate::action::ExtractionAction;
use crate::crawler::parser::{page_links, LinkFilter};
use crate::output::ActionResult;
use crate::state::{CrawlState, DownloadedPage, MaxDepth};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Outcome of processing one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOutcome {
    /// New frontier entries created from the page's links
    pub enqueued: usize,
    /// Number of matches the action found
    pub matches: usize,
}

/// Turns downloaded pages into frontier entries and action results
#[derive(Clone)]
pub struct Processor {
    max_depth: MaxDepth,
    filter: Option<LinkFilter>,
    action: Arc<dyn ExtractionAction>,
}

impl Processor {
    pub fn new(
        max_depth: MaxDepth,
        filter: Option<LinkFilter>,
        action: Arc<dyn ExtractionAction>,
    ) -> Self {
        Self {
            max_depth,
            filter,
            action,
        }
    }

    /// Processes one page against the shared crawl state
    ///
    /// A page whose address was already visited is skipped. Links are only
    /// followed while the page depth is below the maximum.
    pub fn process(&self, page: DownloadedPage, state: &CrawlState) -> Option<PageOutcome> {
        if !state.seen.mark_visited(&page.address) {
            tracing::debug!("Skipping already visited {}", page.address);
            return None;
        }

        let mut outcome = PageOutcome::default();

        if self.max_depth.follows_links_at(page.depth) {
            let entry = page.entry();
            for address in page_links(&page.content, &page.address, self.filter.as_ref()) {
                if state.enqueue(entry.child(address)) {
                    outcome.enqueued += 1;
                }
            }
        }

        let matches = self.run_action(&page);
        outcome.matches = matches.len();
        if !matches.is_empty() {
            state.results.push(ActionResult::new(page.address.clone(), matches));
        }

        tracing::debug!(
            "Processed {} at depth {}: {} new links, {} matches",
            page.address,
            page.depth,
            outcome.enqueued,
            outcome.matches
        );
        Some(outcome)
    }

    /// Pops downloaded pages until the buffer is empty
    ///
    /// Returns the number of pages this worker processed.
    pub fn drain(&self, state: &CrawlState) -> usize {
        let mut processed = 0;
        while let Some(page) = state.downloaded.pop() {
            if self.process(page, state).is_some() {
                processed += 1;
            }
        }
        processed
    }

    fn run_action(&self, page: &DownloadedPage) -> Vec<String> {
        let action = &self.action;
        match panic::catch_unwind(AssertUnwindSafe(|| action.extract(&page.content))) {
            Ok(matches) => matches,
            Err(_) => {
                tracing::error!("Extraction action panicked on {}", page.address);
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("max_depth", &self.max_depth)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
