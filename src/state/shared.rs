//! Guarded sets and lists mutated by concurrent processors

use crate::output::ActionResult;
use crate::state::{lock, DownloadedPage, FrontierEntry, WorkQueue};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Seen {
    visited: HashSet<String>,
    enqueued: HashSet<String>,
}

/// Registry of every address that has been processed or placed in the frontier
///
/// Both sets live behind one lock so that "is this address new" and "record
/// it" happen as a single step. Addresses are never removed.
#[derive(Debug, Default)]
pub struct SeenAddresses {
    inner: Mutex<Seen>,
}

impl SeenAddresses {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `address` as enqueued if it has been neither visited nor enqueued
    ///
    /// Returns true if the caller now owns the right to push the address onto
    /// the frontier. Returns false if it was already known.
    pub fn claim_for_frontier(&self, address: &str) -> bool {
        let mut seen = lock(&self.inner);
        if seen.visited.contains(address) || seen.enqueued.contains(address) {
            return false;
        }
        seen.enqueued.insert(address.to_string())
    }

    /// Records `address` as visited
    ///
    /// Returns false if it had already been visited.
    pub fn mark_visited(&self, address: &str) -> bool {
        lock(&self.inner).visited.insert(address.to_string())
    }

    /// Returns true if `address` has been visited
    pub fn is_visited(&self, address: &str) -> bool {
        lock(&self.inner).visited.contains(address)
    }

    /// Number of visited addresses
    pub fn visited_count(&self) -> usize {
        lock(&self.inner).visited.len()
    }

    /// Number of addresses ever claimed for the frontier
    pub fn enqueued_count(&self) -> usize {
        lock(&self.inner).enqueued.len()
    }

    /// Copy of the visited set
    pub fn visited(&self) -> HashSet<String> {
        lock(&self.inner).visited.clone()
    }
}

/// Append-only collection of extraction results
#[derive(Debug, Default)]
pub struct ResultLog {
    results: Mutex<Vec<ActionResult>>,
}

impl ResultLog {
    /// Creates an empty result log
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one page's result
    pub fn push(&self, result: ActionResult) {
        lock(&self.results).push(result);
    }

    /// Number of results collected so far
    pub fn len(&self) -> usize {
        lock(&self.results).len()
    }

    /// Returns true if no page has produced a result yet
    pub fn is_empty(&self) -> bool {
        lock(&self.results).is_empty()
    }

    /// Copy of the results in append order
    pub fn snapshot(&self) -> Vec<ActionResult> {
        lock(&self.results).clone()
    }
}

/// Everything the workers of one crawl share
///
/// Created empty at the start of a crawl and dropped once its report is
/// built. Nothing here outlives a single crawl.
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Entries waiting for a fetch worker
    pub frontier: WorkQueue<FrontierEntry>,

    /// Fetched pages waiting for a processor
    pub downloaded: WorkQueue<DownloadedPage>,

    /// Visited and enqueued addresses
    pub seen: SeenAddresses,

    /// Non-empty extraction results
    pub results: ResultLog,
}

impl CrawlState {
    /// Creates empty crawl state
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `entry` on the frontier unless its address is already known
    ///
    /// Returns true if the entry was enqueued.
    pub fn enqueue(&self, entry: FrontierEntry) -> bool {
        if !self.seen.claim_for_frontier(&entry.address) {
            return false;
        }
        self.frontier.push(entry);
        true
    }
}
