//! Crawl state shared between workers
//!
//! This module defines the values that flow through a crawl and the guarded
//! structures the workers share:
//! - Frontier entries and downloaded pages
//! - The maximum depth setting
//! - Lock-free-to-the-caller work queues
//! - The registry of visited and enqueued addresses
//! - The result collection

mod queue;
mod shared;
mod types;

pub use queue::WorkQueue;
pub use shared::{CrawlState, ResultLog, SeenAddresses};
pub use types::{DownloadedPage, FrontierEntry, InvalidDepth, MaxDepth};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
