//! Thread-safe FIFO used for the frontier and the downloaded buffer

use crate::state::lock;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A FIFO queue that many workers can push to and pop from
///
/// Callers never take a lock themselves; each operation locks internally for
/// its own duration only.
#[derive(Debug)]
pub struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> WorkQueue<T> {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends an item to the back of the queue
    pub fn push(&self, item: T) {
        lock(&self.items).push_back(item);
    }

    /// Removes the item at the front of the queue, if any
    pub fn pop(&self) -> Option<T> {
        lock(&self.items).pop_front()
    }

    /// Number of items currently queued
    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    /// Returns true if nothing is queued
    pub fn is_empty(&self) -> bool {
        lock(&self.items).is_empty()
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for WorkQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: Mutex::new(iter.into_iter().collect()),
        }
    }
}
