//! Extraction actions run against every downloaded page
//!
//! An action maps page content to an ordered, duplicate-free list of matched
//! strings. The engine calls it once per page and never inspects how the
//! matches were found. Any `Fn(&str) -> Vec<String>` closure is an action;
//! [`SearchAction`] provides the word, sentence and pattern searches.

mod search;

pub use search::{SearchAction, SearchKind};

/// Maps page content to the strings found in it
///
/// Implementations must be total: every input yields a list, possibly empty.
/// The returned list should not contain duplicates.
pub trait ExtractionAction: Send + Sync {
    /// Returns the matches found in `content`
    fn extract(&self, content: &str) -> Vec<String>;
}

impl<F> ExtractionAction for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn extract(&self, content: &str) -> Vec<String> {
        self(content)
    }
}

/// Pushes `item` onto `items` unless an equal string is already present
pub(crate) fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|existing| existing == item) {
        items.push(item.to_string());
    }
}
