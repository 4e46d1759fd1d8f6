//! HTML parsing for link extraction
//!
//! Outbound links are read from `<a href>` elements inside the page body. A
//! [`LinkFilter`] narrows which anchors are considered; every surviving
//! reference is canonicalized against the page address before it is returned.

use crate::url::canonicalize_link;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

/// Attribute constraints an anchor must satisfy to be followed
///
/// Every named attribute must be present on the anchor. When its allowed
/// value list is non-empty, the attribute value must also be one of them;
/// for `class`, any one of the anchor's classes is enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    attributes: BTreeMap<String, Vec<String>>,
}

impl LinkFilter {
    /// Creates a filter that accepts every anchor
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint on `attribute`, replacing any earlier one
    pub fn allow<I, S>(mut self, attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .insert(attribute.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if the filter has no constraints
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns true if `anchor` satisfies every constraint
    pub fn matches(&self, anchor: &ElementRef<'_>) -> bool {
        let element = anchor.value();
        self.attributes.iter().all(|(name, allowed)| {
            let Some(value) = element.attr(name) else {
                return false;
            };
            if allowed.is_empty() {
                return true;
            }
            if name == "class" {
                value
                    .split_whitespace()
                    .any(|class| allowed.iter().any(|a| a == class))
            } else {
                allowed.iter().any(|a| a == value)
            }
        })
    }
}

impl From<BTreeMap<String, Vec<String>>> for LinkFilter {
    fn from(attributes: BTreeMap<String, Vec<String>>) -> Self {
        Self { attributes }
    }
}

/// Returns the raw `href` values of body anchors accepted by `filter`
///
/// Anchors outside `<body>` are ignored. Order follows the document.
pub fn anchor_references(document: &Html, filter: Option<&LinkFilter>) -> Vec<String> {
    let Ok(selector) = Selector::parse("body a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|anchor| filter.map_or(true, |f| f.matches(anchor)))
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Extracts the canonical addresses linked from a page
///
/// References that fail canonicalization are dropped. Repeats within the page
/// are collapsed, keeping the first occurrence.
///
/// # Example
///
/// ```
/// use trawl::crawler::page_links;
///
/// let html = r#"<html><body><a href="/r#top">R</a><a href="/r">R again</a></body></html>"#;
/// let links = page_links(html, "https://a.example/p/q", None);
/// assert_eq!(links, vec!["https://a.example/r".to_string()]);
/// ```
pub fn page_links(content: &str, source_address: &str, filter: Option<&LinkFilter>) -> Vec<String> {
    let document = Html::parse_document(content);
    let mut links: Vec<String> = Vec::new();

    for reference in anchor_references(&document, filter) {
        match canonicalize_link(&reference, source_address) {
            Some(address) => {
                if !links.contains(&address) {
                    links.push(address);
                }
            }
            None => tracing::trace!("Dropping link {:?} on {}", reference, source_address),
        }
    }

    links
}
