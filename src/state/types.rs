//! Values passed between the coordinator, fetchers and processors
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An address waiting to be fetched, with its distance from the start page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrontierEntry {
    /// The address to fetch
    pub address: String,

    /// Number of link hops from the start address
    pub depth: u32,
}

impl FrontierEntry {
    /// Creates a new frontier entry
    pub fn new(address: impl Into<String>, depth: u32) -> Self {
        Self {
            address: address.into(),
            depth,
        }
    }

    /// Entry for a link discovered on this entry's page
    pub fn child(&self, address: impl Into<String>) -> Self {
        Self::new(address, self.depth + 1)
    }
}

/// A successfully fetched page awaiting processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedPage {
    /// The address the page was requested from
    pub address: String,

    /// Depth of the frontier entry this page came from
    pub depth: u32,

    /// Decoded page content
    pub content: String,
}

impl DownloadedPage {
    /// Pairs fetched content with the frontier entry it was fetched for
    pub fn new(entry: FrontierEntry, content: String) -> Self {
        Self {
            address: entry.address,
            depth: entry.depth,
            content,
        }
    }

    /// The frontier entry this page was fetched for
    pub fn entry(&self) -> FrontierEntry {
        FrontierEntry::new(self.address.clone(), self.depth)
    }
}

/// Depth value outside the representable range
#[derive(Debug, Error)]
#[error("max depth must be -1 (unlimited) or a non-negative integer, got {0}")]
pub struct InvalidDepth(pub i64);

/// How far from the start address the crawl may go
///
/// Serialized as an integer, with `-1` standing for [`MaxDepth::Unlimited`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum MaxDepth {
    /// Pages deeper than this are never fetched
    Limited(u32),

    /// No depth bound
    Unlimited,
}

impl MaxDepth {
    /// Integer standing for an unlimited depth in documents and configs
    pub const UNLIMITED: i64 = -1;

    /// Returns true if links found on a page at `depth` should be followed
    ///
    /// A page at exactly the maximum depth is still searched, but its links
    /// are not.
    pub fn follows_links_at(&self, depth: u32) -> bool {
        match self {
            Self::Limited(max) => depth < *max,
            Self::Unlimited => true,
        }
    }

    /// Returns true if a page at `depth` lies within the bound
    pub fn admits(&self, depth: u32) -> bool {
        match self {
            Self::Limited(max) => depth <= *max,
            Self::Unlimited => true,
        }
    }
}

impl From<MaxDepth> for i64 {
    fn from(depth: MaxDepth) -> Self {
        match depth {
            MaxDepth::Limited(max) => i64::from(max),
            MaxDepth::Unlimited => MaxDepth::UNLIMITED,
        }
    }
}

impl TryFrom<i64> for MaxDepth {
    type Error = InvalidDepth;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == Self::UNLIMITED {
            return Ok(Self::Unlimited);
        }
        u32::try_from(value)
            .map(Self::Limited)
            .map_err(|_| InvalidDepth(value))
    }
}

impl fmt::Display for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(max) => write!(f, "{}", max),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}
