//! Trawl: a depth-bounded concurrent web crawl engine
//!
//! This crate starts from a single address, fetches pages, follows the links
//! accepted by a caller-supplied anchor filter up to a maximum depth, and runs
//! a caller-supplied extraction action against every page it downloads. The
//! non-empty results are collected into a timestamped [`CrawlReport`].

pub mod action;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use std::sync::Arc;
use thiserror::Error;

/// Main error type for Trawl operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Report document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported report file: {0}")]
    UnsupportedReport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Trawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use action::{ExtractionAction, SearchAction, SearchKind};
pub use config::Config;
pub use crawler::{CancelFlag, Coordinator, HttpFetcher, LinkFilter, PageSource};
pub use output::{ActionResult, CrawlReport, ReportDocument};
pub use state::{DownloadedPage, FrontierEntry, MaxDepth};
pub use url::canonicalize_link;

/// Crawls from `start_address` and returns the finished report
///
/// Pages are fetched over HTTP with the default fetcher settings (10 second
/// timeout, at most 8 concurrent workers per phase).
///
/// # Example
///
/// ```no_run
/// use trawl::{crawl, MaxDepth, SearchAction, SearchKind};
///
/// # async fn example() -> trawl::Result<()> {
/// let action = SearchAction::new(SearchKind::Word, "Rust", false, Vec::new())?;
/// let report = crawl("https://www.rust-lang.org/", MaxDepth::Limited(1), None, action).await?;
/// println!("{} pages matched", report.results().len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    start_address: &str,
    max_depth: MaxDepth,
    filter: Option<LinkFilter>,
    action: impl ExtractionAction + 'static,
) -> Result<CrawlReport> {
    let fetcher = HttpFetcher::new(&config::FetcherSettings::default())?;
    let report = Coordinator::new(Arc::new(fetcher), Arc::new(action), max_depth)
        .with_filter(filter)
        .seed(start_address)
        .run()
        .await;
    Ok(report)
}

/// Blocking variant of [`crawl`] for hosts without an async runtime
///
/// Builds a multi-threaded runtime for the duration of the crawl. Must not be
/// called from inside another tokio runtime.
pub fn crawl_blocking(
    start_address: &str,
    max_depth: MaxDepth,
    filter: Option<LinkFilter>,
    action: impl ExtractionAction + 'static,
) -> Result<CrawlReport> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(crawl(start_address, max_depth, filter, action))
}
