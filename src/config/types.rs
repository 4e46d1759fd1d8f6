use crate::action::{SearchAction, SearchKind};
use crate::crawler::LinkFilter;
use crate::state::MaxDepth;
use crate::url::normalize_start_address;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Main configuration structure for Trawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    /// Anchor attribute name to allowed values; absent means follow every anchor
    #[serde(default)]
    pub filter: Option<BTreeMap<String, Vec<String>>>,
    pub action: ActionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// The start address with a trailing `/` added when it has no path
    pub fn start_address(&self) -> String {
        normalize_start_address(&self.crawler.start_address)
    }

    /// The configured depth bound
    pub fn max_depth(&self) -> crate::ConfigResult<MaxDepth> {
        MaxDepth::try_from(self.crawler.max_depth)
            .map_err(|e| crate::ConfigError::Validation(e.to_string()))
    }

    /// The anchor filter, or `None` when every anchor should be followed
    pub fn link_filter(&self) -> Option<LinkFilter> {
        self.filter
            .clone()
            .map(LinkFilter::from)
            .filter(|filter| !filter.is_empty())
    }

    /// Compiles the configured extraction action
    pub fn build_action(&self) -> crate::Result<SearchAction> {
        SearchAction::new(
            self.action.kind,
            &self.action.term,
            self.action.case_sensitive,
            self.action.tags.clone(),
        )
    }

    /// HTTP settings for the page fetcher
    pub fn fetcher_settings(&self) -> FetcherSettings {
        FetcherSettings {
            user_agent: self.user_agent.header_value(),
            timeout: Duration::from_secs(self.crawler.fetch_timeout),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Address the crawl starts from
    #[serde(rename = "start-address")]
    pub start_address: String,

    /// Maximum link hops from the start address; -1 for unlimited
    #[serde(rename = "max-depth")]
    pub max_depth: i64,

    /// Upper bound on concurrent workers in each phase
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Per-page fetch timeout (seconds)
    #[serde(rename = "fetch-timeout", default = "default_fetch_timeout")]
    pub fetch_timeout: u64,
}

fn default_max_workers() -> usize {
    8
}

fn default_fetch_timeout() -> u64 {
    10
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Value sent in the `User-Agent` header, `name/version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Extraction action configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ActionConfig {
    /// Word, sentence or pattern search
    pub kind: SearchKind,

    /// The word to find, or the regular expression for pattern searches
    pub term: String,

    #[serde(rename = "case-sensitive", default)]
    pub case_sensitive: bool,

    /// Element names to search in; empty searches the whole document
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to save the report; `.json` or `.store`
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,

    /// Where to write the markdown rendering
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

/// HTTP settings for the page fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherSettings {
    /// `User-Agent` header value
    pub user_agent: String,

    /// Bound on a single page retrieval
    pub timeout: Duration,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            user_agent: UserAgentConfig::default().header_value(),
            timeout: Duration::from_secs(default_fetch_timeout()),
        }
    }
}
