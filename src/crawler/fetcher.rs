//! HTTP fetcher implementation
//!
//! This module handles page retrieval for the crawler:
//! - Building the HTTP client with the configured user agent and timeout
//! - Classifying responses into a [`FetchResult`]
//! - Permissive text decoding of response bodies
//! - Draining the frontier into the downloaded buffer

use crate::config::FetcherSettings;
use crate::state::{CrawlState, DownloadedPage, FrontierEntry};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};

/// Maximum number of redirects followed for one page
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value, empty when absent
        content_type: String,
        /// Decoded page body
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },

    /// Response is not text
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },
}

impl FetchResult {
    /// Returns the body of a successful fetch
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchResult::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Short description of a failed fetch, `None` on success
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            FetchResult::NetworkError { error } => Some(error.clone()),
            FetchResult::ContentMismatch { content_type } => {
                Some(format!("Expected text, got {}", content_type))
            }
        }
    }
}

/// Something that can retrieve page content by address
///
/// The crawl engine only talks to pages through this trait. [`HttpFetcher`] is
/// the network implementation; tests supply in-memory sources.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieves one page. Never panics or errors; failures are values.
    async fn fetch(&self, address: &str) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use trawl::config::FetcherSettings;
/// use trawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherSettings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &FetcherSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .connect_timeout(settings.timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true for content types whose bodies are searched as text
///
/// A missing header is accepted.
pub fn is_text_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    essence.is_empty()
        || essence.starts_with("text/")
        || essence == "application/xhtml+xml"
        || essence == "application/xml"
}

/// Decodes `bytes` as UTF-8, dropping invalid sequences
pub fn decode_permissive(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Fetches a URL and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with text content | `Success` |
/// | 2xx with other content | `ContentMismatch` |
/// | Any other status | `HttpError` |
/// | Timeout, connection failure, too many redirects | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_text_content_type(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.bytes().await {
        Ok(bytes) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body: decode_permissive(&bytes),
        },
        Err(e) => classify_error(&e),
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}

/// [`PageSource`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher using `settings`
    pub fn new(settings: &FetcherSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(settings)?,
        })
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, address: &str) -> FetchResult {
        fetch_url(&self.client, address).await
    }
}

/// Fetches one frontier entry
///
/// Returns the downloaded page, or `None` after logging the failure.
pub async fn fetch_page(source: &dyn PageSource, entry: FrontierEntry) -> Option<DownloadedPage> {
    let result = source.fetch(&entry.address).await;
    if let Some(reason) = result.failure_reason() {
        tracing::warn!("Failed to fetch {}: {}", entry.address, reason);
        return None;
    }

    let body = result.into_body()?;
    tracing::debug!("Fetched {} ({} bytes) at depth {}", entry.address, body.len(), entry.depth);
    Some(DownloadedPage::new(entry, body))
}

/// Pops frontier entries until the frontier is empty
///
/// Each success is pushed onto the downloaded buffer; failures are dropped.
/// Returns the number of pages downloaded by this worker.
pub async fn drain_frontier(source: &dyn PageSource, state: &CrawlState) -> usize {
    let mut downloaded = 0;
    while let Some(entry) = state.frontier.pop() {
        if let Some(page) = fetch_page(source, entry).await {
            state.downloaded.push(page);
            downloaded += 1;
        }
    }
    downloaded
}
