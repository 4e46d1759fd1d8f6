//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageSource`] seam
//! - HTML parsing, anchor filtering and link extraction
//! - Per-page processing against the shared crawl state
//! - Round-based crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod processor;

pub use coordinator::{CancelFlag, Coordinator, DEFAULT_MAX_WORKERS};
pub use fetcher::{
    build_http_client, decode_permissive, drain_frontier, fetch_page, fetch_url,
    is_text_content_type, FetchResult, HttpFetcher, PageSource,
};
pub use parser::{anchor_references, page_links, LinkFilter};
pub use processor::{PageOutcome, Processor};
