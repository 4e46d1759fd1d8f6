//! Configuration module for Trawl
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! plus the small text formats used to enter filters and tag lists by hand.
//!
//! # Example
//!
//! ```no_run
//! use trawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawl.toml")).unwrap();
//! println!("Crawl starts at: {}", config.start_address());
//! ```

mod input;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ActionConfig, Config, CrawlerConfig, FetcherSettings, OutputConfig, UserAgentConfig,
};

// Re-export parser functions
pub use input::{parse_attribute_filter, split_comma_list};
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
