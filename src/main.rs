//! Trawl main entry point
//!
//! This is the command-line interface for the Trawl crawl engine.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trawl::config::{load_config_with_hash, parse_attribute_filter, split_comma_list, Config};
use trawl::crawler::{CancelFlag, Coordinator, HttpFetcher, LinkFilter};
use trawl::output::{
    format_markdown_summary, generate_markdown_summary, load_report_file, save_report_file,
};
use trawl::CrawlReport;
use tracing_subscriber::EnvFilter;

/// Trawl: a depth-bounded concurrent web crawler
///
/// Trawl starts from one address, follows links up to a maximum depth and
/// searches every page it downloads for a word, a sentence or a pattern.
#[derive(Parser, Debug)]
#[command(name = "trawl")]
#[command(version)]
#[command(about = "A depth-bounded concurrent web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "show")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "show")]
    dry_run: bool,

    /// Print the markdown rendering of a saved `.json` or `.store` report and exit
    #[arg(long, value_name = "REPORT")]
    show: Option<PathBuf>,

    /// Anchor filter line `attribute:value,value`; repeat for more attributes.
    /// Replaces the config's [filter] table
    #[arg(long, value_name = "ATTRIBUTE:VALUES")]
    filter: Vec<String>,

    /// Comma separated element names to search in, replacing the config's tags
    #[arg(long, value_name = "TAGS")]
    tags: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(report_path) = &cli.show {
        return handle_show(report_path);
    }

    let config_path = cli
        .config
        .as_deref()
        .context("a configuration file is required")?;

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", config_path.display());
    let mut config = match load_config_with_hash(config_path) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli);

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trawl=info,warn"),
            1 => EnvFilter::new("trawl=debug,info"),
            2 => EnvFilter::new("trawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Replaces config values with those given on the command line
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.filter.is_empty() {
        let filter = parse_attribute_filter(&cli.filter.join("\n"));
        if filter.is_empty() {
            tracing::warn!("No valid --filter lines given; following every anchor");
        }
        config.filter = Some(filter);
    }

    if let Some(tags) = &cli.tags {
        config.action.tags = split_comma_list(tags)
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<()> {
    let max_depth = config.max_depth()?;
    let action = config.build_action().context("invalid extraction action")?;

    println!("=== Trawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start address: {}", config.start_address());
    println!("  Max depth: {}", max_depth);
    println!("  Max workers per phase: {}", config.crawler.max_workers);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nAction:");
    println!("  Kind: {:?}", action.kind());
    println!("  Term: {}", config.action.term);
    println!("  Case sensitive: {}", config.action.case_sensitive);
    if config.action.tags.is_empty() {
        println!("  Tags: (whole document)");
    } else {
        println!("  Tags: {}", config.action.tags.join(", "));
    }

    match config.link_filter() {
        None => println!("\nLink filter: (follow every anchor)"),
        Some(_) => {
            println!("\nLink filter:");
            for (attribute, values) in config.filter.iter().flatten() {
                println!("  - {}: {}", attribute, values.join(", "));
            }
        }
    }

    println!("\nOutput:");
    println!(
        "  Report: {}",
        config.output.report_path.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Summary: {}",
        config.output.summary_path.as_deref().unwrap_or("(stdout)")
    );

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", config.start_address());

    Ok(())
}

/// Handles the --show mode: prints a saved report
fn handle_show(path: &Path) -> Result<()> {
    let report = load_report_file(path)
        .with_context(|| format!("failed to load report {}", path.display()))?;
    print!("{}", format_markdown_summary(&report));
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<()> {
    let max_depth = config.max_depth()?;
    let action = config.build_action()?;
    let fetcher = HttpFetcher::new(&config.fetcher_settings())?;
    let filter: Option<LinkFilter> = config.link_filter();

    let cancel = CancelFlag::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received; stopping after the current round");
            ctrl_c.cancel();
        }
    });

    let report = Coordinator::new(Arc::new(fetcher), Arc::new(action), max_depth)
        .with_filter(filter)
        .with_max_workers(config.crawler.max_workers)
        .with_cancel_flag(cancel)
        .seed(config.start_address())
        .run()
        .await;

    tracing::info!(
        "Crawl finished in {:.3}s: {} pages with {} matches",
        report.crawl_time(),
        report.results().len(),
        report.total_matches()
    );

    write_outputs(config, &report)
}

/// Saves the report and summary where configured, else prints the summary
fn write_outputs(config: &Config, report: &CrawlReport) -> Result<()> {
    if let Some(report_path) = &config.output.report_path {
        let saved = save_report_file(report, Path::new(report_path))?;
        println!("✓ Report saved to: {}", saved.display());
    }

    match &config.output.summary_path {
        Some(summary_path) => {
            generate_markdown_summary(report, Path::new(summary_path))?;
            println!("✓ Summary written to: {}", summary_path);
        }
        None => print!("{}", format_markdown_summary(report)),
    }

    Ok(())
}
