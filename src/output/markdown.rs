//! Markdown rendering of crawl reports
//!
//! This module renders a report as a human-readable document: the run
//! information first, then every page with its matches as a nested list.

use crate::output::report::CrawlReport;
use crate::Result;
use chrono::{DateTime, Local, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Format used for the start and end times
const TIME_FORMAT: &str = "%A, %d %B, %Y %I:%M:%S";

/// Writes the markdown rendering of a report to a file
///
/// # Arguments
///
/// * `report` - The finished crawl report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the summary
/// * `Err(TrawlError)` - Failed to write the file
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> Result<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The crawl report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Trawl Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start Address**: {}\n", report.start_address()));
    md.push_str(&format!("- **Max Depth**: {}\n", report.max_depth()));
    md.push_str(&format!(
        "- **Started**: {}\n",
        format_time(report.started_at())
    ));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        format_time(report.finished_at())
    ));
    md.push_str(&format!(
        "- **Crawl Time**: {:.3} seconds\n",
        report.crawl_time()
    ));
    md.push_str(&format!(
        "- **Pages With Matches**: {}\n",
        report.results().len()
    ));
    md.push_str(&format!(
        "- **Total Matches**: {}\n\n",
        report.total_matches()
    ));

    // Results
    md.push_str("## Results\n\n");
    if report.results().is_empty() {
        md.push_str("No matches found.\n");
        return md;
    }

    for result in report.results() {
        md.push_str(&format!("- {}\n", result.address));
        for found in &result.matches {
            md.push_str(&format!("  - {}\n", found.replace('\n', " ")));
        }
    }

    md
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(time) => time.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        None => "unknown".to_string(),
    }
}
