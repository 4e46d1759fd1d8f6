//! The finished crawl report and its structured document shape

use crate::state::MaxDepth;
use crate::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Matches found on one page
///
/// Serialized as an `[address, matches]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, Vec<String>)", into = "(String, Vec<String>)")]
pub struct ActionResult {
    /// The page the matches were found on
    pub address: String,

    /// Matches in the order the action returned them
    pub matches: Vec<String>,
}

impl ActionResult {
    /// Creates a result for `address`
    pub fn new(address: impl Into<String>, matches: Vec<String>) -> Self {
        Self {
            address: address.into(),
            matches,
        }
    }
}

impl From<(String, Vec<String>)> for ActionResult {
    fn from((address, matches): (String, Vec<String>)) -> Self {
        Self { address, matches }
    }
}

impl From<ActionResult> for (String, Vec<String>) {
    fn from(result: ActionResult) -> Self {
        (result.address, result.matches)
    }
}

/// Structured form of a [`CrawlReport`]
///
/// Field names and types are fixed: times are epoch seconds and `crawlTime`
/// is `endTime - startTime`. Unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportDocument {
    pub start_address: String,
    pub max_depth: MaxDepth,
    pub start_time: f64,
    pub end_time: f64,
    pub crawl_time: f64,
    pub results: Vec<ActionResult>,
}

/// Immutable summary of one finished crawl
///
/// A report is built once, either from the final crawl state or from a
/// [`ReportDocument`], and never changes afterwards. The elapsed time is always
/// derived from the two timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ReportDocument", from = "ReportDocument")]
pub struct CrawlReport {
    start_address: String,
    max_depth: MaxDepth,
    start_time: f64,
    end_time: f64,
    crawl_time: f64,
    results: Vec<ActionResult>,
}

impl CrawlReport {
    /// Creates a report; timestamps are epoch seconds
    pub fn new(
        start_address: impl Into<String>,
        max_depth: MaxDepth,
        start_time: f64,
        end_time: f64,
        results: Vec<ActionResult>,
    ) -> Self {
        Self {
            start_address: start_address.into(),
            max_depth,
            start_time,
            end_time,
            crawl_time: end_time - start_time,
            results,
        }
    }

    /// Rebuilds a report from its structured document
    ///
    /// The document's `crawlTime` is not trusted; it is derived again from the
    /// timestamps.
    pub fn from_document(document: ReportDocument) -> Self {
        Self::new(
            document.start_address,
            document.max_depth,
            document.start_time,
            document.end_time,
            document.results,
        )
    }

    /// Structured document for this report
    pub fn to_document(&self) -> ReportDocument {
        ReportDocument {
            start_address: self.start_address.clone(),
            max_depth: self.max_depth,
            start_time: self.start_time,
            end_time: self.end_time,
            crawl_time: self.crawl_time,
            results: self.results.clone(),
        }
    }

    /// Serializes the report as a pretty-printed JSON document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a JSON document produced by [`CrawlReport::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn start_address(&self) -> &str {
        &self.start_address
    }

    pub fn max_depth(&self) -> MaxDepth {
        self.max_depth
    }

    /// Crawl start, in epoch seconds
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Crawl end, in epoch seconds
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Elapsed seconds between start and end
    pub fn crawl_time(&self) -> f64 {
        self.crawl_time
    }

    pub fn results(&self) -> &[ActionResult] {
        &self.results
    }

    /// Crawl start as a UTC timestamp
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.start_time)
    }

    /// Crawl end as a UTC timestamp
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.end_time)
    }

    /// Total number of matches across all pages
    pub fn total_matches(&self) -> usize {
        self.results.iter().map(|result| result.matches.len()).sum()
    }
}

impl From<ReportDocument> for CrawlReport {
    fn from(document: ReportDocument) -> Self {
        Self::from_document(document)
    }
}

impl From<CrawlReport> for ReportDocument {
    fn from(report: CrawlReport) -> Self {
        Self {
            start_address: report.start_address,
            max_depth: report.max_depth,
            start_time: report.start_time,
            end_time: report.end_time,
            crawl_time: report.crawl_time,
            results: report.results,
        }
    }
}

/// Current time in epoch seconds, with microsecond resolution
pub fn epoch_seconds_now() -> f64 {
    epoch_seconds(Utc::now())
}

/// Converts a timestamp to epoch seconds
fn epoch_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1_000_000.0
}

fn to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1_000_000.0).round() as i64;
    Utc.timestamp_opt(micros.div_euclid(1_000_000), (micros.rem_euclid(1_000_000) * 1_000) as u32)
        .single()
}
