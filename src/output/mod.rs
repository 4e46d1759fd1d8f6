//! Output module for crawl reports
//!
//! This module handles:
//! - The immutable crawl report and its structured document shape
//! - Saving and loading reports as JSON documents or snapshots
//! - Rendering reports as markdown

mod markdown;
mod report;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{epoch_seconds_now, ActionResult, CrawlReport, ReportDocument};

use crate::storage;
use crate::{Result, TrawlError};
use std::path::{Path, PathBuf};

/// On-disk report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Structured JSON document (`.json`)
    Document,

    /// SQLite snapshot (`.store`)
    Snapshot,
}

impl ReportFormat {
    /// Picks the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(Self::Document),
            Some("store") => Some(Self::Snapshot),
            _ => None,
        }
    }

    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Document => "json",
            Self::Snapshot => "store",
        }
    }
}

/// Saves a report, choosing the format from the file extension
///
/// A path without a `.json` or `.store` extension gets `.json` appended.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The path actually written
/// * `Err(TrawlError)` - Failed to serialize or write the report
pub fn save_report_file(report: &CrawlReport, path: &Path) -> Result<PathBuf> {
    let (format, path) = match ReportFormat::from_path(path) {
        Some(format) => (format, path.to_path_buf()),
        None => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".");
            name.push(ReportFormat::Document.extension());
            (ReportFormat::Document, PathBuf::from(name))
        }
    };

    match format {
        ReportFormat::Document => std::fs::write(&path, report.to_json()?)?,
        ReportFormat::Snapshot => storage::save_snapshot(&path, report)?,
    }

    tracing::info!("Report written to {}", path.display());
    Ok(path)
}

/// Loads a report saved by [`save_report_file`]
pub fn load_report_file(path: &Path) -> Result<CrawlReport> {
    match ReportFormat::from_path(path) {
        Some(ReportFormat::Document) => {
            let json = std::fs::read_to_string(path)?;
            CrawlReport::from_json(&json)
        }
        Some(ReportFormat::Snapshot) => Ok(storage::load_snapshot(path)?),
        None => Err(TrawlError::UnsupportedReport(path.display().to_string())),
    }
}
