//! Storage traits and error types
//!
//! This module defines the trait interface for report storage backends and
//! associated error types.

use crate::output::CrawlReport;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Report not found: {0}")]
    ReportNotFound(i64),

    #[error("Snapshot holds no report")]
    Empty,

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Summary row for a stored report
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReport {
    pub id: i64,
    pub start_address: String,
    pub start_time: f64,
    pub saved_at: String,
}

/// Trait for report storage backends
///
/// A stored report must load back equal to the report that was saved,
/// including result and match order.
pub trait ReportStore {
    /// Saves a report
    ///
    /// # Returns
    ///
    /// The ID of the stored report
    fn save_report(&mut self, report: &CrawlReport) -> StorageResult<i64>;

    /// Removes every stored report and saves `report`, as one transaction
    ///
    /// On failure the previously stored reports are left in place.
    fn replace_report(&mut self, report: &CrawlReport) -> StorageResult<i64>;

    /// Loads a report by ID
    fn load_report(&self, report_id: i64) -> StorageResult<CrawlReport>;

    /// Loads the most recently saved report, if any
    fn latest_report(&self) -> StorageResult<Option<CrawlReport>>;

    /// Lists stored reports, oldest first
    fn list_reports(&self) -> StorageResult<Vec<StoredReport>>;

    /// Removes every stored report
    fn clear(&mut self) -> StorageResult<()>;
}
