//! Storage module for report snapshots
//!
//! A snapshot is a SQLite file holding a saved crawl report. It round-trips
//! only through this crate, unlike the structured JSON document.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{ReportStore, StorageError, StorageResult, StoredReport};

use crate::output::CrawlReport;
use std::path::Path;

/// Opens or creates a report database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Writes `report` as the only report in the snapshot at `path`
pub fn save_snapshot(path: &Path, report: &CrawlReport) -> StorageResult<()> {
    open_storage(path)?.replace_report(report)?;
    Ok(())
}

/// Reads the report held in the snapshot at `path`
pub fn load_snapshot(path: &Path) -> StorageResult<CrawlReport> {
    if !path.is_file() {
        return Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("snapshot {} does not exist", path.display()),
        )));
    }

    open_storage(path)?.latest_report()?.ok_or(StorageError::Empty)
}
