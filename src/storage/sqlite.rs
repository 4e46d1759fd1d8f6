//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ReportStore trait.

use crate::output::{ActionResult, CrawlReport};
use crate::state::MaxDepth;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ReportStore, StorageError, StorageResult, StoredReport};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a report database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Default rollback journal keeps a snapshot in a single file
        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn load_results(&self, report_id: i64) -> StorageResult<Vec<ActionResult>> {
        let mut result_stmt = self
            .conn
            .prepare("SELECT id, address FROM results WHERE report_id = ?1 ORDER BY position")?;
        let rows = result_stmt
            .query_map(params![report_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut match_stmt = self
            .conn
            .prepare("SELECT value FROM matches WHERE result_id = ?1 ORDER BY position")?;

        let mut results = Vec::with_capacity(rows.len());
        for (result_id, address) in rows {
            let matches = match_stmt
                .query_map(params![result_id], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            results.push(ActionResult::new(address, matches));
        }

        Ok(results)
    }
}

impl ReportStore for SqliteStorage {
    fn save_report(&mut self, report: &CrawlReport) -> StorageResult<i64> {
        let tx = self.conn.transaction()?;
        let report_id = insert_report(&tx, report)?;
        tx.commit()?;
        Ok(report_id)
    }

    fn replace_report(&mut self, report: &CrawlReport) -> StorageResult<i64> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(CLEAR_SQL)?;
        let report_id = insert_report(&tx, report)?;
        tx.commit()?;
        Ok(report_id)
    }

    fn load_report(&self, report_id: i64) -> StorageResult<CrawlReport> {
        let row = self
            .conn
            .query_row(
                "SELECT start_address, max_depth, start_time, end_time FROM reports WHERE id = ?1",
                params![report_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                    ))
                },
            )
            .optional()?;

        let (start_address, max_depth, start_time, end_time) =
            row.ok_or(StorageError::ReportNotFound(report_id))?;
        let max_depth =
            MaxDepth::try_from(max_depth).map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let results = self.load_results(report_id)?;

        Ok(CrawlReport::new(
            start_address,
            max_depth,
            start_time,
            end_time,
            results,
        ))
    }

    fn latest_report(&self) -> StorageResult<Option<CrawlReport>> {
        let latest_id = self
            .conn
            .query_row(
                "SELECT id FROM reports ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        latest_id.map(|id| self.load_report(id)).transpose()
    }

    fn list_reports(&self) -> StorageResult<Vec<StoredReport>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, start_address, start_time, saved_at FROM reports ORDER BY id")?;

        let reports = stmt
            .query_map([], |row| {
                Ok(StoredReport {
                    id: row.get(0)?,
                    start_address: row.get(1)?,
                    start_time: row.get(2)?,
                    saved_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reports)
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.conn.execute_batch(CLEAR_SQL)?;
        Ok(())
    }
}

const CLEAR_SQL: &str = "
    DELETE FROM matches;
    DELETE FROM results;
    DELETE FROM reports;
";

/// Inserts a report with its results and matches inside `tx`
fn insert_report(tx: &Transaction<'_>, report: &CrawlReport) -> StorageResult<i64> {
    tx.execute(
        "INSERT INTO reports (start_address, max_depth, start_time, end_time, saved_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            report.start_address(),
            i64::from(report.max_depth()),
            report.start_time(),
            report.end_time(),
            Utc::now().to_rfc3339(),
        ],
    )?;
    let report_id = tx.last_insert_rowid();

    let mut result_stmt =
        tx.prepare("INSERT INTO results (report_id, position, address) VALUES (?1, ?2, ?3)")?;
    let mut match_stmt =
        tx.prepare("INSERT INTO matches (result_id, position, value) VALUES (?1, ?2, ?3)")?;

    for (position, result) in report.results().iter().enumerate() {
        result_stmt.execute(params![report_id, position as i64, result.address])?;
        let result_id = tx.last_insert_rowid();

        for (match_position, value) in result.matches.iter().enumerate() {
            match_stmt.execute(params![result_id, match_position as i64, value])?;
        }
    }

    tracing::debug!(
        "Saved report {} with {} results",
        report_id,
        report.results().len()
    );
    Ok(report_id)
}
