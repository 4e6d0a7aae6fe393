//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the FrontierStore
//! trait. Because the frontier and visited set are persisted, a crawl started
//! against an existing database picks up where the previous one stopped.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{FrontierStore, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteFrontier {
    conn: Connection,
}

impl SqliteFrontier {
    /// Opens or creates the database at `path`, creating missing parent directories
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteFrontier)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Deletes all frontier, visited and result rows (used for a fresh crawl)
    pub fn clear(&mut self) -> StorageResult<()> {
        self.conn.execute_batch(
            "
            DELETE FROM frontier;
            DELETE FROM visited;
            DELETE FROM results;
        ",
        )?;
        Ok(())
    }

    /// Number of URLs waiting in the frontier
    pub fn pending_count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM frontier", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Number of URLs marked visited
    pub fn visited_count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM visited", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// The page a pending URL was discovered on
    pub fn referrer(&self, url: &str) -> StorageResult<Option<String>> {
        let referrer = self
            .conn
            .query_row(
                "SELECT referrer FROM frontier WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(referrer)
    }
}

impl FrontierStore for SqliteFrontier {
    fn exists_in_frontier_or_visited(&self, url: &str) -> StorageResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM frontier WHERE url = ?1)
                 OR EXISTS(SELECT 1 FROM visited WHERE url = ?1)",
            params![url],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn enqueue(&mut self, priority: u32, url: &str, referrer: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO frontier (url, priority, referrer, discovered_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![url, priority, referrer, now],
        )?;
        Ok(())
    }

    fn next_url(&mut self) -> StorageResult<Option<String>> {
        let tx = self.conn.transaction()?;

        let next: Option<(i64, String)> = tx
            .query_row(
                "SELECT id, url FROM frontier ORDER BY priority ASC, id ASC LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        if let Some((id, _)) = &next {
            tx.execute("DELETE FROM frontier WHERE id = ?1", params![id])?;
        }
        tx.commit()?;

        Ok(next.map(|(_, url)| url))
    }

    fn mark_visited(&mut self, url: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO visited (url, visited_at) VALUES (?1, ?2)",
            params![url, now],
        )?;
        Ok(())
    }

    fn record_match(&mut self, url: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO results (url, matched_at) VALUES (?1, ?2)",
            params![url, now],
        )?;
        Ok(())
    }

    fn drain_results(&mut self) -> StorageResult<Vec<String>> {
        let tx = self.conn.transaction()?;

        let results = {
            let mut stmt = tx.prepare("SELECT url FROM results ORDER BY id ASC")?;
            let rows = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            rows
        };

        tx.execute("DELETE FROM results", [])?;
        tx.commit()?;

        Ok(results)
    }
}
