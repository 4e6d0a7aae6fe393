//! Storage traits and error types
//!
//! This module defines the frontier/result store contract the crawl loop
//! depends on, and the errors its backends report.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Frontier, visited set and result set behind one capability
///
/// A URL moves through the store exactly once: enqueued into the frontier,
/// handed out by [`next_url`](FrontierStore::next_url), then marked visited.
/// It is never re-enqueued after that.
pub trait FrontierStore {
    // ===== Frontier =====

    /// Returns true if the URL is pending in the frontier or already visited
    ///
    /// A URL handed out by `next_url` but not yet marked visited is in neither.
    fn exists_in_frontier_or_visited(&self, url: &str) -> StorageResult<bool>;

    /// Adds a URL to the frontier
    ///
    /// # Arguments
    ///
    /// * `priority` - Iteration counter at discovery time (lower is popped first)
    /// * `url` - The discovered URL
    /// * `referrer` - The page the URL was discovered on
    fn enqueue(&mut self, priority: u32, url: &str, referrer: &str) -> StorageResult<()>;

    /// Removes and returns the next URL to crawl
    ///
    /// Lowest priority first, first-in first-out among equal priorities.
    /// `None` means the frontier is exhausted.
    fn next_url(&mut self) -> StorageResult<Option<String>>;

    // ===== Visited Set =====

    /// Marks a URL as processed
    fn mark_visited(&mut self, url: &str) -> StorageResult<()>;

    // ===== Results =====

    /// Appends a URL to the result set
    fn record_match(&mut self, url: &str) -> StorageResult<()>;

    /// Returns the recorded matches in record order and clears the result set
    fn drain_results(&mut self) -> StorageResult<Vec<String>>;
}

impl<S: FrontierStore + ?Sized> FrontierStore for &mut S {
    fn exists_in_frontier_or_visited(&self, url: &str) -> StorageResult<bool> {
        (**self).exists_in_frontier_or_visited(url)
    }

    fn enqueue(&mut self, priority: u32, url: &str, referrer: &str) -> StorageResult<()> {
        (**self).enqueue(priority, url, referrer)
    }

    fn next_url(&mut self) -> StorageResult<Option<String>> {
        (**self).next_url()
    }

    fn mark_visited(&mut self, url: &str) -> StorageResult<()> {
        (**self).mark_visited(url)
    }

    fn record_match(&mut self, url: &str) -> StorageResult<()> {
        (**self).record_match(url)
    }

    fn drain_results(&mut self) -> StorageResult<Vec<String>> {
        (**self).drain_results()
    }
}
