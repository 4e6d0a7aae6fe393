//! In-memory frontier store
//!
//! Holds the frontier, visited set and results for a single process. Used by
//! tests and by throwaway crawls that do not need to survive a restart.

use crate::storage::traits::{FrontierStore, StorageResult};
use std::collections::{BTreeMap, HashMap, HashSet};

/// In-memory storage backend
#[derive(Debug, Default)]
pub struct MemoryFrontier {
    /// Pending entries keyed by (priority, insertion sequence)
    queue: BTreeMap<(u32, u64), String>,
    /// Pending URL -> referrer
    pending: HashMap<String, String>,
    visited: HashSet<String>,
    results: Vec<String>,
    next_seq: u64,
}

impl MemoryFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URLs waiting in the frontier
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Number of URLs marked visited
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// The page a pending URL was discovered on
    pub fn referrer(&self, url: &str) -> Option<&str> {
        self.pending.get(url).map(String::as_str)
    }
}

impl FrontierStore for MemoryFrontier {
    fn exists_in_frontier_or_visited(&self, url: &str) -> StorageResult<bool> {
        Ok(self.pending.contains_key(url) || self.visited.contains(url))
    }

    fn enqueue(&mut self, priority: u32, url: &str, referrer: &str) -> StorageResult<()> {
        if self.pending.contains_key(url) {
            return Ok(());
        }
        self.queue.insert((priority, self.next_seq), url.to_string());
        self.pending.insert(url.to_string(), referrer.to_string());
        self.next_seq += 1;
        Ok(())
    }

    fn next_url(&mut self) -> StorageResult<Option<String>> {
        let url = self.queue.pop_first().map(|(_, url)| url);
        if let Some(url) = &url {
            self.pending.remove(url);
        }
        Ok(url)
    }

    fn mark_visited(&mut self, url: &str) -> StorageResult<()> {
        self.visited.insert(url.to_string());
        Ok(())
    }

    fn record_match(&mut self, url: &str) -> StorageResult<()> {
        self.results.push(url.to_string());
        Ok(())
    }

    fn drain_results(&mut self) -> StorageResult<Vec<String>> {
        Ok(std::mem::take(&mut self.results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_and_exists() {
        let mut store = MemoryFrontier::new();
        assert!(!store.exists_in_frontier_or_visited("http://a.test/").unwrap());

        store.enqueue(0, "http://a.test/", "seed").unwrap();
        assert!(store.exists_in_frontier_or_visited("http://a.test/").unwrap());
        assert_eq!(store.referrer("http://a.test/"), Some("seed"));
    }

    #[test]
    fn test_next_url_priority_then_fifo() {
        let mut store = MemoryFrontier::new();
        store.enqueue(1, "http://a.test/late", "r").unwrap();
        store.enqueue(0, "http://a.test/first", "r").unwrap();
        store.enqueue(0, "http://a.test/second", "r").unwrap();

        assert_eq!(store.next_url().unwrap().as_deref(), Some("http://a.test/first"));
        assert_eq!(store.next_url().unwrap().as_deref(), Some("http://a.test/second"));
        assert_eq!(store.next_url().unwrap().as_deref(), Some("http://a.test/late"));
        assert_eq!(store.next_url().unwrap(), None);
    }

    #[test]
    fn test_popped_url_is_neither_pending_nor_visited() {
        let mut store = MemoryFrontier::new();
        store.enqueue(0, "http://a.test/", "r").unwrap();
        store.next_url().unwrap();
        assert!(!store.exists_in_frontier_or_visited("http://a.test/").unwrap());

        store.mark_visited("http://a.test/").unwrap();
        assert!(store.exists_in_frontier_or_visited("http://a.test/").unwrap());
        assert_eq!(store.visited_count(), 1);
    }

    #[test]
    fn test_duplicate_enqueue_ignored() {
        let mut store = MemoryFrontier::new();
        store.enqueue(0, "http://a.test/", "r").unwrap();
        store.enqueue(3, "http://a.test/", "other").unwrap();
        assert_eq!(store.pending_count(), 1);
        assert_eq!(store.referrer("http://a.test/"), Some("r"));
    }

    #[test]
    fn test_drain_results_in_order_and_clears() {
        let mut store = MemoryFrontier::new();
        store.record_match("http://a.test/1").unwrap();
        store.record_match("http://a.test/2").unwrap();

        assert_eq!(
            store.drain_results().unwrap(),
            vec!["http://a.test/1", "http://a.test/2"]
        );
        assert!(store.drain_results().unwrap().is_empty());
    }
}
