//! Storage module for the crawl frontier
//!
//! This module holds everything the crawl loop persists between iterations:
//! - The frontier queue of discovered-but-unprocessed URLs
//! - The visited set
//! - The result set of matched pages
//!
//! Two backends implement [`FrontierStore`]: an in-memory one and a SQLite one.

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryFrontier;
pub use sqlite::SqliteFrontier;
pub use traits::{FrontierStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the persistent store, optionally wiping any previous crawl state
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
/// * `fresh` - Whether to discard the persisted frontier, visited set and results
pub fn open_storage(path: &Path, fresh: bool) -> StorageResult<SqliteFrontier> {
    let mut storage = SqliteFrontier::open(path)?;
    if fresh {
        tracing::info!("Clearing previous crawl state in {}", path.display());
        storage.clear()?;
    } else {
        let pending = storage.pending_count()?;
        if pending > 0 {
            tracing::info!("Resuming with {} URLs in the frontier", pending);
        }
    }
    Ok(storage)
}
