//! Crawler module for frontier-driven traversal
//!
//! This module contains the core crawling logic, including:
//! - Opening byte streams for URLs
//! - Deciding which pages are results
//! - Overall crawl coordination and stopping bounds

mod coordinator;
mod fetcher;
mod matcher;
mod stats;

pub use coordinator::{CrawlLimits, Crawler, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LINKS};
pub use fetcher::{build_http_client, Fetch, FetchError, HttpFetcher};
pub use matcher::{MatchPredicate, TermMatcher};
pub use stats::CrawlStats;

use crate::config::Config;
use crate::storage::FrontierStore;

/// Runs a complete crawl from configuration
///
/// This is the main entry point for a configured crawl. It will:
/// 1. Build the HTTP fetcher
/// 2. Apply the configured bounds and search terms
/// 3. Crawl from `start_url` against `store`
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `store` - The frontier store to crawl against
/// * `start_url` - The seed URL
///
/// # Returns
///
/// * `Ok((results, stats))` - Matched URLs and run counters
/// * `Err(CrawlError)` - Client setup or storage failed
pub fn crawl<S: FrontierStore>(
    config: &Config,
    store: S,
    start_url: &str,
) -> crate::Result<(Vec<String>, CrawlStats)> {
    let fetcher = HttpFetcher::new(&config.fetch)?;

    let limits = CrawlLimits::from_overrides(config.crawler.max_links, config.crawler.max_depth);
    let mut crawler = Crawler::new(store, fetcher, TermMatcher, limits)
        .with_search_terms(config.search.terms.clone());

    let results = crawler.crawl(start_url)?;
    Ok((results, crawler.stats()))
}
