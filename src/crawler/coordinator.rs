//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Pulling the next URL from the frontier store
//! - Opening a stream and running the link extractor over it
//! - Enqueueing newly discovered links
//! - Applying the match predicate
//! - Enforcing the stopping bounds

use crate::crawler::fetcher::Fetch;
use crate::crawler::matcher::MatchPredicate;
use crate::crawler::stats::CrawlStats;
use crate::extract::LinkExtractor;
use crate::storage::FrontierStore;
use crate::CrawlError;
use std::time::Instant;
use url::Url;

/// Default maximum number of frontier pops
pub const DEFAULT_MAX_LINKS: u32 = 100;

/// Default maximum depth
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Largest accepted bound; the loop counters must be able to exceed it
const MAX_BOUND: u32 = u32::MAX - 1;

/// Stopping bounds for a crawl
///
/// Both bounds are compared against counters that advance once per loop
/// iteration, so under default stepping they limit the same quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    max_links: u32,
    max_depth: u32,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_links: DEFAULT_MAX_LINKS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CrawlLimits {
    /// Creates limits from explicit values; non-positive values keep the default
    pub fn new(max_links: i64, max_depth: i64) -> Self {
        Self::from_overrides(Some(max_links), Some(max_depth))
    }

    /// Applies optional overrides field by field
    ///
    /// A missing or non-positive override leaves that field at its default.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkwalk::CrawlLimits;
    ///
    /// let limits = CrawlLimits::from_overrides(Some(0), Some(5));
    /// assert_eq!(limits.max_links(), 100);
    /// assert_eq!(limits.max_depth(), 5);
    /// ```
    pub fn from_overrides(max_links: Option<i64>, max_depth: Option<i64>) -> Self {
        Self {
            max_links: apply_override("max_links", max_links, DEFAULT_MAX_LINKS),
            max_depth: apply_override("max_depth", max_depth, DEFAULT_MAX_DEPTH),
        }
    }

    pub fn max_links(&self) -> u32 {
        self.max_links
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Upper bound on loop iterations for these limits
    pub fn max_iterations(&self) -> u32 {
        self.max_links.min(self.max_depth) + 1
    }
}

fn apply_override(name: &str, value: Option<i64>, default: u32) -> u32 {
    match value {
        Some(v) if v > 0 => v.min(i64::from(MAX_BOUND)) as u32,
        Some(v) => {
            tracing::warn!("Ignoring non-positive {} override {}, using {}", name, v, default);
            default
        }
        None => default,
    }
}

/// Main crawler structure
///
/// Generic over the frontier store, the fetch primitive and the match
/// predicate so each can be swapped independently.
pub struct Crawler<S, F, M> {
    store: S,
    fetcher: F,
    matcher: M,
    extractor: LinkExtractor,
    limits: CrawlLimits,
    search_terms: Vec<String>,
    stats: CrawlStats,
}

impl<S, F, M> Crawler<S, F, M>
where
    S: FrontierStore,
    F: Fetch,
    M: MatchPredicate,
{
    /// Creates a new crawler instance
    ///
    /// # Arguments
    ///
    /// * `store` - Frontier, visited and result storage, owned for the crawl's duration
    /// * `fetcher` - Opens byte streams for URLs
    /// * `matcher` - Decides which pages are results
    /// * `limits` - Stopping bounds
    pub fn new(store: S, fetcher: F, matcher: M, limits: CrawlLimits) -> Self {
        Self {
            store,
            fetcher,
            matcher,
            extractor: LinkExtractor::new(),
            limits,
            search_terms: Vec::new(),
            stats: CrawlStats::default(),
        }
    }

    /// Sets the search terms handed to the match predicate
    pub fn with_search_terms(mut self, search_terms: Vec<String>) -> Self {
        self.search_terms = search_terms;
        self
    }

    pub fn limits(&self) -> CrawlLimits {
        self.limits
    }

    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    /// Counters from the most recent crawl
    pub fn stats(&self) -> CrawlStats {
        self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Crawls from `start_url` and returns the matched URLs
    ///
    /// # Loop
    ///
    /// Each iteration:
    /// 1. If the cursor is a valid URL not yet in the frontier or visited set,
    ///    fetch it, extract links, enqueue unseen links and apply the predicate
    /// 2. Mark the cursor visited
    /// 3. Pop the next URL (empty once the frontier is exhausted) and advance
    ///    both counters
    ///
    /// The loop stops once the priority counter exceeds `max_depth` or the
    /// processed counter exceeds `max_links`. Fetch failures and malformed
    /// URLs are logged and skipped; only storage errors abort the crawl.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use linkwalk::config::FetchConfig;
    /// use linkwalk::{CrawlLimits, Crawler, HttpFetcher, MemoryFrontier, TermMatcher};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = HttpFetcher::new(&FetchConfig::default())?;
    /// let mut crawler = Crawler::new(MemoryFrontier::new(), fetcher, TermMatcher, CrawlLimits::default())
    ///     .with_search_terms(vec!["rust".to_string()]);
    /// let results = crawler.crawl("https://example.com/")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn crawl(&mut self, start_url: &str) -> Result<Vec<String>, CrawlError> {
        self.stats = CrawlStats::default();
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl from {} (max links {}, max depth {})",
            start_url,
            self.limits.max_links,
            self.limits.max_depth
        );

        let mut cursor = start_url.to_string();
        let mut links_processed: u32 = 0;
        let mut priority: u32 = 0;

        loop {
            if !cursor.is_empty() {
                let parsed = Url::parse(&cursor);
                match parsed {
                    Ok(url) => {
                        // Store keys use the parsed form, as extracted links do
                        cursor = url.as_str().to_string();
                        if self.store.exists_in_frontier_or_visited(&cursor)? {
                            tracing::debug!("Skipping already seen URL: {}", cursor);
                        } else {
                            self.process_url(&url, priority)?;
                        }
                    }
                    Err(e) => tracing::warn!("Skipping malformed URL {}: {}", cursor, e),
                }
            }

            self.store.mark_visited(&cursor)?;
            cursor = self.store.next_url()?.unwrap_or_default();
            links_processed += 1;
            priority += 1;
            self.stats.iterations += 1;

            if priority > self.limits.max_depth || links_processed > self.limits.max_links {
                break;
            }
        }

        let results = self.store.drain_results()?;

        tracing::info!(
            "Crawl completed: {} iterations, {} pages fetched, {} failures, {} matches in {:?}",
            self.stats.iterations,
            self.stats.pages_fetched,
            self.stats.fetch_failures,
            results.len(),
            start_time.elapsed()
        );

        Ok(results)
    }

    /// Processes a single URL
    ///
    /// A failure to open the stream is counted and logged; nothing else
    /// happens for the URL. The page is out of the frontier but not yet
    /// visited while this runs, so links back to it are skipped here.
    fn process_url(&mut self, url: &Url, priority: u32) -> Result<(), CrawlError> {
        let cursor = url.as_str();
        tracing::debug!("Processing URL: {} (priority {})", cursor, priority);

        let stream = match self.fetcher.open_stream(url) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", cursor, e);
                self.stats.fetch_failures += 1;
                return Ok(());
            }
        };
        self.stats.pages_fetched += 1;

        let links = self.extractor.create_list(cursor, stream);
        self.stats.links_extracted += links.len() as u32;

        for link in &links {
            let link = link.as_str();
            if link == cursor || self.store.exists_in_frontier_or_visited(link)? {
                continue;
            }
            self.store.enqueue(priority, link, cursor)?;
            self.stats.links_enqueued += 1;
        }

        if self.matcher.matches(url, &self.search_terms) {
            tracing::debug!("Match: {}", cursor);
            self.store.record_match(cursor)?;
            self.stats.matches += 1;
        }

        Ok(())
    }
}
