//! Per-run crawl counters

/// Counters collected during one call to `crawl`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Loop iterations executed (frontier pops, including empty ones)
    pub iterations: u32,

    /// Pages whose stream opened and was scanned
    pub pages_fetched: u32,

    /// Pages whose stream could not be opened
    pub fetch_failures: u32,

    /// Candidate links returned by the extractor, before deduplication
    pub links_extracted: u32,

    /// Links newly added to the frontier
    pub links_enqueued: u32,

    /// Pages accepted by the match predicate
    pub matches: u32,
}

impl CrawlStats {
    /// Fraction of attempted fetches that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.fetch_failures;
        if attempted > 0 {
            (self.pages_fetched as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let stats = CrawlStats {
            pages_fetched: 3,
            fetch_failures: 1,
            ..Default::default()
        };
        assert!((stats.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_rate_no_attempts() {
        assert_eq!(CrawlStats::default().success_rate(), 0.0);
    }
}
