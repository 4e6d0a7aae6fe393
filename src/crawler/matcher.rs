//! Match predicates deciding which crawled pages are results

use url::Url;

/// Decides whether a fetched page is a hit
///
/// Implementations must be side-effect free; the crawl loop may call them in
/// any order.
pub trait MatchPredicate {
    fn matches(&self, url: &Url, search_terms: &[String]) -> bool;
}

impl<F> MatchPredicate for F
where
    F: Fn(&Url, &[String]) -> bool,
{
    fn matches(&self, url: &Url, search_terms: &[String]) -> bool {
        self(url, search_terms)
    }
}

/// Matches pages whose URL contains any search term, ignoring case
///
/// An empty term list matches every page.
///
/// # Examples
///
/// ```
/// use linkwalk::crawler::{MatchPredicate, TermMatcher};
/// use url::Url;
///
/// let url = Url::parse("https://example.com/Rust/book").unwrap();
/// assert!(TermMatcher.matches(&url, &["rust".to_string()]));
/// assert!(!TermMatcher.matches(&url, &["python".to_string()]));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TermMatcher;

impl MatchPredicate for TermMatcher {
    fn matches(&self, url: &Url, search_terms: &[String]) -> bool {
        if search_terms.is_empty() {
            return true;
        }
        let haystack = url.as_str().to_lowercase();
        search_terms
            .iter()
            .any(|term| haystack.contains(&term.to_lowercase()))
    }
}
