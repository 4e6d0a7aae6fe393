//! Streaming hyperlink extraction
//!
//! This module turns an open byte stream into a list of outbound links
//! without buffering the document:
//! - `scanner`: forward-only character primitives over any `Read`
//! - `builder`: the tag interpreter that recognises `<a>`, `<base>` and `<body>`

mod builder;
mod scanner;

pub use builder::{is_absolute_link, LinkExtractor, ParserState};
pub use scanner::{Chars, StreamScanner, LINE_BOUNDARY};

use std::io::Read;
use url::Url;

/// Convenience function for extracting links from a stream with a fresh extractor
///
/// # Example
///
/// ```
/// use linkwalk::extract::extract_links;
///
/// let html = r#"<base href="http://a.test/"><body><a href="p2.html">"#;
/// let links = extract_links("http://a.test/", html.as_bytes());
/// assert_eq!(links[0].as_str(), "http://a.test/p2.html");
/// ```
pub fn extract_links<R: Read>(page_url: &str, stream: R) -> Vec<Url> {
    LinkExtractor::new().create_list(page_url, stream)
}
