//! Hyperlink list builder
//!
//! Interprets the tags surfaced by [`StreamScanner`] and collects outbound
//! links from `<a href="...">` tags.
//!
//! # Resolution Rules
//!
//! | Link | Base declared | Body seen | Result |
//! |------|---------------|-----------|--------|
//! | absolute (`http` in first 4 chars) | any | any | added as-is |
//! | relative | yes | yes | resolved against the base |
//! | relative | otherwise | | dropped |
//!
//! A `<base>` tag is only honored before `<body>`.

use crate::extract::scanner::{StreamScanner, LINE_BOUNDARY};
use std::io::{self, Read};
use url::Url;

const TAG_OPEN: char = '<';

/// Tags the interpreter acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Anchor,
    Base,
    Body,
}

/// Classifies a lower-cased tag name
///
/// Anchors must match exactly; `base` and `body` match by prefix.
fn classify_tag(name: &str) -> Option<Tag> {
    if name == "a" {
        Some(Tag::Anchor)
    } else if name.starts_with("base") {
        Some(Tag::Base)
    } else if name.starts_with("body") {
        Some(Tag::Body)
    } else {
        None
    }
}

fn is_tag_name_end(c: char) -> bool {
    c.is_whitespace() || c == '>' || c == '/'
}

/// Per-document parse state, discarded when the document is done
#[derive(Debug, Default)]
pub struct ParserState {
    /// Once set, stays set for the rest of the document
    pub body_reached: bool,
    pub base_url: Option<Url>,
}

/// Returns true if the link is treated as absolute
///
/// A link is absolute when its first four characters, lower-cased, contain `http`.
pub fn is_absolute_link(link: &str) -> bool {
    let head: String = link.chars().take(4).collect();
    head.to_lowercase().contains("http")
}

/// Streaming hyperlink extractor
///
/// Consumes a byte stream once, front to back, and returns the links it
/// finds in document order. Links are not deduplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkExtractor;

impl LinkExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Builds the list of outbound links in `stream`
    ///
    /// `base_context_url` identifies the page being parsed in logs; relative
    /// links are only ever resolved against a `<base>` declared by the
    /// document itself. The stream is consumed and closed on every path. A
    /// read failure ends the parse and keeps the links found so far.
    pub fn create_list<R: Read>(&self, base_context_url: &str, stream: R) -> Vec<Url> {
        let span = tracing::debug_span!("create_list", page = base_context_url);
        let _enter = span.enter();

        let mut scanner = StreamScanner::new(stream);
        let mut state = ParserState::default();
        let mut links = Vec::new();

        if let Err(e) = scan_document(&mut scanner, &mut state, &mut links) {
            tracing::warn!(
                "Error reading stream for {}: {} ({} links kept)",
                base_context_url,
                e,
                links.len()
            );
        }

        tracing::debug!("Extracted {} links from {}", links.len(), base_context_url);
        links
    }
}

fn scan_document<R: Read>(
    scanner: &mut StreamScanner<R>,
    state: &mut ParserState,
    links: &mut Vec<Url>,
) -> io::Result<()> {
    while !scanner.is_exhausted() {
        if !scanner.read_until(TAG_OPEN, LINE_BOUNDARY)? {
            continue;
        }

        let first = match scanner.skip_space()? {
            Some(c) => c.to_ascii_lowercase(),
            None => break,
        };
        if first != 'a' && first != 'b' {
            continue;
        }

        let (rest, _) = scanner.read_token(is_tag_name_end)?;
        let name = format!("{}{}", first, rest.to_ascii_lowercase());

        if let Some(tag) = classify_tag(&name) {
            enact_tag(scanner, state, links, tag)?;
        }
    }
    Ok(())
}

fn enact_tag<R: Read>(
    scanner: &mut StreamScanner<R>,
    state: &mut ParserState,
    links: &mut Vec<Url>,
    tag: Tag,
) -> io::Result<()> {
    match tag {
        Tag::Anchor => {
            let raw = match extract_href(scanner)? {
                Some(raw) if !raw.is_empty() => raw,
                _ => return Ok(()),
            };

            if is_absolute_link(&raw) {
                match Url::parse(&raw) {
                    Ok(url) => links.push(url),
                    Err(e) => tracing::warn!("Dropping malformed link {}: {}", raw, e),
                }
            } else if let (Some(base), true) = (&state.base_url, state.body_reached) {
                match base.join(&raw) {
                    Ok(url) => links.push(url),
                    Err(e) => tracing::warn!("Dropping malformed link {}: {}", raw, e),
                }
            } else {
                tracing::debug!("Dropping relative link {} (no base or before body)", raw);
            }
        }

        Tag::Base => {
            if state.body_reached {
                tracing::debug!("Ignoring <base> after <body>");
                return Ok(());
            }
            if let Some(raw) = extract_href(scanner)?.filter(|r| !r.is_empty()) {
                match Url::parse(&raw) {
                    Ok(url) => state.base_url = Some(url),
                    Err(e) => tracing::warn!("Ignoring malformed base URL {}: {}", raw, e),
                }
            }
        }

        Tag::Body => state.body_reached = true,
    }
    Ok(())
}

/// Searches forward for an `href=` attribute and returns its raw value
///
/// The value runs to the next `"` or line boundary, so `href= "X"` yields an
/// empty value. Returns `None` when the stream ends without one; the search
/// does not stop at the end of the current tag.
fn extract_href<R: Read>(scanner: &mut StreamScanner<R>) -> io::Result<Option<String>> {
    while let Some(c) = scanner.skip_space()? {
        if c != 'h' && c != 'H' {
            continue;
        }
        let (token, _) = scanner.read_token(|c| c == '"' || c.is_whitespace())?;
        if token.eq_ignore_ascii_case("ref=") {
            return scanner.read_string('"', LINE_BOUNDARY);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(html: &str) -> Vec<String> {
        LinkExtractor::new()
            .create_list("http://context.test/", html.as_bytes())
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_is_absolute_link() {
        assert!(is_absolute_link("http://example.com"));
        assert!(is_absolute_link("HTTPS://example.com"));
        assert!(is_absolute_link("http"));
        assert!(!is_absolute_link("page.html"));
        assert!(!is_absolute_link("/http/page"));
        assert!(!is_absolute_link("ht"));
        assert!(!is_absolute_link(""));
    }

    #[test]
    fn test_classify_tag() {
        assert_eq!(classify_tag("a"), Some(Tag::Anchor));
        assert_eq!(classify_tag("base"), Some(Tag::Base));
        assert_eq!(classify_tag("body"), Some(Tag::Body));
        assert_eq!(classify_tag("abbr"), None);
        assert_eq!(classify_tag("br"), None);
        assert_eq!(classify_tag("b"), None);
    }

    #[test]
    fn test_base_body_anchor_example() {
        let html = r#"<base href="http://a.test/"><body><a href="p2.html"><a href="http://b.test/x">"#;
        assert_eq!(links(html), vec!["http://a.test/p2.html", "http://b.test/x"]);
    }

    #[test]
    fn test_relative_resolved_against_base() {
        let html = r#"<html><head><base href="http://site.test/docs/index.html"></head>
<body>
<a href="guide/intro.html">Intro</a>
<a href="../about.html">About</a>
</body></html>"#;
        assert_eq!(
            links(html),
            vec![
                "http://site.test/docs/guide/intro.html",
                "http://site.test/about.html"
            ]
        );
    }

    #[test]
    fn test_relative_before_body_dropped() {
        let html = r#"<base href="http://a.test/"><a href="early.html"><body><a href="late.html">"#;
        assert_eq!(links(html), vec!["http://a.test/late.html"]);
    }

    #[test]
    fn test_relative_without_base_dropped() {
        let html = r#"<body><a href="page.html"><a href="/root.html">"#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_absolute_added_regardless_of_state() {
        let html = r#"<a href="http://x.test/one"><body><a href="https://y.test/two">"#;
        assert_eq!(links(html), vec!["http://x.test/one", "https://y.test/two"]);
    }

    #[test]
    fn test_base_after_body_ignored() {
        let html = r#"<base href="http://first.test/"><body>
<base href="http://second.test/">
<a href="page.html">"#;
        assert_eq!(links(html), vec!["http://first.test/page.html"]);
    }

    #[test]
    fn test_later_base_before_body_wins() {
        let html = r#"<base href="http://first.test/"><base href="http://second.test/"><body><a href="p">"#;
        assert_eq!(links(html), vec!["http://second.test/p"]);
    }

    #[test]
    fn test_uppercase_tags_and_attributes() {
        let html = r#"<BASE HREF="http://a.test/"><BODY><A HREF="up.html">Up</A>"#;
        assert_eq!(links(html), vec!["http://a.test/up.html"]);
    }

    #[test]
    fn test_other_attributes_before_href() {
        let html = r#"<body><a class="nav" hidden title="home" href="http://a.test/home">"#;
        assert_eq!(links(html), vec!["http://a.test/home"]);
    }

    #[test]
    fn test_whitespace_after_tag_open() {
        let html = "< a href=\"http://a.test/spaced\">";
        assert_eq!(links(html), vec!["http://a.test/spaced"]);
    }

    #[test]
    fn test_other_tags_ignored() {
        let html = r#"<div><p><img src="http://a.test/i.png"><abbr title="http://no.test/">x</abbr><br/></div>"#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_empty_href_ignored() {
        let html = r#"<body><a href="">empty</a><a href="http://a.test/ok">"#;
        assert_eq!(links(html), vec!["http://a.test/ok"]);
    }

    #[test]
    fn test_space_after_href_equals_gives_empty_value() {
        let html = r#"<base href= "http://a.test/"><body><a href="http://b.test/x">"#;
        assert_eq!(links(html), vec!["http://b.test/x"]);
    }

    #[test]
    fn test_space_after_anchor_href_equals_yields_no_link() {
        let html = r#"<body><a href= "http://a.test/skipped"><a href="http://a.test/kept">"#;
        assert_eq!(links(html), vec!["http://a.test/kept"]);
    }

    #[test]
    fn test_malformed_absolute_dropped_scan_continues() {
        let html = r#"<a href="http://[broken"><a href="http://a.test/fine">"#;
        assert_eq!(links(html), vec!["http://a.test/fine"]);
    }

    #[test]
    fn test_malformed_base_ignored() {
        let html = r#"<base href="not a url"><body><a href="rel.html"><a href="http://a.test/abs">"#;
        assert_eq!(links(html), vec!["http://a.test/abs"]);
    }

    #[test]
    fn test_duplicates_kept_in_document_order() {
        let html = r#"<a href="http://a.test/1"><a href="http://a.test/2"><a href="http://a.test/1">"#;
        assert_eq!(
            links(html),
            vec!["http://a.test/1", "http://a.test/2", "http://a.test/1"]
        );
    }

    #[test]
    fn test_anchor_without_href_yields_nothing() {
        assert!(links(r#"<a name="top">Top</a>"#).is_empty());
    }

    #[test]
    fn test_empty_stream() {
        assert!(links("").is_empty());
    }

    #[test]
    fn test_unterminated_tag_at_end_of_stream() {
        assert!(links("<body><a hr").is_empty());
    }

    #[test]
    fn test_tags_across_lines() {
        let html = "<html>\n<base\nhref=\"http://a.test/\">\n<body\nclass=\"main\">\n<a\nhref=\"next.html\">\n</body>";
        assert_eq!(links(html), vec!["http://a.test/next.html"]);
    }

    #[test]
    fn test_fresh_state_per_document() {
        let extractor = LinkExtractor::new();
        let first = extractor.create_list("p1", r#"<base href="http://a.test/"><body>"#.as_bytes());
        assert!(first.is_empty());

        let second = extractor.create_list("p2", r#"<a href="rel.html">"#.as_bytes());
        assert!(second.is_empty());
    }
}
