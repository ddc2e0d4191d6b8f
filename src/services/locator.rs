//! Unsubscribe link location.
//!
//! Scans extracted body content for anchors that look like unsubscribe
//! affordances. Matching is heuristic: an anchor qualifies when its visible
//! text or its href mentions unsubscribing or preference management.

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Locates unsubscribe candidate links in HTML content.
///
/// The regex and selector are compiled once at construction; `locate` is
/// then cheap enough to call per message.
pub struct LinkLocator {
    pattern: Regex,
    anchors: Selector,
}

impl LinkLocator {
    /// Creates a locator with the standard unsubscribe heuristics.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"(?i)unsubscribe|opt[-\s]?out|email preferences|manage preferences")
                .expect("unsubscribe pattern is valid"),
            anchors: Selector::parse("a[href]").expect("anchor selector is valid"),
        }
    }

    /// Returns candidate unsubscribe URLs in document order.
    ///
    /// Only absolute `http`/`https` URLs qualify; relative and other-scheme
    /// hrefs are dropped silently. Duplicates are preserved — the executor
    /// visits candidates in order and stops at the first success. Malformed
    /// HTML never fails: the parser is lenient and an empty body
    /// short-circuits to an empty list.
    pub fn locate(&self, body: &str) -> Vec<String> {
        if body.trim().is_empty() {
            return Vec::new();
        }

        let document = Html::parse_document(body);
        let mut candidates = Vec::new();

        for anchor in document.select(&self.anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let text: String = anchor.text().collect();

            let looks_like_unsubscribe =
                self.pattern.is_match(&text) || self.pattern.is_match(href);
            if looks_like_unsubscribe && is_web_url(href) {
                candidates.push(href.to_string());
            }
        }

        tracing::debug!(count = candidates.len(), "located unsubscribe candidates");
        candidates
    }
}

impl Default for LinkLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether an href is an absolute http or https URL.
fn is_web_url(href: &str) -> bool {
    Url::parse(href)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_and_orders_candidates() {
        let locator = LinkLocator::new();
        let html = r#"
            <a href="https://x.com/unsubscribe">Click</a>
            <a href="/relative">Unsubscribe</a>
            <a href="https://x.com/other">Manage preferences</a>
        "#;

        assert_eq!(
            locator.locate(html),
            vec!["https://x.com/unsubscribe", "https://x.com/other"]
        );
    }

    #[test]
    fn empty_body_yields_empty_list() {
        let locator = LinkLocator::new();
        assert!(locator.locate("").is_empty());
        assert!(locator.locate("   \n  ").is_empty());
    }

    #[test]
    fn matches_on_anchor_text() {
        let locator = LinkLocator::new();
        let html = r#"<a href="https://news.example.com/u/123">Unsubscribe here</a>"#;
        assert_eq!(locator.locate(html), vec!["https://news.example.com/u/123"]);
    }

    #[test]
    fn matches_on_href_alone() {
        let locator = LinkLocator::new();
        let html = r#"<a href="https://news.example.com/unsubscribe?id=9">tiny</a>"#;
        assert_eq!(
            locator.locate(html),
            vec!["https://news.example.com/unsubscribe?id=9"]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let locator = LinkLocator::new();
        let html = r#"
            <a href="https://a.com/1">UNSUBSCRIBE</a>
            <a href="https://a.com/2">Opt Out</a>
            <a href="https://a.com/3">opt-out</a>
            <a href="https://a.com/4">Email Preferences</a>
        "#;
        assert_eq!(
            locator.locate(html),
            vec![
                "https://a.com/1",
                "https://a.com/2",
                "https://a.com/3",
                "https://a.com/4"
            ]
        );
    }

    #[test]
    fn non_web_schemes_are_dropped() {
        let locator = LinkLocator::new();
        let html = r#"
            <a href="mailto:unsubscribe@x.com">Unsubscribe</a>
            <a href="ftp://x.com/unsubscribe">Unsubscribe</a>
            <a href="http://x.com/unsubscribe">Unsubscribe</a>
        "#;
        assert_eq!(locator.locate(html), vec!["http://x.com/unsubscribe"]);
    }

    #[test]
    fn unrelated_anchors_are_ignored() {
        let locator = LinkLocator::new();
        let html = r#"<a href="https://x.com/shop">Shop now</a>"#;
        assert!(locator.locate(html).is_empty());
    }

    #[test]
    fn duplicates_are_preserved() {
        let locator = LinkLocator::new();
        let html = r#"
            <a href="https://x.com/unsub">Unsubscribe</a>
            <a href="https://x.com/unsub">Unsubscribe</a>
        "#;
        assert_eq!(
            locator.locate(html),
            vec!["https://x.com/unsub", "https://x.com/unsub"]
        );
    }

    #[test]
    fn malformed_html_never_fails() {
        let locator = LinkLocator::new();
        let html = r#"<a href="https://x.com/unsubscribe">Unsubscribe<div><<<"#;
        assert_eq!(locator.locate(html), vec!["https://x.com/unsubscribe"]);

        assert!(locator.locate("<<<>>>&&&").is_empty());
    }

    #[test]
    fn plain_text_body_yields_no_candidates() {
        // Plain-text fallback bodies have no anchors; the parser still
        // accepts them without error.
        let locator = LinkLocator::new();
        assert!(locator
            .locate("To unsubscribe visit https://x.com/unsub")
            .is_empty());
    }
}
