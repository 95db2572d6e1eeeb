//! Link discovery
//!
//! An ordered chain of upstream sources proposes candidate review links for a
//! topic: an LLM link proposer, a keyed web-search API, and a keyless
//! instant-answer fallback. Each source is optional and unreliable; the
//! coordinator over-asks, degrades failing sources to empty contributions,
//! and assigns a stable rank across the whole chain.

mod coordinator;
mod instant;
mod llm;
mod relevance;
mod serper;
mod source;

pub use coordinator::LinkDiscoveryCoordinator;
pub use instant::InstantAnswerSource;
pub use llm::LlmLinkSource;
pub use relevance::is_relevant;
pub use serper::SerperSource;
pub use source::{CandidateLink, DiscoverySource, ProposedLink};

use url::Url;

/// Returns true when the string parses as an absolute http(s) URL.
///
/// Discovery sources only ever emit links that pass this check; anything
/// else (mailto:, javascript:, relative paths, prose) is dropped silently.
pub fn is_http_url(candidate: &str) -> bool {
    matches!(
        Url::parse(candidate).map(|u| u.scheme().to_string()),
        Ok(scheme) if scheme == "http" || scheme == "https"
    )
}

/// Characters that terminate a URL embedded in prose or markup.
const URL_TERMINATORS: &[char] = &[
    '"', '\'', '<', '>', ')', ']', '}', ',', '`', '\\', '|', ';',
];

/// Scans free text for raw `http(s)://` substrings, in order of appearance
///
/// Last-resort recovery used when a source's structured output cannot be
/// parsed (LLM responses) or was never structured to begin with (scraped
/// results pages). Duplicates are kept; callers dedup with rank awareness.
pub fn scan_raw_urls(text: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut rest = text;

    loop {
        let start = match (rest.find("http://"), rest.find("https://")) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => break,
        };

        let tail = &rest[start..];
        let end = tail
            .find(|c: char| c.is_whitespace() || URL_TERMINATORS.contains(&c))
            .unwrap_or(tail.len());

        let candidate = tail[..end].trim_end_matches(['.', ':']);
        if is_http_url(candidate) {
            urls.push(candidate.to_string());
        }

        rest = &tail[end.max(1)..];
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_http_url_accepts_http_and_https() {
        assert!(is_http_url("http://example.com/a"));
        assert!(is_http_url("https://example.com"));
    }

    #[test]
    fn test_is_http_url_rejects_other_schemes() {
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("javascript:void(0)"));
        assert!(!is_http_url("mailto:a@b.com"));
        assert!(!is_http_url("/relative/path"));
        assert!(!is_http_url("example.com"));
    }

    #[test]
    fn test_scan_finds_urls_in_prose() {
        let text = "See https://example.com/review and also http://other.org/post for details.";
        assert_eq!(
            scan_raw_urls(text),
            vec![
                "https://example.com/review".to_string(),
                "http://other.org/post".to_string()
            ]
        );
    }

    #[test]
    fn test_scan_stops_at_quotes_and_brackets() {
        let text = r#"<a href="https://example.com/a">link</a> [https://example.com/b] (https://example.com/c)"#;
        assert_eq!(
            scan_raw_urls(text),
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
                "https://example.com/c".to_string()
            ]
        );
    }

    #[test]
    fn test_scan_trims_trailing_punctuation() {
        let text = "Read https://example.com/story.";
        assert_eq!(scan_raw_urls(text), vec!["https://example.com/story".to_string()]);
    }

    #[test]
    fn test_scan_empty_text() {
        assert!(scan_raw_urls("").is_empty());
        assert!(scan_raw_urls("no links here at all").is_empty());
    }

    #[test]
    fn test_scan_preserves_order_of_appearance() {
        let text = "https://b.com then https://a.com";
        assert_eq!(
            scan_raw_urls(text),
            vec!["https://b.com".to_string(), "https://a.com".to_string()]
        );
    }
}
