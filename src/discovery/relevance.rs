//! Topical allow-list for keyless discovery results
//!
//! The instant-answer fallback returns loosely related links; without a
//! search operator to scope them, results are filtered by an explicit
//! keyword allow-list instead of inline pattern matching, so the policy is
//! independently testable.

/// Terms that mark a link or its description as plausibly editorial/review
/// content: content-type words plus fragments of well-known publisher
/// domains.
const TOPICAL_KEYWORDS: &[&str] = &[
    "review",
    "blog",
    "travel",
    "guide",
    "visit",
    "trip",
    "tour",
    "itinerary",
    "tripadvisor",
    "lonelyplanet",
    "wikivoyage",
    "atlasobscura",
    "timeout",
    "cntraveler",
    "fodors",
    "frommers",
    "roughguides",
    "medium.com",
];

/// Returns true when a keyless discovery hit looks topical
///
/// Matches case-insensitively against both the URL and the hit's description
/// text; either is enough.
pub fn is_relevant(url: &str, text: &str) -> bool {
    let url = url.to_lowercase();
    let text = text.to_lowercase();
    TOPICAL_KEYWORDS
        .iter()
        .any(|kw| url.contains(kw) || text.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_on_url() {
        assert!(is_relevant("https://example.com/eiffel-tower-review", ""));
        assert!(is_relevant("https://www.tripadvisor.com/Attraction_Review-x", ""));
    }

    #[test]
    fn test_matches_on_text() {
        assert!(is_relevant(
            "https://example.com/a",
            "A complete travel guide to the landmark"
        ));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_relevant("https://example.com/REVIEW", ""));
        assert!(is_relevant("https://example.com/x", "Lonely Planet says: LonelyPlanet"));
    }

    #[test]
    fn test_irrelevant_hit_rejected() {
        assert!(!is_relevant(
            "https://example.com/checkout",
            "Buy tickets online now"
        ));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(!is_relevant("", ""));
    }
}
