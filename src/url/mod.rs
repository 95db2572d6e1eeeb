//! URL handling for Review-Scout
//!
//! This module provides registrable-domain (eTLD+1) extraction — the dedup
//! key for the whole pipeline — and the favicon logo-URL template derived
//! from it.

mod domain;

pub use domain::registrable_domain;

/// Favicon service used for card logos. The URL is emitted in responses but
/// never fetched by this service.
const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?sz=64&domain=";

/// Builds the logo URL for a card from a URL or bare domain
///
/// Full URLs are reduced to their registrable domain first; bare domains are
/// used as-is, mirroring how callers sometimes already hold the dedup key.
///
/// # Examples
///
/// ```
/// use review_scout::url::logo_url;
///
/// assert_eq!(
///     logo_url("https://blog.example.com/post"),
///     "https://www.google.com/s2/favicons?sz=64&domain=example.com"
/// );
/// ```
pub fn logo_url(url_or_domain: &str) -> String {
    let domain = if url_or_domain.starts_with("http") {
        registrable_domain(url_or_domain)
    } else {
        url_or_domain.to_string()
    };
    format!("{}{}", FAVICON_SERVICE, urlencoding::encode(&domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_url_from_full_url() {
        assert_eq!(
            logo_url("https://www.example.com/path?q=1"),
            "https://www.google.com/s2/favicons?sz=64&domain=example.com"
        );
    }

    #[test]
    fn test_logo_url_from_bare_domain() {
        assert_eq!(
            logo_url("example.co.uk"),
            "https://www.google.com/s2/favicons?sz=64&domain=example.co.uk"
        );
    }

    #[test]
    fn test_logo_url_encodes_domain() {
        let logo = logo_url("weird domain");
        assert!(logo.ends_with("domain=weird%20domain"));
    }
}
