//! Excerpt extraction
//!
//! Turns a candidate URL into a short excerpt of the page's primary readable
//! content. The chain is: fetch (with retries) → main-content isolation →
//! first substantial paragraph → meta description → og:description → title.
//! Every failure mode collapses to "no excerpt"; callers skip the candidate.

use crate::config::{BackoffPolicy, FetchConfig};
use crate::extract::fetcher::{build_http_client, fetch_html};
use crate::extract::isolate::{ContentFragment, MainContentIsolator, ReadabilityIsolator};
use crate::text::normalize;
use scraper::{Html, Selector};

/// A paragraph must exceed this many characters (normalized) to qualify as an
/// excerpt; anything shorter is likely a caption or a label.
const MIN_PARAGRAPH_LEN: usize = 60;

/// Fetches candidate pages and extracts review excerpts
pub struct ExcerptExtractor {
    client: reqwest::Client,
    retry: BackoffPolicy,
    isolator: Box<dyn MainContentIsolator>,
}

impl ExcerptExtractor {
    /// Creates an extractor with the readability-style isolation strategy
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Self::with_isolator(config, Box::new(ReadabilityIsolator))
    }

    /// Creates an extractor with a caller-supplied isolation strategy
    pub fn with_isolator(
        config: &FetchConfig,
        isolator: Box<dyn MainContentIsolator>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            retry: config.retry.clone(),
            isolator,
        })
    }

    /// Fetches a page body, honoring the retry schedule
    ///
    /// Exposed separately from [`extract`](Self::extract) so the direct-URL
    /// endpoint can distinguish "page unreachable" from "page had no excerpt".
    pub async fn fetch_page(&self, url: &str) -> Option<String> {
        fetch_html(&self.client, url, &self.retry).await
    }

    /// Fetches a URL and extracts its excerpt
    ///
    /// # Returns
    ///
    /// * `Some(excerpt)` - Non-empty, normalized, ≤300 chars
    /// * `None` - Fetch failed after retries, or no usable text anywhere
    pub async fn extract(&self, url: &str) -> Option<String> {
        let body = self.fetch_page(url).await?;
        let excerpt = self.excerpt_from_html(&body);
        if excerpt.is_none() {
            tracing::debug!("No usable excerpt in {}", url);
        }
        excerpt
    }

    /// Extracts an excerpt from an already-fetched document
    ///
    /// Scans paragraphs of the isolated main-content region in document
    /// order; the first one longer than [`MIN_PARAGRAPH_LEN`] wins. Failing
    /// that, falls back to the document's meta description, og:description,
    /// and finally its title.
    pub fn excerpt_from_html(&self, html: &str) -> Option<String> {
        let fragment = self
            .isolator
            .isolate(html)
            .unwrap_or_else(|| ContentFragment::new(html.to_string()));

        for paragraph in fragment.paragraphs() {
            let line = normalize(&paragraph);
            if line.chars().count() > MIN_PARAGRAPH_LEN {
                return Some(line);
            }
        }

        // Meta fallbacks come from the full document; isolation usually
        // drops <head>.
        let document = Html::parse_document(html);
        meta_content(&document, r#"meta[name="description"]"#)
            .or_else(|| meta_content(&document, r#"meta[property="og:description"]"#))
            .or_else(|| title_from_document(&document))
    }
}

/// Extracts and normalizes the document title
///
/// Used by the direct-URL endpoint as the card's display name.
pub fn title_text(html: &str) -> Option<String> {
    title_from_document(&Html::parse_document(html))
}

fn title_from_document(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| normalize(&el.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(normalize)
        .filter(|s| !s.is_empty())
}
