//! Candidate-page fetching and excerpt extraction
//!
//! This module turns a candidate URL into a short, normalized excerpt of the
//! page's main content. It owns the HTTP client used for page fetches, the
//! retry/backoff behavior, and the main-content isolation strategy.

mod excerpt;
mod fetcher;
mod isolate;

pub use excerpt::{title_text, ExcerptExtractor};
pub use fetcher::{build_http_client, fetch_html, fetch_once, FetchFailure};
pub use isolate::{ContentFragment, MainContentIsolator, ReadabilityIsolator};

use async_trait::async_trait;

/// Extraction seam between discovery and assembly
///
/// The assembler only needs "URL in, excerpt or nothing out"; alternate
/// strategies (and tests) substitute here without touching assembly logic.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Produces a non-empty excerpt for the URL, or `None` to skip it.
    async fn extract(&self, url: &str) -> Option<String>;
}

#[async_trait]
impl Extractor for ExcerptExtractor {
    async fn extract(&self, url: &str) -> Option<String> {
        ExcerptExtractor::extract(self, url).await
    }
}
