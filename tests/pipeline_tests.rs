//! End-to-end pipeline tests: discovery chain feeding the assembler
//!
//! Upstream sources and page extraction are scripted so multi-domain dedup,
//! rank ordering, and count bounds can be exercised deterministically; the
//! network-facing halves of both stages have their own wiremock coverage.

use async_trait::async_trait;
use review_scout::assemble::{ExtractedCard, ResultAssembler};
use review_scout::discovery::{
    CandidateLink, DiscoverySource, LinkDiscoveryCoordinator, ProposedLink,
};
use review_scout::extract::Extractor;
use review_scout::url::registrable_domain;
use review_scout::DiscoveryError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// A discovery source that returns a fixed link list.
struct FixedSource {
    name: &'static str,
    links: Vec<(String, String)>,
}

impl FixedSource {
    fn new(name: &'static str, urls: &[&str]) -> Self {
        Self {
            name,
            links: urls
                .iter()
                .map(|u| (u.to_string(), format!("Review at {}", u)))
                .collect(),
        }
    }
}

#[async_trait]
impl DiscoverySource for FixedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn available(&self) -> Result<(), DiscoveryError> {
        Ok(())
    }

    async fn propose(&self, _topic: &str, want: usize) -> Result<Vec<ProposedLink>, DiscoveryError> {
        Ok(self
            .links
            .iter()
            .take(want)
            .map(|(url, name)| ProposedLink::new(url.clone(), name.clone()))
            .collect())
    }
}

/// An extractor scripted per URL: excerpt, failure, or a delay then excerpt.
#[derive(Default)]
struct ScriptedExtractor {
    excerpts: HashMap<String, Option<String>>,
    delays_ms: HashMap<String, u64>,
}

impl ScriptedExtractor {
    fn extractable(urls: &[&str]) -> Self {
        Self {
            excerpts: urls
                .iter()
                .map(|u| {
                    (
                        u.to_string(),
                        Some(format!("A thorough review excerpt for {} long enough to matter.", u)),
                    )
                })
                .collect(),
            delays_ms: HashMap::new(),
        }
    }

    fn failing(mut self, url: &str) -> Self {
        self.excerpts.insert(url.to_string(), None);
        self
    }

    fn delayed(mut self, url: &str, ms: u64) -> Self {
        self.delays_ms.insert(url.to_string(), ms);
        self
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract(&self, url: &str) -> Option<String> {
        if let Some(ms) = self.delays_ms.get(url) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        self.excerpts.get(url).cloned().flatten()
    }
}

fn distinct_domain_urls(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("https://publication{i}.example{i}.com/review"))
        .collect()
}

async fn run_pipeline(
    sources: Vec<Box<dyn DiscoverySource>>,
    extractor: Arc<dyn Extractor>,
    desired: usize,
) -> Vec<ExtractedCard> {
    let coordinator = LinkDiscoveryCoordinator::with_sources(sources, 3);
    let candidates = coordinator.discover("Eiffel Tower", desired).await;
    ResultAssembler::new(extractor, 4)
        .assemble(candidates, desired)
        .await
}

#[tokio::test]
async fn test_nine_extractable_links_yield_exactly_three_ordered_cards() {
    let urls = distinct_domain_urls(9);
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();

    let cards = run_pipeline(
        vec![Box::new(FixedSource::new("fixed", &url_refs))],
        Arc::new(ScriptedExtractor::extractable(&url_refs)),
        3,
    )
    .await;

    assert_eq!(cards.len(), 3);

    // Each card from a distinct domain.
    let domains: HashSet<String> = cards.iter().map(|c| registrable_domain(&c.url)).collect();
    assert_eq!(domains.len(), 3);

    // Ordered by discovery rank: the first three proposed URLs, in order.
    let got: Vec<&str> = cards.iter().map(|c| c.url.as_str()).collect();
    assert_eq!(got, &url_refs[..3]);
}

#[tokio::test]
async fn test_same_domain_links_collapse_to_the_earlier_one() {
    let urls = ["https://example.com/a", "https://example.com/b"];

    let cards = run_pipeline(
        vec![Box::new(FixedSource::new("fixed", &urls))],
        Arc::new(ScriptedExtractor::extractable(&urls)),
        5,
    )
    .await;

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].url, "https://example.com/a");
}

#[tokio::test]
async fn test_unextractable_candidate_is_skipped_not_counted() {
    let urls = distinct_domain_urls(3);
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();

    let cards = run_pipeline(
        vec![Box::new(FixedSource::new("fixed", &url_refs))],
        Arc::new(ScriptedExtractor::extractable(&url_refs).failing(&urls[0])),
        2,
    )
    .await;

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].url, urls[1]);
    assert_eq!(cards[1].url, urls[2]);
}

#[tokio::test]
async fn test_count_bound_holds_for_every_valid_n() {
    let urls = distinct_domain_urls(25);
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();

    for n in [1usize, 2, 5, 10, 19, 20] {
        let cards = run_pipeline(
            vec![Box::new(FixedSource::new("fixed", &url_refs))],
            Arc::new(ScriptedExtractor::extractable(&url_refs)),
            n,
        )
        .await;

        assert_eq!(cards.len(), n, "wrong card count for n={}", n);
    }
}

#[tokio::test]
async fn test_completion_order_does_not_leak_into_output() {
    let urls = distinct_domain_urls(4);
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();

    // The first two candidates are the slowest to extract.
    let extractor = ScriptedExtractor::extractable(&url_refs)
        .delayed(&urls[0], 60)
        .delayed(&urls[1], 40);

    let cards = run_pipeline(
        vec![Box::new(FixedSource::new("fixed", &url_refs))],
        Arc::new(extractor),
        4,
    )
    .await;

    let got: Vec<&str> = cards.iter().map(|c| c.url.as_str()).collect();
    assert_eq!(got, url_refs);
}

#[tokio::test]
async fn test_second_source_backfills_first() {
    let first = ["https://one.example.com/review"];
    let backfill = distinct_domain_urls(12);
    let backfill_refs: Vec<&str> = backfill.iter().map(String::as_str).collect();

    let mut all: Vec<&str> = first.to_vec();
    all.extend(backfill_refs.iter().copied());

    let cards = run_pipeline(
        vec![
            Box::new(FixedSource::new("thin", &first)),
            Box::new(FixedSource::new("deep", &backfill_refs)),
        ],
        Arc::new(ScriptedExtractor::extractable(&all)),
        4,
    )
    .await;

    assert_eq!(cards.len(), 4);
    // The thin source's link keeps its preferred rank.
    assert_eq!(cards[0].url, "https://one.example.com/review");
}

#[tokio::test]
async fn test_every_card_has_nonempty_excerpt_and_logo() {
    let urls = distinct_domain_urls(6);
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();

    let cards = run_pipeline(
        vec![Box::new(FixedSource::new("fixed", &url_refs))],
        Arc::new(ScriptedExtractor::extractable(&url_refs)),
        6,
    )
    .await;

    assert_eq!(cards.len(), 6);
    for card in &cards {
        assert!(!card.excerpt.is_empty());
        assert!(card.excerpt.chars().count() <= 300);
        assert!(card.logo_url.starts_with("https://www.google.com/s2/favicons"));
        assert_eq!(card.score, "");
    }
}

#[tokio::test]
async fn test_empty_discovery_is_a_normal_empty_outcome() {
    let cards = run_pipeline(
        vec![Box::new(FixedSource::new("empty", &[]))],
        Arc::new(ScriptedExtractor::default()),
        5,
    )
    .await;

    assert!(cards.is_empty());
}

#[tokio::test]
async fn test_candidate_links_preserve_display_names() {
    let coordinator = LinkDiscoveryCoordinator::with_sources(
        vec![Box::new(FixedSource::new(
            "fixed",
            &["https://example.com/review"],
        ))],
        3,
    );

    let candidates: Vec<CandidateLink> = coordinator.discover("topic", 1).await;
    assert_eq!(candidates.len(), 1);
    assert_eq!(
        candidates[0].display_name,
        "Review at https://example.com/review"
    );
}
