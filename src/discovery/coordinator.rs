//! Discovery coordination
//!
//! Walks the ordered source chain (LLM proposer → keyed search → keyless
//! instant answer), over-asking each source and stopping as soon as enough
//! distinct candidates exist. A source failing outright contributes nothing
//! and the chain continues; only every source coming up empty produces an
//! empty discovery result, which is a normal outcome for the caller.

use crate::config::Config;
use crate::discovery::instant::InstantAnswerSource;
use crate::discovery::llm::LlmLinkSource;
use crate::discovery::serper::SerperSource;
use crate::discovery::source::{CandidateLink, DiscoverySource};
use crate::discovery::is_http_url;
use crate::url::registrable_domain;
use std::collections::HashSet;
use std::time::Duration;

/// Floor on the over-ask target: even tiny requests query for at least this
/// many candidates, since dedup and extraction attrition are unpredictable.
const MIN_OVER_ASK: usize = 10;

/// Coordinates the ordered chain of discovery sources
pub struct LinkDiscoveryCoordinator {
    sources: Vec<Box<dyn DiscoverySource>>,
    over_ask_factor: u32,
}

impl LinkDiscoveryCoordinator {
    /// Creates the standard three-source chain from configuration
    ///
    /// Source preference order is fixed: LLM proposer, keyed search API,
    /// keyless instant answer.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(12))
            .build()?;

        let sources: Vec<Box<dyn DiscoverySource>> = vec![
            Box::new(LlmLinkSource::new(
                client.clone(),
                config.discovery.llm.clone(),
            )),
            Box::new(SerperSource::new(
                client.clone(),
                config.discovery.serper.clone(),
            )),
            Box::new(InstantAnswerSource::new(
                client,
                config.discovery.instant.clone(),
            )),
        ];

        Ok(Self {
            sources,
            over_ask_factor: config.pipeline.over_ask_factor,
        })
    }

    /// Creates a coordinator over an explicit source chain (tests, variants)
    pub fn with_sources(sources: Vec<Box<dyn DiscoverySource>>, over_ask_factor: u32) -> Self {
        Self {
            sources,
            over_ask_factor,
        }
    }

    /// Number of sources in the chain that are currently available.
    ///
    /// Zero means no request can possibly be served — the one condition the
    /// HTTP layer reports as a server-side misconfiguration.
    pub fn available_sources(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| s.available().is_ok())
            .count()
    }

    /// Discovers candidate links for a topic
    ///
    /// Queries sources in preference order until the running total of
    /// distinct-domain candidates reaches the over-ask target
    /// (`desired × factor`, floor [`MIN_OVER_ASK`]). `source_rank` increases
    /// strictly across the whole chain.
    ///
    /// # Arguments
    ///
    /// * `topic` - The topic to find review links for
    /// * `desired` - How many final cards the caller wants
    ///
    /// # Returns
    ///
    /// Ranked candidates; empty when every source failed or found nothing.
    pub async fn discover(&self, topic: &str, desired: usize) -> Vec<CandidateLink> {
        let target = (desired * self.over_ask_factor as usize).max(MIN_OVER_ASK);

        let mut candidates: Vec<CandidateLink> = Vec::new();
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut seen_domains: HashSet<String> = HashSet::new();
        let mut rank: u32 = 0;

        for source in &self.sources {
            if seen_domains.len() >= target {
                break;
            }

            if let Err(e) = source.available() {
                tracing::debug!("Skipping source {}: {}", source.name(), e);
                continue;
            }

            let links = match source.propose(topic, target).await {
                Ok(links) => links,
                Err(e) => {
                    tracing::warn!("Source {} failed, continuing chain: {}", source.name(), e);
                    continue;
                }
            };

            let before = candidates.len();
            for link in links {
                if !is_http_url(&link.url) || !seen_urls.insert(link.url.clone()) {
                    continue;
                }

                seen_domains.insert(registrable_domain(&link.url));
                candidates.push(CandidateLink {
                    url: link.url,
                    display_name: link.name,
                    source_rank: rank,
                });
                rank += 1;
            }

            tracing::info!(
                "Source {} contributed {} candidates ({} distinct domains so far)",
                source.name(),
                candidates.len() - before,
                seen_domains.len()
            );
        }

        if candidates.is_empty() {
            tracing::info!("Discovery exhausted every source for '{}' with no candidates", topic);
        }

        candidates
    }
}
