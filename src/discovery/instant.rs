//! Keyless instant-answer discovery source
//!
//! Last link source in the chain: a public instant-answer endpoint needing no
//! credential, filtered hard by the topical allow-list because its results
//! are only loosely scoped. When the instant answer comes back empty, an
//! optional second step scrapes a search-results page through a
//! text-rendering proxy and harvests raw URLs from it.

use crate::config::InstantSourceConfig;
use crate::discovery::relevance::is_relevant;
use crate::discovery::source::{DiscoverySource, ProposedLink};
use crate::discovery::{is_http_url, scan_raw_urls};
use crate::text::normalize;
use crate::DiscoveryError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;

const SOURCE_NAME: &str = "instant-answer";

/// Domains that belong to search engines themselves; URLs harvested from a
/// scraped results page that point back at the engine are navigation, not
/// results.
const ENGINE_DOMAINS: &[&str] = &[
    "google.", "gstatic.", "googleusercontent.", "bing.", "duckduckgo.", "yandex.",
];

/// Keyless discovery source (instant answer + optional SERP scrape)
pub struct InstantAnswerSource {
    client: reqwest::Client,
    config: InstantSourceConfig,
}

#[derive(Debug, Deserialize)]
struct InstantResponse {
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "Heading", default)]
    heading: String,
}

/// One entry of the instant answer; groups nest one level via `Topics`.
#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "FirstURL", default)]
    first_url: String,
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "Topics", default)]
    topics: Vec<RelatedTopic>,
}

impl InstantAnswerSource {
    pub fn new(client: reqwest::Client, config: InstantSourceConfig) -> Self {
        Self { client, config }
    }

    /// Flattens the (possibly grouped) related-topics tree into leaf hits.
    fn flatten(topics: Vec<RelatedTopic>, out: &mut Vec<(String, String)>) {
        for topic in topics {
            if !topic.first_url.is_empty() {
                out.push((topic.first_url, topic.text));
            }
            if !topic.topics.is_empty() {
                Self::flatten(topic.topics, out);
            }
        }
    }

    async fn instant_links(
        &self,
        topic: &str,
        want: usize,
    ) -> Result<Vec<ProposedLink>, DiscoveryError> {
        let query = format!("{} review", topic);
        let response = self
            .client
            .get(format!("{}/", self.config.api_base))
            .query(&[("q", query.as_str()), ("format", "json"), ("no_html", "1")])
            .send()
            .await
            .map_err(|e| DiscoveryError::Transport {
                src: SOURCE_NAME,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::UpstreamStatus {
                src: SOURCE_NAME,
                status: status.as_u16(),
            });
        }

        let answer: InstantResponse =
            response.json().await.map_err(|e| DiscoveryError::Parse {
                src: SOURCE_NAME,
                message: e.to_string(),
            })?;

        let mut hits = Vec::new();
        if !answer.abstract_url.is_empty() {
            hits.push((answer.abstract_url, answer.heading));
        }
        Self::flatten(answer.related_topics, &mut hits);

        Ok(hits
            .into_iter()
            .filter(|(url, text)| is_http_url(url) && is_relevant(url, text))
            .map(|(url, text)| ProposedLink::new(url, normalize(&text)))
            .take(want)
            .collect())
    }

    /// Scrapes a results page through the text-rendering proxy and harvests
    /// raw URLs, allow-list filtered.
    async fn scraped_links(
        &self,
        topic: &str,
        want: usize,
    ) -> Result<Vec<ProposedLink>, DiscoveryError> {
        let query = urlencoding::encode(&format!("{} review", topic)).into_owned();
        let target = format!("https://www.google.com/search?q={}", query);

        let response = self
            .client
            .get(format!("{}/{}", self.config.proxy_base, target))
            .send()
            .await
            .map_err(|e| DiscoveryError::Transport {
                src: SOURCE_NAME,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::UpstreamStatus {
                src: SOURCE_NAME,
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| DiscoveryError::Parse {
            src: SOURCE_NAME,
            message: e.to_string(),
        })?;

        let mut seen = HashSet::new();
        Ok(scan_raw_urls(&text)
            .into_iter()
            .filter(|url| {
                let lowered = url.to_lowercase();
                !ENGINE_DOMAINS.iter().any(|d| lowered.contains(d))
            })
            .filter(|url| is_relevant(url, ""))
            .filter(|url| seen.insert(url.clone()))
            .map(|url| ProposedLink::new(url.clone(), url))
            .take(want)
            .collect())
    }
}

#[async_trait]
impl DiscoverySource for InstantAnswerSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn available(&self) -> Result<(), DiscoveryError> {
        if !self.config.enabled {
            return Err(DiscoveryError::Disabled {
                src: SOURCE_NAME,
            });
        }
        Ok(())
    }

    async fn propose(&self, topic: &str, want: usize) -> Result<Vec<ProposedLink>, DiscoveryError> {
        self.available()?;

        let instant = match self.instant_links(topic, want).await {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("Instant answer failed, trying scrape fallback: {}", e);
                Vec::new()
            }
        };

        if !instant.is_empty() || self.config.proxy_base.is_empty() {
            tracing::debug!(
                "Instant answer yielded {} links for '{}'",
                instant.len(),
                topic
            );
            return Ok(instant);
        }

        let scraped = self.scraped_links(topic, want).await?;
        tracing::debug!("SERP scrape yielded {} links for '{}'", scraped.len(), topic);
        Ok(scraped)
    }
}
