//! Keyed web-search discovery source
//!
//! Queries a serper.dev-style search API for `"<topic> review"` and maps the
//! organic results to candidate links. Requires an API key; without one the
//! source reports itself unavailable and the chain moves on.

use crate::config::SerperSourceConfig;
use crate::discovery::is_http_url;
use crate::discovery::source::{DiscoverySource, ProposedLink};
use crate::DiscoveryError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const SOURCE_NAME: &str = "serper";

/// Floor on the result count requested from the API, independent of how few
/// the caller wants; small queries return thin, low-quality organic sets.
const MIN_REQUESTED_RESULTS: usize = 10;

/// Discovery source backed by a keyed search API
pub struct SerperSource {
    client: reqwest::Client,
    config: SerperSourceConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
}

impl SerperSource {
    pub fn new(client: reqwest::Client, config: SerperSourceConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl DiscoverySource for SerperSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn available(&self) -> Result<(), DiscoveryError> {
        if self.config.api_key.is_none() {
            return Err(DiscoveryError::MissingCredential {
                src: SOURCE_NAME,
                credential: "SERPER_API_KEY",
            });
        }
        Ok(())
    }

    async fn propose(&self, topic: &str, want: usize) -> Result<Vec<ProposedLink>, DiscoveryError> {
        self.available()?;
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let payload = json!({
            "q": format!("{} review", topic),
            "num": want.max(MIN_REQUESTED_RESULTS),
        });

        let response = self
            .client
            .post(format!("{}/search", self.config.api_base))
            .header("X-API-KEY", api_key)
            .json(&payload)
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

        let search: SearchResponse = response.json().await.map_err(|e| DiscoveryError::Parse {
            src: SOURCE_NAME,
            message: e.to_string(),
        })?;

        let links: Vec<ProposedLink> = search
            .organic
            .into_iter()
            .filter(|r| is_http_url(r.link.trim()))
            .map(|r| ProposedLink::new(r.link.trim().to_string(), r.title.trim().to_string()))
            .take(want)
            .collect();

        tracing::debug!("Search API returned {} organic links for '{}'", links.len(), topic);
        Ok(links)
    }
}
