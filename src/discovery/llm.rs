//! LLM link proposer
//!
//! Asks an OpenAI-compatible chat-completions endpoint for editorial review
//! links as strict JSON. Models drift from instructions constantly, so the
//! response goes through a three-step parse fallback:
//!
//! 1. Strict JSON parse of the whole message
//! 2. Parse again after stripping code fences / surrounding prose
//! 3. Raw scan for `http(s)://` substrings, URL doubling as the name
//!
//! Exhausting every step yields an empty list, not an error.

use crate::config::LlmSourceConfig;
use crate::discovery::source::{DiscoverySource, ProposedLink};
use crate::discovery::{is_http_url, scan_raw_urls};
use crate::DiscoveryError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const SOURCE_NAME: &str = "llm";

/// Discovery source backed by an LLM chat-completions endpoint
pub struct LlmLinkSource {
    client: reqwest::Client,
    config: LlmSourceConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinksPayload {
    links: Vec<LinkEntry>,
}

#[derive(Debug, Deserialize)]
struct LinkEntry {
    url: String,
    #[serde(default)]
    name: String,
}

impl LlmLinkSource {
    pub fn new(client: reqwest::Client, config: LlmSourceConfig) -> Self {
        Self { client, config }
    }

    fn prompt(topic: &str, want: usize) -> String {
        format!(
            "List up to {want} editorial review articles about \"{topic}\", each from a \
             different publication. Respond with strict JSON only, in this exact shape: \
             {{\"links\":[{{\"url\":\"https://...\",\"name\":\"Publication or article title\"}}]}}. \
             URLs must be http or https. No markdown, no commentary."
        )
    }

    /// Recovers `{url, name}` pairs from a model response, however mangled.
    ///
    /// Public within the crate so the fallback steps are testable without a
    /// live endpoint.
    pub(crate) fn parse_links(content: &str, want: usize) -> Vec<ProposedLink> {
        let trimmed = content.trim();

        // Step 1: the strict shape we asked for.
        if let Some(links) = Self::parse_payload(trimmed) {
            return Self::take_valid(links, want);
        }

        // Step 2: models love fencing JSON; unwrap and retry.
        if let Some(inner) = Self::strip_wrappers(trimmed) {
            if let Some(links) = Self::parse_payload(&inner) {
                return Self::take_valid(links, want);
            }
        }

        // Step 3: give up on structure, harvest raw URLs.
        let mut links = Vec::new();
        for url in scan_raw_urls(trimmed) {
            links.push(ProposedLink::new(url.clone(), url));
            if links.len() >= want {
                break;
            }
        }
        links
    }

    fn parse_payload(text: &str) -> Option<Vec<LinkEntry>> {
        serde_json::from_str::<LinksPayload>(text)
            .ok()
            .map(|p| p.links)
    }

    /// Peels code fences and surrounding prose down to the outermost JSON
    /// object, when one exists.
    fn strip_wrappers(text: &str) -> Option<String> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end <= start {
            return None;
        }
        Some(text[start..=end].to_string())
    }

    fn take_valid(entries: Vec<LinkEntry>, want: usize) -> Vec<ProposedLink> {
        entries
            .into_iter()
            .filter(|e| is_http_url(&e.url))
            .map(|e| ProposedLink::new(e.url, e.name))
            .take(want)
            .collect()
    }
}

#[async_trait]
impl DiscoverySource for LlmLinkSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn available(&self) -> Result<(), DiscoveryError> {
        if self.config.api_key.is_none() {
            return Err(DiscoveryError::MissingCredential {
                src: SOURCE_NAME,
                credential: "LLM_API_KEY",
            });
        }
        Ok(())
    }

    async fn propose(&self, topic: &str, want: usize) -> Result<Vec<ProposedLink>, DiscoveryError> {
        self.available()?;
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": Self::prompt(topic, want)}],
            "temperature": 0.2,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(api_key)
            .json(&body)
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

        let chat: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| DiscoveryError::Parse {
                    src: SOURCE_NAME,
                    message: e.to_string(),
                })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        let links = Self::parse_links(&content, want);
        tracing::debug!("LLM proposed {} links for '{}'", links.len(), topic);
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict_json() {
        let content = r#"{"links":[{"url":"https://example.com/a","name":"Example"},{"url":"https://other.org/b","name":"Other"}]}"#;
        let links = LlmLinkSource::parse_links(content, 10);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://example.com/a");
        assert_eq!(links[0].name, "Example");
    }

    #[test]
    fn test_parse_fenced_json() {
        let content = "Here you go:\n```json\n{\"links\":[{\"url\":\"https://example.com/a\",\"name\":\"Example\"}]}\n```\nHope that helps!";
        let links = LlmLinkSource::parse_links(content, 10);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/a");
    }

    #[test]
    fn test_parse_raw_url_scan_fallback() {
        let content = "I found two good reviews: https://example.com/review and https://other.org/post — enjoy!";
        let links = LlmLinkSource::parse_links(content, 10);
        assert_eq!(links.len(), 2);
        // Placeholder name is the URL itself.
        assert_eq!(links[0].name, "https://example.com/review");
    }

    #[test]
    fn test_parse_hopeless_content_yields_empty() {
        assert!(LlmLinkSource::parse_links("no links anywhere", 10).is_empty());
        assert!(LlmLinkSource::parse_links("", 10).is_empty());
    }

    #[test]
    fn test_non_http_urls_filtered() {
        let content = r#"{"links":[{"url":"ftp://example.com/a","name":"Bad"},{"url":"https://good.com/b","name":"Good"}]}"#;
        let links = LlmLinkSource::parse_links(content, 10);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://good.com/b");
    }

    #[test]
    fn test_want_bound_respected() {
        let content = r#"{"links":[
            {"url":"https://a.com/1","name":"1"},
            {"url":"https://b.com/2","name":"2"},
            {"url":"https://c.com/3","name":"3"}
        ]}"#;
        assert_eq!(LlmLinkSource::parse_links(content, 2).len(), 2);
    }

    #[test]
    fn test_missing_name_defaults_to_url() {
        let content = r#"{"links":[{"url":"https://example.com/a"}]}"#;
        let links = LlmLinkSource::parse_links(content, 10);
        assert_eq!(links[0].name, "https://example.com/a");
    }

    #[test]
    fn test_unavailable_without_key() {
        let source = LlmLinkSource::new(reqwest::Client::new(), LlmSourceConfig::default());
        assert!(matches!(
            source.available(),
            Err(DiscoveryError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_available_with_key() {
        let config = LlmSourceConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let source = LlmLinkSource::new(reqwest::Client::new(), config);
        assert!(source.available().is_ok());
    }
}
