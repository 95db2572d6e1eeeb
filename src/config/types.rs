use serde::Deserialize;

/// Main configuration structure for Review-Scout
///
/// Built once at startup (TOML file + environment overlay) and passed by
/// reference into the pipeline; nothing reads the process environment after
/// that point.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// CORS origin allowed to call the API; "*" allows any origin
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

/// Candidate-page fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FetchConfig {
    /// Connect timeout for candidate-page requests (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Total per-request timeout for candidate-page requests (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Retry schedule for transient fetch failures
    #[serde(default)]
    pub retry: BackoffPolicy,
}

/// Explicit retry/backoff schedule, decoupled from the fetch algorithm
///
/// Attempt `i` failing (transport error, non-2xx, or empty body) sleeps
/// `delays_ms[i - 1]` before attempt `i + 1`; a schedule shorter than the
/// attempt count reuses its last entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BackoffPolicy {
    /// Maximum number of attempts per candidate (including the first)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before each retry, in milliseconds
    #[serde(default = "default_retry_delays")]
    pub delays_ms: Vec<u64>,
}

impl BackoffPolicy {
    /// Returns the delay to sleep after `attempt` (1-based) fails, or None
    /// when no further attempt is allowed.
    pub fn delay_after(&self, attempt: u32) -> Option<std::time::Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let index =
            (attempt.saturating_sub(1) as usize).min(self.delays_ms.len().saturating_sub(1));
        let ms = self.delays_ms.get(index).copied().unwrap_or(0);
        Some(std::time::Duration::from_millis(ms))
    }
}

/// Assembly/concurrency configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of extraction workers running concurrently per request
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_extractions: u32,

    /// Over-asking multiplier applied to the requested result count when
    /// querying discovery sources, to absorb dedup and extraction attrition
    #[serde(default = "default_over_ask_factor")]
    pub over_ask_factor: u32,
}

/// Discovery-source chain configuration
///
/// Sources are consulted in the order LLM proposer → keyed search → keyless
/// instant answer. A source with no credential configured is a typed
/// "unavailable" condition, checked before querying.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub llm: LlmSourceConfig,
    #[serde(default)]
    pub serper: SerperSourceConfig,
    #[serde(default)]
    pub instant: InstantSourceConfig,
}

/// LLM link-proposer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LlmSourceConfig {
    /// Base URL of an OpenAI-compatible chat-completions API
    #[serde(default = "default_llm_api_base")]
    pub api_base: String,

    /// Model name sent with each request
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key; populated from LLM_API_KEY / OPENAI_API_KEY, never from TOML
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Keyed web-search API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SerperSourceConfig {
    /// Base URL of the search API
    #[serde(default = "default_serper_api_base")]
    pub api_base: String,

    /// API key; populated from SERPER_API_KEY, never from TOML
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Keyless instant-answer fallback configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct InstantSourceConfig {
    /// Whether the keyless fallback participates in the chain
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the instant-answer endpoint
    #[serde(default = "default_instant_api_base")]
    pub api_base: String,

    /// Text-rendering proxy used to scrape a results page when the instant
    /// answer comes back empty; empty string disables the scrape step
    #[serde(default = "default_proxy_base")]
    pub proxy_base: String,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_allowed_origin() -> String {
    "*".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    20
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delays() -> Vec<u64> {
    vec![500, 1200, 2000]
}

fn default_max_concurrent() -> u32 {
    6
}

fn default_over_ask_factor() -> u32 {
    3
}

fn default_llm_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_serper_api_base() -> String {
    "https://google.serper.dev".to_string()
}

fn default_instant_api_base() -> String {
    "https://api.duckduckgo.com".to_string()
}

fn default_proxy_base() -> String {
    "https://r.jina.ai".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            retry: BackoffPolicy::default(),
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delays_ms: default_retry_delays(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_extractions: default_max_concurrent(),
            over_ask_factor: default_over_ask_factor(),
        }
    }
}

impl Default for LlmSourceConfig {
    fn default() -> Self {
        Self {
            api_base: default_llm_api_base(),
            model: default_llm_model(),
            api_key: None,
        }
    }
}

impl Default for SerperSourceConfig {
    fn default() -> Self {
        Self {
            api_base: default_serper_api_base(),
            api_key: None,
        }
    }
}

impl Default for InstantSourceConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            api_base: default_instant_api_base(),
            proxy_base: default_proxy_base(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_backoff_delay_sequence() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay_after(1), Some(Duration::from_millis(500)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_millis(1200)));
        assert_eq!(policy.delay_after(3), None);
    }

    #[test]
    fn test_backoff_short_schedule_reuses_last_delay() {
        let policy = BackoffPolicy {
            max_attempts: 4,
            delays_ms: vec![100],
        };
        assert_eq!(policy.delay_after(1), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_after(3), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_after(4), None);
    }

    #[test]
    fn test_backoff_single_attempt_never_retries() {
        let policy = BackoffPolicy {
            max_attempts: 1,
            delays_ms: vec![500],
        };
        assert_eq!(policy.delay_after(1), None);
    }

    #[test]
    fn test_default_config_is_complete() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.fetch.retry.max_attempts, 3);
        assert_eq!(config.pipeline.over_ask_factor, 3);
        assert!(config.discovery.instant.enabled);
        assert!(config.discovery.serper.api_key.is_none());
    }
}
