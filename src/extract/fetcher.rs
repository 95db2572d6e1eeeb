//! HTTP fetching for candidate pages
//!
//! This module handles the network half of excerpt extraction:
//! - Building a browser-like HTTP client with sane timeouts
//! - GET requests with redirect following
//! - Retry with an explicit backoff schedule for transient failures
//! - Error classification (transport vs status vs empty body)
//!
//! Every failure mode here is non-fatal to a request: after the retry
//! schedule is exhausted the page simply yields no body, and the caller
//! skips the candidate.

use crate::config::{BackoffPolicy, FetchConfig};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Browser-like user agent sent with every candidate-page request. Review
/// sites routinely serve bot UAs a consent wall or an empty shell.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0 Safari/537.36";

/// Why a single fetch attempt failed
#[derive(Debug)]
pub enum FetchFailure {
    /// Connect/timeout/DNS-level error
    Transport(String),

    /// Non-2xx response status
    Status(u16),

    /// 2xx response whose body was empty or unreadable
    EmptyBody,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Transport(msg) => write!(f, "transport error: {}", msg),
            FetchFailure::Status(code) => write!(f, "HTTP {}", code),
            FetchFailure::EmptyBody => write!(f, "empty body"),
        }
    }
}

/// Builds the HTTP client used for candidate-page fetches
///
/// # Arguments
///
/// * `config` - Fetch configuration (timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs a single GET attempt against a candidate URL
///
/// # Returns
///
/// * `Ok(String)` - Non-empty response body
/// * `Err(FetchFailure)` - Classified failure for retry decisions and logging
pub async fn fetch_once(client: &Client, url: &str) -> Result<String, FetchFailure> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchFailure::Transport("request timeout".to_string())
        } else if e.is_connect() {
            FetchFailure::Transport("connection failed".to_string())
        } else {
            FetchFailure::Transport(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::Status(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchFailure::Transport(e.to_string()))?;

    if body.trim().is_empty() {
        return Err(FetchFailure::EmptyBody);
    }

    Ok(body)
}

/// Fetches a candidate page, retrying per the backoff schedule
///
/// Transport errors, non-2xx statuses, and empty bodies are all retried the
/// same way; after the schedule is exhausted the candidate yields `None`.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `retry` - Backoff schedule (attempt count + delay table)
pub async fn fetch_html(client: &Client, url: &str, retry: &BackoffPolicy) -> Option<String> {
    let mut attempt = 1;

    loop {
        match fetch_once(client, url).await {
            Ok(body) => {
                tracing::trace!("Fetched {} ({} bytes, attempt {})", url, body.len(), attempt);
                return Some(body);
            }
            Err(failure) => match retry.delay_after(attempt) {
                Some(delay) => {
                    tracing::debug!(
                        "Fetch attempt {} for {} failed ({}), retrying in {:?}",
                        attempt,
                        url,
                        failure,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    tracing::debug!(
                        "Giving up on {} after {} attempts ({})",
                        url,
                        attempt,
                        failure
                    );
                    return None;
                }
            },
        }
    }
}
