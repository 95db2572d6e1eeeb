//! Review-Scout: review-card discovery for the open web
//!
//! Given a topic (or a direct URL), this crate produces a small ranked set of
//! review cards — URL, display name, short excerpt, site logo — by querying a
//! fallback chain of link-discovery sources, deduplicating by registrable
//! domain, and extracting main-content excerpts from the surviving candidates.
//! Every upstream is treated as unreliable; partial failure at any stage
//! shrinks the result set instead of failing the request.

pub mod assemble;
pub mod config;
pub mod discovery;
pub mod extract;
pub mod server;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Review-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised by a single discovery source.
///
/// A source failing is never fatal to a request: the coordinator degrades the
/// failing source to an empty contribution and moves on to the next one in
/// the chain. The variants exist so the degradation can be logged with the
/// right cause and so total misconfiguration stays distinguishable from an
/// upstream outage.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The credential this source requires is not configured.
    #[error("source {src} unavailable: missing credential {credential}")]
    MissingCredential {
        src: &'static str,
        credential: &'static str,
    },

    /// The source is switched off in configuration.
    #[error("source {src} is disabled")]
    Disabled { src: &'static str },

    /// Connect/timeout/DNS-level failure talking to the source.
    #[error("transport failure for {src}: {message}")]
    Transport {
        src: &'static str,
        message: String,
    },

    /// The source answered with a non-2xx status.
    #[error("{src} returned HTTP {status}")]
    UpstreamStatus { src: &'static str, status: u16 },

    /// The source answered 2xx but the body could not be understood.
    #[error("failed to parse {src} response: {message}")]
    Parse {
        src: &'static str,
        message: String,
    },
}

/// Result type alias for Review-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use assemble::{ExtractedCard, ResultAssembler};
pub use config::Config;
pub use discovery::{CandidateLink, LinkDiscoveryCoordinator};
pub use extract::ExcerptExtractor;
pub use text::normalize;
pub use url::{logo_url, registrable_domain};
