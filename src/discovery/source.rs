use crate::DiscoveryError;
use async_trait::async_trait;

/// A link proposed by a discovery source, before ranking
///
/// `name` is the source's display text for the link; sources that cannot
/// supply one fall back to the URL itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedLink {
    pub url: String,
    pub name: String,
}

impl ProposedLink {
    /// Creates a proposed link, substituting the URL for a blank name.
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        let url = url.into();
        let name = name.into();
        let name = if name.trim().is_empty() {
            url.clone()
        } else {
            name
        };
        Self { url, name }
    }
}

/// A candidate review link with its discovery rank
///
/// `source_rank` is a strictly increasing counter assigned across the whole
/// discovery chain (lower = discovered earlier by a more-preferred source).
/// Final output order is ascending rank, never extraction-completion order.
#[derive(Debug, Clone)]
pub struct CandidateLink {
    pub url: String,
    pub display_name: String,
    pub source_rank: u32,
}

/// One upstream source of candidate review links
///
/// Sources are consulted in preference order by the coordinator, and only
/// while earlier sources have not produced enough distinct candidates.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Short stable name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Checks whether this source can be queried at all.
    ///
    /// A missing credential or a disabled flag surfaces here as a typed
    /// condition, before any network traffic happens.
    fn available(&self) -> Result<(), DiscoveryError>;

    /// Proposes up to `want` links for the topic.
    ///
    /// Sources may return fewer (or zero) links; that is a normal outcome.
    /// Errors describe total source failure and are degraded to an empty
    /// contribution by the coordinator.
    async fn propose(&self, topic: &str, want: usize) -> Result<Vec<ProposedLink>, DiscoveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_falls_back_to_url() {
        let link = ProposedLink::new("https://example.com/a", "   ");
        assert_eq!(link.name, "https://example.com/a");
    }

    #[test]
    fn test_explicit_name_kept() {
        let link = ProposedLink::new("https://example.com/a", "Example Review");
        assert_eq!(link.name, "Example Review");
    }
}
