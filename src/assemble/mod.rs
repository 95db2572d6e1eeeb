//! Result assembly
//!
//! Turns ranked candidates into the final card list: a bounded worker pool
//! extracts excerpts concurrently while a single shared state arbitrates the
//! domain-dedup set and the accepted count. Output order is always ascending
//! discovery rank — extraction completion order never leaks through.

use crate::discovery::CandidateLink;
use crate::extract::Extractor;
use crate::text::normalize;
use crate::url::{logo_url, registrable_domain};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A finished review card, the terminal artifact of the pipeline
///
/// Immutable once created; `excerpt` is always non-empty. `score` is a
/// reserved output field and is always the empty string.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedCard {
    pub url: String,
    pub name: String,
    pub excerpt: String,
    #[serde(rename = "logo")]
    pub logo_url: String,
    pub score: String,
}

/// An accepted card plus the discovery rank that ordered it.
struct RankedCard {
    rank: u32,
    card: ExtractedCard,
}

/// Shared per-request assembly state. Workers racing to claim a domain or
/// the last output slot are arbitrated here, under one lock.
#[derive(Default)]
struct AssemblyState {
    accepted: HashMap<String, RankedCard>,
}

impl AssemblyState {
    /// True once enough cards exist; workers stop drawing candidates.
    fn is_full(&self, desired: usize) -> bool {
        self.accepted.len() >= desired
    }

    /// True when fetching this candidate can no longer change the outcome.
    fn already_claimed(&self, domain: &str, rank: u32) -> bool {
        self.accepted
            .get(domain)
            .is_some_and(|existing| existing.rank <= rank)
    }

    /// Offers a successfully extracted card. A same-domain card with a lower
    /// rank replaces the earlier claim, so rank order — not completion
    /// order — decides which card a domain keeps.
    fn offer(&mut self, domain: String, entry: RankedCard, desired: usize) {
        match self.accepted.get(&domain) {
            Some(existing) if existing.rank <= entry.rank => {}
            Some(_) => {
                self.accepted.insert(domain, entry);
            }
            None => {
                if self.accepted.len() < desired {
                    self.accepted.insert(domain, entry);
                }
            }
        }
    }
}

/// Assembles ranked candidates into deduplicated, size-bounded card lists
pub struct ResultAssembler {
    extractor: Arc<dyn Extractor>,
    workers: usize,
}

impl ResultAssembler {
    /// Creates an assembler
    ///
    /// # Arguments
    ///
    /// * `extractor` - The excerpt extractor shared by all workers
    /// * `workers` - Concurrency limit for in-flight extractions
    pub fn new(extractor: Arc<dyn Extractor>, workers: u32) -> Self {
        Self {
            extractor,
            workers: workers.max(1) as usize,
        }
    }

    /// Assembles up to `desired` cards from ranked candidates
    ///
    /// Candidates are drawn in ascending `source_rank`. A candidate is
    /// skipped when its registrable domain already produced a card; a
    /// candidate whose extraction yields nothing is skipped silently, and a
    /// later candidate from the same domain may take its place. The returned
    /// list is sorted by `source_rank` and never exceeds `desired`.
    pub async fn assemble(
        &self,
        mut candidates: Vec<CandidateLink>,
        desired: usize,
    ) -> Vec<ExtractedCard> {
        if desired == 0 || candidates.is_empty() {
            return Vec::new();
        }

        candidates.sort_by_key(|c| c.source_rank);
        let total = candidates.len();

        let queue: Arc<Mutex<VecDeque<CandidateLink>>> =
            Arc::new(Mutex::new(candidates.into_iter().collect()));
        let state: Arc<Mutex<AssemblyState>> = Arc::new(Mutex::new(AssemblyState::default()));

        let worker_count = self.workers.min(total);
        let mut handles = Vec::with_capacity(worker_count);

        for _ in 0..worker_count {
            let queue = Arc::clone(&queue);
            let state = Arc::clone(&state);
            let extractor = Arc::clone(&self.extractor);

            handles.push(tokio::spawn(async move {
                loop {
                    let candidate = {
                        if state.lock().unwrap().is_full(desired) {
                            break;
                        }
                        queue.lock().unwrap().pop_front()
                    };

                    let Some(candidate) = candidate else { break };
                    let domain = registrable_domain(&candidate.url);

                    if state
                        .lock()
                        .unwrap()
                        .already_claimed(&domain, candidate.source_rank)
                    {
                        continue;
                    }

                    let Some(excerpt) = extractor.extract(&candidate.url).await else {
                        continue;
                    };
                    if excerpt.is_empty() {
                        continue;
                    }

                    let card = ExtractedCard {
                        logo_url: logo_url(&domain),
                        name: normalize(&candidate.display_name),
                        excerpt,
                        url: candidate.url,
                        score: String::new(),
                    };

                    state.lock().unwrap().offer(
                        domain,
                        RankedCard {
                            rank: candidate.source_rank,
                            card,
                        },
                        desired,
                    );
                }
            }));
        }

        for handle in handles {
            // A panicked worker only costs its share of throughput.
            if let Err(e) = handle.await {
                tracing::error!("Assembly worker failed: {}", e);
            }
        }

        let state = Arc::try_unwrap(state)
            .map(|m| m.into_inner().unwrap_or_default())
            .unwrap_or_default();

        let mut ranked: Vec<RankedCard> = state.accepted.into_values().collect();
        ranked.sort_by_key(|r| r.rank);
        ranked.truncate(desired);

        tracing::debug!("Assembled {} cards from {} candidates", ranked.len(), total);
        ranked.into_iter().map(|r| r.card).collect()
    }
}
