//! Turning candidates into events for a notification.
//!
//! Structured extraction belongs to an external [`EventExtractor`]. When it
//! is missing, fails, or finds nothing, the heuristic ranker takes over, and
//! when that is empty too the reference links stand in.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::ranker::FallbackRanker;
use super::reference::{build_reference_events, format_reference_links};
use crate::config::EventConfig;
use crate::models::{CandidateEvent, RawCandidate};

/// Error reported by an extractor implementation.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Extractor unavailable: {0}")]
    Unavailable(String),

    #[error("Extraction failed: {0}")]
    Failed(String),
}

/// Converts raw candidates into structured events.
#[async_trait]
pub trait EventExtractor: Send + Sync {
    async fn extract(
        &self,
        candidates: &[RawCandidate],
    ) -> Result<Vec<CandidateEvent>, ExtractError>;
}

/// Which step of the chain produced a digest's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    Extractor,
    Heuristic,
    Reference,
    /// Nothing at all; no candidates and no reference links.
    Empty,
}

impl EventOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventOrigin::Extractor => "extractor",
            EventOrigin::Heuristic => "heuristic",
            EventOrigin::Reference => "reference",
            EventOrigin::Empty => "empty",
        }
    }
}

/// Events for one notification plus the reference footer.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub events: Vec<CandidateEvent>,
    pub origin: EventOrigin,
    /// Reference link block to append to the message; may be empty.
    pub footer: String,
}

/// Run the extractor, heuristic, reference chain.
pub async fn resolve_events(
    extractor: Option<&dyn EventExtractor>,
    candidates: Vec<RawCandidate>,
    config: &EventConfig,
    max_events: usize,
) -> Digest {
    let footer = format_reference_links(&config.reference_links);

    if let Some(extractor) = extractor {
        match extractor.extract(&candidates).await {
            Ok(events) if !events.is_empty() => {
                info!("Extractor produced {} events", events.len());
                return Digest {
                    events: events.into_iter().take(max_events).collect(),
                    origin: EventOrigin::Extractor,
                    footer,
                };
            }
            Ok(_) => info!("Extractor found no events, using heuristic ranking"),
            Err(e) => warn!("Extractor failed, using heuristic ranking: {}", e),
        }
    }

    let ranker = FallbackRanker::new(&config.filtering, &config.ranking, config.today());
    let events = ranker.build_events_from_results(candidates, max_events);
    if !events.is_empty() {
        return Digest {
            events,
            origin: EventOrigin::Heuristic,
            footer,
        };
    }

    let events = build_reference_events(&config.reference_links);
    let origin = if events.is_empty() {
        warn!("No events and no reference links configured");
        EventOrigin::Empty
    } else {
        EventOrigin::Reference
    };

    Digest {
        events,
        origin,
        footer,
    }
}
