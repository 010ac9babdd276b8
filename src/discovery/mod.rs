//! Discovery tiers and their per-unit outcomes.
//!
//! A run walks the tiers in a fixed order. Each unit of work inside a tier
//! (one site, one search query, the generative query) yields a
//! [`UnitOutcome`]; failures are recorded there and contribute nothing
//! instead of aborting the run.

pub mod search;

use std::fmt;

use crate::models::RawCandidate;

/// Error type for discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Source unavailable: HTTP {status} from {url}")]
    SourceUnavailable { url: String, status: u16 },

    #[error("Upstream API error: {api} returned HTTP {status}")]
    UpstreamApi { api: &'static str, status: u16 },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Browser rendering is not available in this build or environment")]
    RenderUnavailable,

    #[error("Browser rendering failed: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Position in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Configured site scraping (static and dynamic).
    Scrape,
    /// Keyword search API.
    StructuredSearch,
    /// LLM-backed natural language search.
    GenerativeSearch,
    /// Static official links.
    Reference,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Scrape => "scrape",
            Tier::StructuredSearch => "structured_search",
            Tier::GenerativeSearch => "generative_search",
            Tier::Reference => "reference",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result of one isolated unit of work.
#[derive(Debug)]
pub struct UnitOutcome {
    pub tier: Tier,
    /// Source name, search topic, or fixed label for single-shot tiers.
    pub unit: String,
    pub result: Result<Vec<RawCandidate>, DiscoveryError>,
}

impl UnitOutcome {
    pub fn new(
        tier: Tier,
        unit: impl Into<String>,
        result: Result<Vec<RawCandidate>, DiscoveryError>,
    ) -> Self {
        Self {
            tier,
            unit: unit.into(),
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Number of candidates this unit contributed.
    pub fn count(&self) -> usize {
        self.result.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn error(&self) -> Option<&DiscoveryError> {
        self.result.as_ref().err()
    }
}

/// Everything a run produced: the final candidates plus how each unit fared.
#[derive(Debug, Default)]
pub struct SearchReport {
    /// Filtered, deduplicated candidates in tier order.
    pub candidates: Vec<RawCandidate>,
    pub outcomes: Vec<UnitOutcome>,
    /// Tiers that were not attempted because they are not configured.
    pub skipped: Vec<Tier>,
}

impl SearchReport {
    /// Outcomes belonging to one tier.
    pub fn tier_outcomes(&self, tier: Tier) -> impl Iterator<Item = &UnitOutcome> {
        self.outcomes.iter().filter(move |o| o.tier == tier)
    }

    /// Raw (pre-filter) candidate count contributed by a tier.
    pub fn tier_count(&self, tier: Tier) -> usize {
        self.tier_outcomes(tier).map(UnitOutcome::count).sum()
    }

    /// Units that failed, across all tiers.
    pub fn failures(&self) -> impl Iterator<Item = &UnitOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// True when the run ended with no candidates, either because nothing
    /// was collected or because the exclusion filter removed everything.
    pub fn is_exhausted(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_per_tier() {
        let report = SearchReport {
            candidates: Vec::new(),
            outcomes: vec![
                UnitOutcome::new(
                    Tier::Scrape,
                    "site-a",
                    Ok(vec![RawCandidate::new("a", "scrape:site-a")]),
                ),
                UnitOutcome::new(Tier::Scrape, "site-b", Err(DiscoveryError::RenderUnavailable)),
                UnitOutcome::new(
                    Tier::StructuredSearch,
                    "奈良市 子供 イベント",
                    Ok(vec![
                        RawCandidate::new("b", "google_search"),
                        RawCandidate::new("c", "google_search"),
                    ]),
                ),
            ],
            skipped: vec![Tier::GenerativeSearch],
        };

        assert_eq!(report.tier_count(Tier::Scrape), 1);
        assert_eq!(report.tier_count(Tier::StructuredSearch), 2);
        assert_eq!(report.failures().count(), 1);
        assert!(matches!(
            report.failures().next().and_then(UnitOutcome::error),
            Some(DiscoveryError::RenderUnavailable)
        ));
        assert!(report.is_exhausted());
    }
}
