//! Candidate records produced by the discovery tiers.

use serde::{Deserialize, Serialize};

/// Source label for candidates scraped from a configured site.
pub const SOURCE_SCRAPE_PREFIX: &str = "scrape:";
/// Source label for structured search results.
pub const SOURCE_GOOGLE: &str = "google_search";
/// Source label for the generative search record.
pub const SOURCE_PERPLEXITY: &str = "perplexity";
/// Source label for synthesized reference-link candidates.
pub const SOURCE_REFERENCE: &str = "reference";

/// Minimally structured listing produced by any discovery tier.
///
/// Every tier emits this same shape so the downstream extractor never has to
/// care where a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Listing title. Never empty for a kept record.
    pub title: String,
    /// Free text accompanying the title (date and description, search snippet, ...).
    #[serde(default)]
    pub snippet: String,
    /// Absolute URL of the listing, or empty when unknown.
    #[serde(default)]
    pub link: String,
    /// Which tier produced the record (`scrape:{name}`, `google_search`, ...).
    #[serde(default)]
    pub source: String,
    /// Source name or search topic that yielded the record.
    #[serde(default)]
    pub query: String,
}

impl RawCandidate {
    /// Create a candidate with the given title and source label.
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: String::new(),
            link: String::new(),
            source: source.into(),
            query: String::new(),
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Text used for keyword matching: `title + " " + snippet`.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.title, self.snippet)
    }

    /// Identity used for deduplication.
    pub fn dedup_key(&self) -> (&str, &str) {
        (self.title.as_str(), self.link.as_str())
    }
}

/// Structured event ready for notification formatting.
///
/// Produced either by the external extractor or by the fallback builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub title: String,
    /// Human-facing date label (`MM/DD`, or a placeholder when unknown).
    pub date: String,
    pub location: String,
    /// Short summary, at most 80 characters.
    pub description: String,
    pub target_audience: String,
    pub url: String,
}
