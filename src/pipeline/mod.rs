//! Event search orchestration.
//!
//! [`EventSearchClient`] walks the tiers in order: configured sites, the
//! keyword search API, the generative search API, and finally the reference
//! links when nothing else produced anything. Units run one after another
//! with politeness delays. A failing unit is recorded in the
//! [`SearchReport`] and contributes nothing; the run itself never fails.

pub mod digest;
pub mod filter;
pub mod ranker;
pub mod reference;

pub use digest::{resolve_events, Digest, EventExtractor, EventOrigin, ExtractError};
pub use filter::{dedup, filter_and_dedup, filter_excluded};
pub use ranker::FallbackRanker;
pub use reference::{build_reference_events, format_reference_links, reference_candidates};

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::{Credentials, EventConfig};
use crate::discovery::search::{GenerativeSearchClient, GoogleSearchClient};
use crate::discovery::{DiscoveryError, SearchReport, Tier, UnitOutcome};
use crate::models::{CandidateEvent, RawCandidate};
use crate::scrapers::{resolve_renderer, HttpClient, Renderer, SiteScraper};

/// Default cap for [`EventSearchClient::build_events_from_results`].
pub const DEFAULT_MAX_EVENTS: usize = 10;
/// Default cap for [`EventSearchClient::build_fallback_events`].
pub const DEFAULT_MAX_FALLBACK_EVENTS: usize = 5;

/// Unit label of the generative tier.
const GENERATIVE_UNIT: &str = "weekend";
/// Unit label of the reference tier.
const REFERENCE_UNIT: &str = "reference_links";

/// Entry point for event discovery.
pub struct EventSearchClient {
    config: Arc<EventConfig>,
    scraper: SiteScraper,
    google: Option<GoogleSearchClient>,
    generative: Option<GenerativeSearchClient>,
}

impl EventSearchClient {
    /// Build a client, picking a renderer for dynamic sources.
    pub fn new(
        config: Arc<EventConfig>,
        credentials: &Credentials,
    ) -> Result<Self, DiscoveryError> {
        let renderer = resolve_renderer(&config.browser.clone().with_env_overrides());
        Self::with_renderer(config, credentials, renderer)
    }

    /// Build a client with an explicit renderer.
    pub fn with_renderer(
        config: Arc<EventConfig>,
        credentials: &Credentials,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self, DiscoveryError> {
        let http = HttpClient::with_user_agent(
            config.scraping.timeout(),
            config.scraping.user_agent.as_deref(),
        )?;

        let google = credentials.google().map(|(key, engine_id)| {
            GoogleSearchClient::new(http.clone(), key, engine_id, config.search.clone())
        });

        let generative = match credentials.perplexity() {
            Some(key) => {
                let http = HttpClient::new(Duration::from_secs(config.generative.timeout))?;
                Some(GenerativeSearchClient::new(
                    http,
                    key,
                    config.generative.clone(),
                ))
            }
            None => None,
        };

        let scraper = SiteScraper::new(http, renderer, config.scraping.max_items_per_source);

        Ok(Self {
            config,
            scraper,
            google,
            generative,
        })
    }

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// Run every tier and return the filtered, deduplicated candidates.
    pub async fn search_events(&self) -> Vec<RawCandidate> {
        self.search_events_with_report().await.candidates
    }

    /// Run every tier and report how each unit fared.
    pub async fn search_events_with_report(&self) -> SearchReport {
        let mut report = SearchReport::default();

        self.run_scrape_tier(&mut report).await;
        self.run_structured_tier(&mut report).await;
        self.run_generative_tier(&mut report).await;

        let mut collected: Vec<RawCandidate> = report
            .outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flatten()
            .cloned()
            .collect();

        if collected.is_empty() {
            if self.config.reference_links.is_empty() {
                report.skipped.push(Tier::Reference);
            } else {
                info!("No events found, using reference links");
                let candidates = reference_candidates(&self.config.reference_links);
                collected.extend(candidates.iter().cloned());
                report
                    .outcomes
                    .push(UnitOutcome::new(Tier::Reference, REFERENCE_UNIT, Ok(candidates)));
            }
        }

        report.candidates = filter_and_dedup(collected, &self.config.filtering);
        if report.is_exhausted() {
            warn!("No candidates left after filtering");
        }
        info!(
            "Event search: {} candidates ({} failed units)",
            report.candidates.len(),
            report.failures().count()
        );
        report
    }

    async fn run_scrape_tier(&self, report: &mut SearchReport) {
        let delay = self.config.scraping.request_delay();

        for (i, source) in self.config.sources.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(delay).await;
            }
            let result = self.scraper.scrape(source).await;
            report
                .outcomes
                .push(UnitOutcome::new(Tier::Scrape, source.name.clone(), result));
        }

        info!(
            "Scraping: {} items from {} sources",
            report.tier_count(Tier::Scrape),
            self.config.sources.len()
        );
    }

    async fn run_structured_tier(&self, report: &mut SearchReport) {
        let Some(google) = &self.google else {
            info!("Google search not configured, skipping");
            report.skipped.push(Tier::StructuredSearch);
            return;
        };

        let today = self.config.today();
        let delay = self.config.search.query_delay();

        for (i, topic) in self.config.search.queries.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(delay).await;
            }
            let result = google.search(topic, today).await;
            if let Err(e) = &result {
                warn!("Google search for '{}' failed: {}", topic, e);
            }
            report
                .outcomes
                .push(UnitOutcome::new(Tier::StructuredSearch, topic.clone(), result));
        }

        info!(
            "Google search: {} results",
            report.tier_count(Tier::StructuredSearch)
        );
    }

    async fn run_generative_tier(&self, report: &mut SearchReport) {
        let Some(generative) = &self.generative else {
            report.skipped.push(Tier::GenerativeSearch);
            return;
        };

        let result = generative.search(self.config.today()).await;
        if let Err(e) = &result {
            warn!("Perplexity search failed: {}", e);
        }
        report
            .outcomes
            .push(UnitOutcome::new(Tier::GenerativeSearch, GENERATIVE_UNIT, result));

        info!(
            "Perplexity search: {} results",
            report.tier_count(Tier::GenerativeSearch)
        );
    }

    fn ranker(&self) -> FallbackRanker<'_> {
        FallbackRanker::new(
            &self.config.filtering,
            &self.config.ranking,
            self.config.today(),
        )
    }

    /// Filter, dedup, score and sort candidates into events.
    pub fn build_events_from_results(
        &self,
        candidates: Vec<RawCandidate>,
        max_events: usize,
    ) -> Vec<CandidateEvent> {
        self.ranker().build_events_from_results(candidates, max_events)
    }

    /// Score candidates into events, keeping input order.
    pub fn build_fallback_events(
        &self,
        candidates: &[RawCandidate],
        max_events: usize,
    ) -> Vec<CandidateEvent> {
        self.ranker().build_fallback_events(candidates, max_events)
    }

    /// Placeholder events pointing at every reference link.
    pub fn build_reference_events(&self) -> Vec<CandidateEvent> {
        build_reference_events(&self.config.reference_links)
    }

    /// Notification footer listing the reference links.
    pub fn format_reference_links(&self) -> String {
        format_reference_links(&self.config.reference_links)
    }

    /// Turn candidates into notification events, falling back as needed.
    pub async fn resolve_events(
        &self,
        extractor: Option<&dyn EventExtractor>,
        candidates: Vec<RawCandidate>,
        max_events: usize,
    ) -> Digest {
        resolve_events(extractor, candidates, &self.config, max_events).await
    }
}
