//! eventscout - regional weekend event discovery.
//!
//! Gathers candidate event listings from configured sites (static or
//! browser-rendered), a keyword search API and a generative search API,
//! then filters and deduplicates them for a household notification.
//! When nothing turns up, configured reference links stand in.

pub mod config;
pub mod discovery;
pub mod models;
pub mod pipeline;
pub mod scrapers;

pub use config::{Credentials, EventConfig};
pub use discovery::{DiscoveryError, SearchReport, Tier, UnitOutcome};
pub use models::{CandidateEvent, EventSource, RawCandidate, ReferenceLink, ScrapeStrategy};
pub use pipeline::{EventExtractor, EventSearchClient};
