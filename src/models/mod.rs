//! Data models for event discovery.

pub mod candidate;
pub mod source;

pub use candidate::{CandidateEvent, RawCandidate};
pub use source::{EventSource, ReferenceLink, ScrapeStrategy, Selectors};
