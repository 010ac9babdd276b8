//! Search API clients for the structured and generative tiers.

pub mod google;
pub mod perplexity;
pub mod weekend;

pub use google::GoogleSearchClient;
pub use perplexity::{GenerativeSearchClient, GENERATIVE_QUERY, GENERATIVE_TITLE};
pub use weekend::{month_label, upcoming_saturday, weekend_window};
