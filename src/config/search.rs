//! Search API configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::seconds_or;

/// Google Custom Search JSON API endpoint.
pub const GOOGLE_CSE_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Perplexity chat completions endpoint.
pub const PERPLEXITY_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";

/// Topics searched on every run, each suffixed with the upcoming weekend's month.
pub const DEFAULT_SEARCH_TARGETS: &[&str] = &[
    "高の原イオン イベント",
    "けいはんなプラザ イベント",
    "木津川市 子育て イベント",
    "奈良市 子供 イベント",
];

/// Keyword search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,
    /// Seconds between successive queries.
    #[serde(default = "default_query_delay")]
    pub query_delay: f64,
    #[serde(default = "default_results_per_query")]
    pub results_per_query: u32,
    /// Value of the `lr` parameter.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

fn default_queries() -> Vec<String> {
    DEFAULT_SEARCH_TARGETS.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn default_query_delay() -> f64 {
    0.5
}

fn default_results_per_query() -> u32 {
    5
}

fn default_language() -> String {
    "lang_ja".to_string()
}

fn default_search_endpoint() -> String {
    GOOGLE_CSE_ENDPOINT.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            queries: default_queries(),
            query_delay: default_query_delay(),
            results_per_query: default_results_per_query(),
            language: default_language(),
            endpoint: default_search_endpoint(),
        }
    }
}

impl SearchConfig {
    pub fn query_delay(&self) -> Duration {
        seconds_or(self.query_delay, default_query_delay())
    }
}

/// Generative (LLM-backed) search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeConfig {
    #[serde(default = "default_generative_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds.
    #[serde(default = "default_generative_timeout")]
    pub timeout: u64,
}

fn default_generative_endpoint() -> String {
    PERPLEXITY_ENDPOINT.to_string()
}

fn default_model() -> String {
    "llama-3.1-sonar-small-128k-online".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_generative_timeout() -> u64 {
    60
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generative_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            timeout: default_generative_timeout(),
        }
    }
}
