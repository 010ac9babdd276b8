//! Keyword search via the Google Custom Search JSON API.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use super::weekend::{month_label, upcoming_saturday};
use crate::config::search::SearchConfig;
use crate::discovery::DiscoveryError;
use crate::models::candidate::SOURCE_GOOGLE;
use crate::models::RawCandidate;
use crate::scrapers::HttpClient;

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

/// Client for one configured search engine.
pub struct GoogleSearchClient {
    http: HttpClient,
    api_key: String,
    engine_id: String,
    config: SearchConfig,
}

impl GoogleSearchClient {
    pub fn new(
        http: HttpClient,
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
        config: SearchConfig,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            config,
        }
    }

    /// Search one topic, narrowed to the month of the upcoming weekend.
    ///
    /// Records carry the topic without the month suffix as their `query`.
    pub async fn search(
        &self,
        topic: &str,
        today: NaiveDate,
    ) -> Result<Vec<RawCandidate>, DiscoveryError> {
        let full_query = format!("{} {}", topic, month_label(upcoming_saturday(today)));
        debug!("Google search: {}", full_query);

        let params = [
            ("key", self.api_key.clone()),
            ("cx", self.engine_id.clone()),
            ("q", full_query),
            ("num", self.config.results_per_query.to_string()),
            ("lr", self.config.language.clone()),
        ];

        let response = self
            .http
            .get_with_query(&self.config.endpoint, &params)
            .await?;

        if !response.is_success() {
            let status = response.status.as_u16();
            warn!("Google Search API error: {}", status);
            return Err(DiscoveryError::UpstreamApi {
                api: "google_search",
                status,
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Parse(e.to_string()))?;

        Ok(body
            .items
            .into_iter()
            .filter(|item| !item.title.trim().is_empty())
            .map(|item| {
                RawCandidate::new(item.title, SOURCE_GOOGLE)
                    .with_snippet(item.snippet)
                    .with_link(item.link)
                    .with_query(topic)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_tolerates_missing_fields() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"items": [{"title": "冬まつり"}]}"#).unwrap();
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].title, "冬まつり");
        assert!(body.items[0].link.is_empty());

        let empty: SearchResponse =
            serde_json::from_str(r#"{"kind": "customsearch#search"}"#).unwrap();
        assert!(empty.items.is_empty());
    }
}
