//! Natural-language weekend search via the Perplexity chat completions API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::weekend::weekend_window;
use crate::config::search::GenerativeConfig;
use crate::discovery::DiscoveryError;
use crate::models::candidate::SOURCE_PERPLEXITY;
use crate::models::RawCandidate;
use crate::scrapers::HttpClient;

/// Title of the single record the generative tier produces.
pub const GENERATIVE_TITLE: &str = "Perplexity検索結果";
/// Query label of the generative record.
pub const GENERATIVE_QUERY: &str = "週末イベント総合検索";

/// Venues the prompt asks the model to focus on.
const FOCUS_VENUES: &[&str] = &[
    "高の原イオン",
    "けいはんなプラザ",
    "ガーデンモール木津川",
    "アスピアやましろ",
    "木津川市の公共イベント",
];

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Build the weekend prompt for the given day.
pub fn build_prompt(today: NaiveDate) -> String {
    let (saturday, sunday) = weekend_window(today);
    let venues: String = FOCUS_VENUES
        .iter()
        .map(|v| format!("- {}\n", v))
        .collect();

    format!(
        "今週末（{}〜{}）に\n\
         木津川市、奈良市、精華町、高の原周辺で開催されるイベントを教えてください。\n\n\
         特に以下の施設・地域のイベントを重点的に:\n{}\n\
         子供（0歳〜4歳）連れで参加できるイベントがあれば優先して教えてください。\n",
        saturday.format("%m月%d日"),
        sunday.format("%m月%d日"),
        venues
    )
}

/// Client for the generative search tier.
pub struct GenerativeSearchClient {
    http: HttpClient,
    api_key: String,
    config: GenerativeConfig,
}

impl GenerativeSearchClient {
    pub fn new(http: HttpClient, api_key: impl Into<String>, config: GenerativeConfig) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            config,
        }
    }

    /// Ask for this weekend's events; yields at most one record.
    pub async fn search(&self, today: NaiveDate) -> Result<Vec<RawCandidate>, DiscoveryError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(today),
            }],
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post_json(&self.config.endpoint, Some(&self.api_key), &request)
            .await?;

        if !response.is_success() {
            let status = response.status.as_u16();
            warn!("Perplexity API error: {}", status);
            return Err(DiscoveryError::UpstreamApi {
                api: "perplexity",
                status,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Parse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| DiscoveryError::Parse("response has no choices".to_string()))?;

        if content.trim().is_empty() {
            debug!("Perplexity returned an empty answer");
            return Ok(Vec::new());
        }

        Ok(vec![RawCandidate::new(GENERATIVE_TITLE, SOURCE_PERPLEXITY)
            .with_snippet(content)
            .with_query(GENERATIVE_QUERY)])
    }
}
