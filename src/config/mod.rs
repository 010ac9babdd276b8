//! Configuration for the event discovery pipeline.
//!
//! Site sources, reference links and tuning knobs live in a YAML file.
//! API credentials come from the environment so the file can be committed.

pub mod browser;
pub mod search;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use browser::BrowserConfig;
pub use search::{GenerativeConfig, SearchConfig};

use crate::models::source::default_wait_time;
use crate::models::{EventSource, ReferenceLink};

/// Config path used when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/event_sources.yml";

/// Default user agent for site scraping.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Errors from strict config parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Immutable snapshot of everything the pipeline is configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Enabled sources, sorted ascending by priority.
    #[serde(default)]
    pub sources: Vec<EventSource>,
    #[serde(default, alias = "references")]
    pub reference_links: Vec<ReferenceLink>,
    #[serde(default)]
    pub scraping: ScrapingConfig,
    #[serde(default)]
    pub filtering: FilteringConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub generative: GenerativeConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Offset of the local timezone used for weekend and date calculations.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

fn default_utc_offset_hours() -> i32 {
    9
}

impl EventConfig {
    /// Load config from a file, falling back to defaults on any problem.
    ///
    /// A missing or malformed file is logged and treated as an empty config.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!("Config file not found: {}", path.display());
            return Self::empty();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!(
                    "Loaded {} event sources and {} reference links from {}",
                    config.sources.len(),
                    config.reference_links.len(),
                    path.display()
                );
                config
            }
            Err(e) => {
                warn!("Failed to load config: {}", e);
                Self::empty()
            }
        }
    }

    /// Read and strictly parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Strictly parse YAML config text.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::empty());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config.normalized())
    }

    /// Defaults with no sources and no reference links.
    pub fn empty() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            ..Default::default()
        }
    }

    /// Drop disabled sources, order the rest by priority and reset values
    /// that cannot be used to their defaults.
    fn normalized(mut self) -> Self {
        self.sources.retain(|s| s.enabled);
        // Stable, so equal priorities keep file order.
        self.sources.sort_by_key(|s| s.priority);

        if !is_valid_seconds(self.scraping.request_delay) {
            warn!(
                "scraping.request_delay {} is out of range, using {}s",
                self.scraping.request_delay,
                default_request_delay()
            );
            self.scraping.request_delay = default_request_delay();
        }
        if !is_valid_seconds(self.search.query_delay) {
            warn!(
                "search.query_delay {} is out of range, using {}s",
                self.search.query_delay,
                search::default_query_delay()
            );
            self.search.query_delay = search::default_query_delay();
        }
        for source in &mut self.sources {
            if !is_valid_seconds(source.wait_time) {
                warn!(
                    "{}: wait_time {} is out of range, using {}s",
                    source.name,
                    source.wait_time,
                    default_wait_time()
                );
                source.wait_time = default_wait_time();
            }
        }
        if fixed_offset(self.utc_offset_hours).is_none() {
            warn!("utc_offset_hours {} is out of range, using UTC", self.utc_offset_hours);
            self.utc_offset_hours = 0;
        }

        self
    }

    /// Local timezone as a fixed offset (UTC if the configured offset is out of range).
    pub fn timezone(&self) -> FixedOffset {
        fixed_offset(self.utc_offset_hours).unwrap_or_else(|| Utc.fix())
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone()).date_naive()
    }
}

fn fixed_offset(hours: i32) -> Option<FixedOffset> {
    hours.checked_mul(3600).and_then(FixedOffset::east_opt)
}

/// Seconds from config as a `Duration`.
///
/// Negative and NaN mean zero. Values a `Duration` cannot hold give `fallback`.
pub(crate) fn seconds_or(value: f64, fallback: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0))
        .unwrap_or_else(|_| Duration::from_secs_f64(fallback))
}

fn is_valid_seconds(value: f64) -> bool {
    Duration::try_from_secs_f64(value.max(0.0)).is_ok()
}

/// Resolve the config path: explicit argument, then `EVENTSCOUT_CONFIG`, then the default.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var("EVENTSCOUT_CONFIG") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Politeness and resilience settings for site scraping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapingConfig {
    /// Seconds to wait between sources.
    #[serde(default = "default_request_delay")]
    pub request_delay: f64,
    /// Per-request timeout in seconds (per render cycle for dynamic sources).
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent configuration.
    /// - None: default desktop browser user agent
    /// - "impersonate": rotate through real browser user agents
    /// - Any other string: used verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Maximum number of container elements parsed per source.
    #[serde(default = "default_max_items_per_source")]
    pub max_items_per_source: usize,
}

fn default_request_delay() -> f64 {
    1.0
}

fn default_timeout() -> u64 {
    30
}

fn default_max_items_per_source() -> usize {
    10
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            request_delay: default_request_delay(),
            timeout: default_timeout(),
            user_agent: None,
            max_items_per_source: default_max_items_per_source(),
        }
    }
}

impl ScrapingConfig {
    pub fn request_delay(&self) -> Duration {
        seconds_or(self.request_delay, default_request_delay())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Keyword lists driving both the exclusion filter and fallback scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteringConfig {
    #[serde(default)]
    pub family_keywords: Vec<String>,
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
}

impl FilteringConfig {
    /// True if `text` contains any exclude keyword (case-sensitive).
    pub fn is_excluded(&self, text: &str) -> bool {
        contains_any(text, &self.exclude_keywords)
    }

    /// True if `text` contains any family keyword (case-sensitive).
    pub fn is_family(&self, text: &str) -> bool {
        contains_any(text, &self.family_keywords)
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| !k.is_empty() && text.contains(k.as_str()))
}

/// Score adjustments used by the fallback ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_family_bonus")]
    pub family_bonus: i32,
    #[serde(default = "default_date_bonus")]
    pub date_bonus: i32,
    #[serde(default = "default_exclude_penalty")]
    pub exclude_penalty: i32,
}

fn default_family_bonus() -> i32 {
    2
}

fn default_date_bonus() -> i32 {
    1
}

fn default_exclude_penalty() -> i32 {
    -5
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            family_bonus: default_family_bonus(),
            date_bonus: default_date_bonus(),
            exclude_penalty: default_exclude_penalty(),
        }
    }
}

/// API credentials, read from the environment.
///
/// Empty values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub google_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    pub perplexity_api_key: Option<String>,
}

impl Credentials {
    /// Read credentials from environment variables.
    ///
    /// Supported env vars:
    /// - `GOOGLE_SEARCH_API_KEY`
    /// - `GOOGLE_SEARCH_ENGINE_ID`
    /// - `PERPLEXITY_API_KEY`
    pub fn from_env() -> Self {
        Self {
            google_api_key: non_empty_env("GOOGLE_SEARCH_API_KEY"),
            google_search_engine_id: non_empty_env("GOOGLE_SEARCH_ENGINE_ID"),
            perplexity_api_key: non_empty_env("PERPLEXITY_API_KEY"),
        }
    }

    /// Key and engine id, if both are configured.
    pub fn google(&self) -> Option<(&str, &str)> {
        let key = self.google_api_key.as_deref().filter(|k| !k.is_empty())?;
        let cx = self
            .google_search_engine_id
            .as_deref()
            .filter(|c| !c.is_empty())?;
        Some((key, cx))
    }

    pub fn perplexity(&self) -> Option<&str> {
        self.perplexity_api_key.as_deref().filter(|k| !k.is_empty())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
