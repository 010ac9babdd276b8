//! Scrape targets and reference links.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::seconds_or;

/// A site to scrape for event listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSource {
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Lower values are scraped first.
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub selectors: Selectors,
    /// Render the page in a headless browser before parsing.
    #[serde(default)]
    pub dynamic: bool,
    /// Seconds to let client-side rendering settle (dynamic sources only).
    #[serde(default = "default_wait_time")]
    pub wait_time: f64,
}

fn default_enabled() -> bool {
    true
}

fn default_priority() -> i32 {
    5
}

pub(crate) fn default_wait_time() -> f64 {
    3.0
}

impl EventSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            enabled: default_enabled(),
            priority: default_priority(),
            selectors: Selectors::default(),
            dynamic: false,
            wait_time: default_wait_time(),
        }
    }

    /// How this source has to be fetched.
    pub fn strategy(&self) -> ScrapeStrategy {
        if self.dynamic {
            ScrapeStrategy::Dynamic {
                wait_time: seconds_or(self.wait_time, default_wait_time()),
            }
        } else {
            ScrapeStrategy::Static
        }
    }
}

/// Fetch strategy for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStrategy {
    /// Plain HTTP GET, parse the response body.
    Static,
    /// Render in a headless browser, wait for scripts, parse the snapshot.
    Dynamic { wait_time: Duration },
}

/// CSS selectors used to pull listings out of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selectors {
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_date")]
    pub date: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_link")]
    pub link: String,
}

fn default_container() -> String {
    "article".to_string()
}

fn default_title() -> String {
    "h2, h3".to_string()
}

fn default_date() -> String {
    ".date, time".to_string()
}

fn default_description() -> String {
    "p".to_string()
}

fn default_link() -> String {
    "a".to_string()
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            container: default_container(),
            title: default_title(),
            date: default_date(),
            description: default_description(),
            link: default_link(),
        }
    }
}

/// Official page that always exists, used as the last-resort tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLink {
    pub name: String,
    pub url: String,
}

impl ReferenceLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
