//! Headless browser configuration.
//!
//! These types are always available regardless of the `browser` feature flag
//! so config files parse the same in every build.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Browser settings for dynamic sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true).
    /// Set to false for debugging or if headless detection is an issue.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to an existing browser instead of launching one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    /// Explicit Chrome/Chromium executable. Searched for when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,

    /// Additional Chrome arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chrome_args: Vec<String>,
}

pub fn default_headless() -> bool {
    true
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            remote_url: None,
            executable: None,
            chrome_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `BROWSER_URL`: remote DevTools endpoint
    /// - `CHROME_PATH`: browser executable
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("BROWSER_URL") {
            if !url.is_empty() {
                self.remote_url = Some(url);
            }
        }
        if let Ok(path) = std::env::var("CHROME_PATH") {
            if !path.is_empty() {
                self.executable = Some(PathBuf::from(path));
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_defaults() {
        let config: BrowserConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.headless);
        assert!(config.remote_url.is_none());
        assert!(config.chrome_args.is_empty());
    }

    #[test]
    fn test_browser_config_yaml() {
        let yaml = "headless: false\nremote_url: ws://localhost:9222\nchrome_args: [--lang=ja]\n";
        let config: BrowserConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.headless);
        assert_eq!(config.remote_url.as_deref(), Some("ws://localhost:9222"));
        assert_eq!(config.chrome_args, vec!["--lang=ja"]);
    }
}
