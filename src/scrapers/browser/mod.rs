//! Page rendering for JavaScript-driven event listings.
//!
//! The renderer is picked once when the search client is built. Builds
//! without the `browser` feature, or hosts without Chrome, get
//! [`NoopRenderer`] and dynamic sources fail with
//! [`DiscoveryError::RenderUnavailable`] instead of stopping the run.

#[cfg(feature = "browser")]
mod chromium;

#[cfg(feature = "browser")]
pub use chromium::ChromiumRenderer;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::browser::BrowserConfig;
use crate::discovery::DiscoveryError;

/// Time a renderer gets after its deadline to release pages and browsers.
pub const RELEASE_GRACE: Duration = Duration::from_secs(5);

/// Renders a URL and returns the resulting DOM as HTML.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Whether calls to [`Renderer::render`] can succeed at all.
    fn is_available(&self) -> bool;

    /// Load `url`, wait `settle` for scripts to populate the page, and
    /// return the rendered markup. Connecting, loading and settling are
    /// bounded by `timeout`; releasing resources afterwards by
    /// [`RELEASE_GRACE`].
    async fn render(
        &self,
        url: &str,
        settle: Duration,
        timeout: Duration,
    ) -> Result<String, DiscoveryError>;
}

/// Renderer used when no browser is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn render(
        &self,
        _url: &str,
        _settle: Duration,
        _timeout: Duration,
    ) -> Result<String, DiscoveryError> {
        Err(DiscoveryError::RenderUnavailable)
    }
}

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Common install locations
    "/opt/google/chrome/google-chrome",
];

const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Locate a Chrome/Chromium executable.
///
/// An explicitly configured path wins, then well-known install paths, then
/// `PATH`.
pub fn find_chrome(config: &BrowserConfig) -> Option<PathBuf> {
    if let Some(path) = &config.executable {
        if path.exists() {
            return Some(path.clone());
        }
        warn!("Configured browser {} does not exist", path.display());
    }

    if let Some(path) = CHROME_PATHS.iter().map(Path::new).find(|p| p.exists()) {
        debug!("Found Chrome at: {}", path.display());
        return Some(path.to_path_buf());
    }

    CHROME_COMMANDS.iter().find_map(|cmd| which::which(cmd).ok())
}

/// Pick the renderer for this process.
pub fn resolve_renderer(config: &BrowserConfig) -> Arc<dyn Renderer> {
    #[cfg(feature = "browser")]
    {
        if let Some(url) = &config.remote_url {
            info!("Dynamic sources will render via remote browser at {}", url);
            return Arc::new(ChromiumRenderer::remote(config.clone()));
        }
        if let Some(path) = find_chrome(config) {
            info!("Dynamic sources will render with {}", path.display());
            return Arc::new(ChromiumRenderer::launch(config.clone(), path));
        }
        warn!("Chrome/Chromium not found; dynamic sources will be skipped");
    }

    #[cfg(not(feature = "browser"))]
    {
        let _ = config;
        info!("Built without browser support; dynamic sources will be skipped");
    }

    Arc::new(NoopRenderer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_renderer_reports_unavailable() {
        let renderer = NoopRenderer;
        assert!(!renderer.is_available());
        let result = renderer
            .render("https://example.com", Duration::ZERO, Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(DiscoveryError::RenderUnavailable)));
    }

    #[test]
    fn test_find_chrome_prefers_configured_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = BrowserConfig {
            executable: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(find_chrome(&config), Some(file.path().to_path_buf()));
    }

    #[cfg(feature = "browser")]
    #[test]
    fn test_remote_url_selects_chromium() {
        let config = BrowserConfig {
            remote_url: Some("ws://127.0.0.1:9222".to_string()),
            ..Default::default()
        };
        let renderer = resolve_renderer(&config);
        assert_eq!(renderer.name(), "chromium");
        assert!(renderer.is_available());
    }
}
