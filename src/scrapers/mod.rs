//! Site scrapers for configured event listing pages.

pub mod browser;
pub mod extract;
pub mod http_client;

pub use browser::{resolve_renderer, NoopRenderer, Renderer, RELEASE_GRACE};
pub use extract::{extract_candidates, resolve_link};
pub use http_client::HttpClient;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::discovery::DiscoveryError;
use crate::models::{EventSource, RawCandidate, ScrapeStrategy};

/// Scrapes one configured source at a time, statically or through a
/// renderer depending on the source's strategy.
#[derive(Clone)]
pub struct SiteScraper {
    http: HttpClient,
    renderer: Arc<dyn Renderer>,
    max_items: usize,
}

impl SiteScraper {
    pub fn new(http: HttpClient, renderer: Arc<dyn Renderer>, max_items: usize) -> Self {
        Self {
            http,
            renderer,
            max_items,
        }
    }

    /// Scrape a source using the strategy its config selects.
    pub async fn scrape(&self, source: &EventSource) -> Result<Vec<RawCandidate>, DiscoveryError> {
        let result = match source.strategy() {
            ScrapeStrategy::Static => self.scrape_static(source).await,
            ScrapeStrategy::Dynamic { wait_time } => self.scrape_dynamic(source, wait_time).await,
        };

        match &result {
            Ok(candidates) => info!("{}: {} items", source.name, candidates.len()),
            Err(e) => warn!("{}: scrape failed: {}", source.name, e),
        }
        result
    }

    /// Fetch a plain HTML page and extract listings from it.
    pub async fn scrape_static(
        &self,
        source: &EventSource,
    ) -> Result<Vec<RawCandidate>, DiscoveryError> {
        debug!("Fetching {} ({})", source.name, source.url);
        let response = self.http.get(&source.url).await?;

        if !response.is_success() {
            return Err(DiscoveryError::SourceUnavailable {
                url: source.url.clone(),
                status: response.status.as_u16(),
            });
        }

        let timeout = self.http.timeout();
        let html = response.html().await.map_err(|e| {
            if e.is_timeout() {
                DiscoveryError::Timeout(timeout)
            } else {
                DiscoveryError::Http(e)
            }
        })?;

        extract_candidates(&html, source, self.max_items)
    }

    /// Render a JavaScript-driven page and extract listings from the DOM.
    ///
    /// The render is bounded by the request timeout plus the settle time,
    /// whether or not the renderer honors the bound it is given.
    pub async fn scrape_dynamic(
        &self,
        source: &EventSource,
        wait_time: Duration,
    ) -> Result<Vec<RawCandidate>, DiscoveryError> {
        if !self.renderer.is_available() {
            return Err(DiscoveryError::RenderUnavailable);
        }

        debug!(
            "Rendering {} with {} (settle {:?})",
            source.name,
            self.renderer.name(),
            wait_time
        );
        let bound = self.http.timeout().saturating_add(wait_time);
        let render = self.renderer.render(&source.url, wait_time, bound);
        let html = tokio::time::timeout(bound.saturating_add(RELEASE_GRACE), render)
            .await
            .map_err(|_| DiscoveryError::Timeout(bound))??;

        extract_candidates(&html, source, self.max_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Renderer that serves fixed markup.
    struct FixedRenderer(&'static str);

    #[async_trait]
    impl Renderer for FixedRenderer {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn render(
            &self,
            _url: &str,
            _settle: Duration,
            _timeout: Duration,
        ) -> Result<String, DiscoveryError> {
            Ok(self.0.to_string())
        }
    }

    /// Renderer that never finishes in time.
    struct StalledRenderer;

    #[async_trait]
    impl Renderer for StalledRenderer {
        fn name(&self) -> &'static str {
            "stalled"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn render(
            &self,
            _url: &str,
            _settle: Duration,
            _timeout: Duration,
        ) -> Result<String, DiscoveryError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    fn dynamic_source() -> EventSource {
        let mut source = EventSource::new("ガーデンモール木津川", "https://example.com/events");
        source.dynamic = true;
        source.wait_time = 0.0;
        source
    }

    fn http() -> HttpClient {
        HttpClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_dynamic_source_without_renderer_is_unavailable() {
        let scraper = SiteScraper::new(http(), Arc::new(NoopRenderer), 10);
        let result = scraper.scrape(&dynamic_source()).await;
        assert!(matches!(result, Err(DiscoveryError::RenderUnavailable)));
    }

    #[tokio::test]
    async fn test_dynamic_source_uses_rendered_dom() {
        let renderer = FixedRenderer("<article><h2>ハロウィン工作</h2><p>10/31</p></article>");
        let scraper = SiteScraper::new(http(), Arc::new(renderer), 10);
        let candidates = scraper.scrape(&dynamic_source()).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "ハロウィン工作");
        assert_eq!(candidates[0].source, "scrape:ガーデンモール木津川");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_render_times_out() {
        let scraper = SiteScraper::new(http(), Arc::new(StalledRenderer), 10);
        let mut source = dynamic_source();
        source.wait_time = 2.0;

        let result = scraper.scrape(&source).await;

        match result {
            Err(DiscoveryError::Timeout(bound)) => assert_eq!(bound, Duration::from_secs(7)),
            other => panic!("expected timeout, got {:?}", other.map(|c| c.len())),
        }
    }
}
