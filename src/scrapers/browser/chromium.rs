//! Chromium renderer over the DevTools protocol.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig as CdpConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use super::{Renderer, RELEASE_GRACE};
use crate::config::browser::BrowserConfig;
use crate::discovery::DiscoveryError;

/// Stand-in deadline for timeouts too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Renders pages in a fresh Chromium session per call.
///
/// A launched browser is shut down after every page. A remote browser is
/// left running and only the page is closed.
pub struct ChromiumRenderer {
    config: BrowserConfig,
    executable: Option<PathBuf>,
}

impl ChromiumRenderer {
    /// Launch a local browser from `executable` for each render.
    pub fn launch(config: BrowserConfig, executable: PathBuf) -> Self {
        Self {
            config,
            executable: Some(executable),
        }
    }

    /// Connect to `config.remote_url` for each render.
    pub fn remote(config: BrowserConfig) -> Self {
        Self {
            config,
            executable: None,
        }
    }

    async fn open(&self, timeout: Duration) -> Result<(Browser, JoinHandle<()>), DiscoveryError> {
        let (browser, mut handler) = match &self.config.remote_url {
            Some(url) => {
                let ws_url = websocket_url(url, timeout).await?;
                debug!("Connecting to WebSocket: {}", ws_url);
                Browser::connect(ws_url)
                    .await
                    .map_err(|e| DiscoveryError::Render(format!("connect failed: {}", e)))?
            }
            None => {
                let config = self.launch_config()?;
                Browser::launch(config)
                    .await
                    .map_err(|e| DiscoveryError::Render(format!("launch failed: {}", e)))?
            }
        };

        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok((browser, handler_task))
    }

    /// Close the page, then the browser if this renderer launched it.
    async fn release(
        &self,
        browser: &mut Browser,
        page: Option<Page>,
        handler_task: JoinHandle<()>,
    ) {
        let close = async {
            if let Some(page) = page {
                let _ = page.close().await;
            }
            if self.config.remote_url.is_none() {
                let _ = browser.close().await;
                let _ = browser.wait().await;
            }
        };
        if tokio::time::timeout(RELEASE_GRACE, close).await.is_err() {
            warn!("Browser cleanup did not finish within {:?}", RELEASE_GRACE);
        }
        handler_task.abort();
    }

    fn launch_config(&self) -> Result<CdpConfig, DiscoveryError> {
        let executable = self
            .executable
            .clone()
            .ok_or(DiscoveryError::RenderUnavailable)?;

        let mut builder = CdpConfig::builder().chrome_executable(executable);

        // with_head means NOT headless
        if !self.config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--window-size=1920,1080");

        for arg in &self.config.chrome_args {
            builder = builder.arg(arg);
        }

        builder
            .build()
            .map_err(|e| DiscoveryError::Render(format!("invalid browser config: {}", e)))
    }
}

/// Resolve a DevTools WebSocket URL from the `/json/version` endpoint.
async fn websocket_url(remote_url: &str, timeout: Duration) -> Result<String, DiscoveryError> {
    let http_url = remote_url
        .replace("ws://", "http://")
        .replace("wss://", "https://");
    let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

    let resp: serde_json::Value = reqwest::Client::builder()
        .timeout(timeout)
        .build()?
        .get(&version_url)
        .send()
        .await?
        .json()
        .await?;

    resp.get("webSocketDebuggerUrl")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| DiscoveryError::Render("no webSocketDebuggerUrl in response".to_string()))
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    fn name(&self) -> &'static str {
        "chromium"
    }

    fn is_available(&self) -> bool {
        self.executable.is_some() || self.config.remote_url.is_some()
    }

    async fn render(
        &self,
        url: &str,
        settle: Duration,
        timeout: Duration,
    ) -> Result<String, DiscoveryError> {
        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);

        let (mut browser, handler_task) = match timeout_at(deadline, self.open(timeout)).await {
            Ok(opened) => opened?,
            Err(_) => return Err(DiscoveryError::Timeout(timeout)),
        };
        info!("Rendering {}", url);

        // Blank page first so the handle outlives a timed-out navigation.
        let page = match timeout_at(deadline, browser.new_page("about:blank")).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                self.release(&mut browser, None, handler_task).await;
                return Err(DiscoveryError::Render(e.to_string()));
            }
            Err(_) => {
                self.release(&mut browser, None, handler_task).await;
                return Err(DiscoveryError::Timeout(timeout));
            }
        };

        let load = async {
            page.goto(url)
                .await
                .map_err(|e| DiscoveryError::Render(e.to_string()))?;
            tokio::time::sleep(settle).await;
            page.content()
                .await
                .map_err(|e| DiscoveryError::Render(e.to_string()))
        };
        let rendered = match timeout_at(deadline, load).await {
            Ok(result) => result,
            Err(_) => Err(DiscoveryError::Timeout(timeout)),
        };

        self.release(&mut browser, Some(page), handler_task).await;
        rendered
    }
}
