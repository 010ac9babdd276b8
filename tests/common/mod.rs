//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use eventscout::config::Credentials;
use eventscout::scrapers::NoopRenderer;
use eventscout::{EventConfig, EventSearchClient, EventSource};

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Empty config with all politeness delays removed.
pub fn fast_config() -> EventConfig {
    let mut config = EventConfig::empty();
    config.scraping.request_delay = 0.0;
    config.scraping.timeout = 5;
    config.search.query_delay = 0.0;
    config
}

/// A static source with default selectors.
pub fn source(name: &str, url: String, priority: i32) -> EventSource {
    let mut source = EventSource::new(name, url);
    source.priority = priority;
    source
}

/// Client without a browser.
pub fn client(config: EventConfig, credentials: Credentials) -> EventSearchClient {
    EventSearchClient::with_renderer(Arc::new(config), &credentials, Arc::new(NoopRenderer))
        .unwrap()
}

pub fn google_credentials() -> Credentials {
    Credentials {
        google_api_key: Some("test-key".to_string()),
        google_search_engine_id: Some("test-cx".to_string()),
        perplexity_api_key: None,
    }
}

pub const AEON_PAGE: &str = r#"<html><body>
<article>
  <h2>親子でリトミック</h2>
  <time>1月25日(土)</time>
  <p>0歳から参加できます。</p>
  <a href="/events/rhythm">詳細</a>
</article>
<article>
  <h2>出店者募集のお知らせ</h2>
  <p>マルシェの出店者を募集しています。</p>
</article>
</body></html>"#;

pub const PLAZA_PAGE: &str = r#"<html><body>
<article>
  <h3>冬の星空観察会</h3>
  <span class="date">2/1</span>
  <p>子供向けの解説があります。</p>
  <a href="https://plaza.example.org/stars">詳細</a>
</article>
</body></html>"#;
