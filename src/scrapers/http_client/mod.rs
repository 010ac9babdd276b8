//! HTTP client shared by the scrapers and search clients.

mod decode;
mod response;
mod user_agent;

pub use decode::{charset_from_content_type, decode_html};
pub use response::HttpResponse;
pub use user_agent::{resolve_user_agent, IMPERSONATE_USER_AGENTS};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::debug;

use crate::discovery::DiscoveryError;

/// HTTP client with a fixed user agent and per-request timeout.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with the default user agent.
    pub fn new(timeout: Duration) -> Result<Self, DiscoveryError> {
        Self::with_user_agent(timeout, None)
    }

    /// Create a client with custom user agent configuration.
    /// - None: default desktop user agent
    /// - Some("impersonate"): next real browser user agent in rotation
    /// - Some(custom): custom user agent string
    pub fn with_user_agent(
        timeout: Duration,
        user_agent_config: Option<&str>,
    ) -> Result<Self, DiscoveryError> {
        let user_agent = resolve_user_agent(user_agent_config);
        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make a GET request.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, DiscoveryError> {
        self.send(url, self.client.get(url)).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_query(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<HttpResponse, DiscoveryError> {
        self.send(url, self.client.get(url).query(params)).await
    }

    /// POST a JSON body, optionally with a bearer token.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        body: &B,
    ) -> Result<HttpResponse, DiscoveryError> {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }
        self.send(url, request).await
    }

    async fn send(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<HttpResponse, DiscoveryError> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DiscoveryError::Timeout(self.timeout)
            } else {
                DiscoveryError::Http(e)
            }
        })?;

        let status = response.status();
        debug!(
            "{} {} in {}ms",
            status.as_u16(),
            url,
            start.elapsed().as_millis()
        );

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string(), v.to_string());
            }
        }

        Ok(HttpResponse {
            status,
            headers,
            response,
        })
    }
}
