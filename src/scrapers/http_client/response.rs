//! HTTP response wrapper.

use std::collections::HashMap;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::decode::{charset_from_content_type, decode_html};

/// HTTP response wrapper.
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    pub(crate) response: Response,
}

impl HttpResponse {
    /// Check if the response is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(|s| s.as_str())
    }

    /// Get response body as bytes.
    pub async fn bytes(self) -> Result<Vec<u8>, reqwest::Error> {
        self.response.bytes().await.map(|b| b.to_vec())
    }

    /// Get the body as HTML text, decoding legacy encodings as needed.
    pub async fn html(self) -> Result<String, reqwest::Error> {
        let charset = self
            .content_type()
            .and_then(charset_from_content_type)
            .map(str::to_string);
        let bytes = self.bytes().await?;
        Ok(decode_html(&bytes, charset.as_deref()))
    }

    /// Deserialize a JSON body.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, reqwest::Error> {
        self.response.json().await
    }
}
