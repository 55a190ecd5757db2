use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::StatusCode;

use super::{ByteStream, ChatBackend, ChatRequest, HealthStatus};

pub const CHAT_PATH: &str = "/api/chat";

/// Talks to the backend over HTTP. The request has no timeout, a
/// stalled response body stalls the exchange.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    api_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches("/").to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Checks that the backend is up and its chat engine is loaded.
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        let url = format!("{}/", self.api_url);
        let status = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach backend at {}", url))?
            .error_for_status()?
            .json::<HealthStatus>()
            .await?;
        Ok(status)
    }
}

// Statuses that never carry a body
fn is_null_body_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 101 | 103 | 204 | 205 | 304)
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, message: &str) -> Result<Option<ByteStream>, Error> {
        let url = format!("{}{}", self.api_url, CHAT_PATH);
        let payload = ChatRequest {
            message: message.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Chat response from {}: {}", url, status);

        // The backend reports its own failures as plain text in the
        // body so the body is still treated as the answer
        if !status.is_success() {
            tracing::warn!("Backend responded with status {}", status);
        }

        if is_null_body_status(status) {
            return Ok(None);
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(Error::from))
            .boxed();

        Ok(Some(stream))
    }
}
