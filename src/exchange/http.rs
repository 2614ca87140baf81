//! HTTP implementation of the chat backend contract.
//!
//! - `GET /`       liveness, no body contract
//! - `POST /chat`  `{ message, thread_id }` → `{ response }`

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::backend::{ChatBackend, ExchangeError};
use super::types::{ChatRequest, ChatResponse, ProbeOutcome};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Backend reached over plain HTTP with reqwest.
pub struct HttpBackend {
    base_url: String,
    probe_timeout: Duration,
    client: reqwest::Client,
}

impl HttpBackend {
    /// `base_url` is used as given, apart from a trailing `/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Bound each liveness probe so a hung server reads as unreachable.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn probe(&self) -> ProbeOutcome {
        let url = format!("{}/", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => {
                debug!("Probe {} → {}", url, response.status());
                ProbeOutcome::Responded(response.status().as_u16())
            }
            Err(e) => {
                debug!("Probe {} failed: {}", url, e);
                ProbeOutcome::Unreachable
            }
        }
    }

    async fn send(&self, message: &str, thread_id: &str) -> Result<String, ExchangeError> {
        let request = ChatRequest {
            message: message.to_string(),
            thread_id: thread_id.to_string(),
        };

        info!(
            "POST /chat: thread_id={}, message_len={}",
            thread_id,
            message.len()
        );

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        debug!("Chat response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Chat backend error: {} - {}", status, err_body);
            return Err(ExchangeError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Malformed chat response ({} bytes): {}", body.len(), e);
            ExchangeError::Parse(e.to_string())
        })?;

        debug!("Reply received: {} bytes", parsed.response.len());
        Ok(parsed.response)
    }
}
