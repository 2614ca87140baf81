//! Exchange client: one message in, one reply (or error) out.
//!
//! Wraps a [`ChatBackend`] with the two guards the raw HTTP call lacks:
//!
//! ```text
//! send(text, thread_id, cancel)
//!   ├── cancel.cancelled()  → Err(Cancelled)
//!   ├── timeout elapsed     → Err(Timeout)
//!   └── backend.send(..)    → Ok(reply) | Err(Network | Api | Parse)
//! ```
//!
//! Preconditions (non-empty text, connected, nothing in flight) are the
//! caller's job; see `core::action::update`.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio_util::sync::CancellationToken;

use super::backend::{ChatBackend, ExchangeError};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ExchangeClient {
    backend: Arc<dyn ChatBackend>,
    timeout: Duration,
}

impl ExchangeClient {
    pub fn new(backend: Arc<dyn ChatBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Runs a single exchange. No retries: any error is final for this submission.
    pub async fn send(
        &self,
        text: &str,
        thread_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ExchangeError> {
        let exchange = tokio::time::timeout(self.timeout, self.backend.send(text, thread_id));

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExchangeError::Cancelled),
            outcome = exchange => match outcome {
                Ok(result) => result,
                Err(_) => Err(ExchangeError::Timeout(self.timeout)),
            },
        };

        match &result {
            Ok(reply) => info!(
                "Exchange via {} settled: thread_id={}, reply_len={}",
                self.backend.name(),
                thread_id,
                reply.len()
            ),
            Err(e) => warn!(
                "Exchange via {} failed: thread_id={}, error={}",
                self.backend.name(),
                thread_id,
                e
            ),
        }
        result
    }
}
