use std::fmt;

use async_trait::async_trait;

use super::types::ProbeOutcome;

/// Errors that can occur during a message exchange.
/// Every variant ends the submission; none are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeError {
    /// Transport-level failure (DNS, connection refused, reset).
    Network(String),
    /// Backend answered with a non-success status.
    Api { status: u16, message: String },
    /// Body was not JSON or had no string `response` field.
    Parse(String),
    /// No answer within the configured request timeout.
    Timeout(std::time::Duration),
    /// The caller cancelled the exchange before it settled.
    Cancelled,
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::Network(msg) => write!(f, "network error: {msg}"),
            ExchangeError::Api { status, message } => {
                write!(f, "backend error (HTTP {status}): {message}")
            }
            ExchangeError::Parse(msg) => write!(f, "parse error: {msg}"),
            ExchangeError::Timeout(after) => {
                write!(f, "request timed out after {}s", after.as_secs())
            }
            ExchangeError::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl std::error::Error for ExchangeError {}

/// The two-endpoint contract the chat client consumes.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns a short name for logs.
    fn name(&self) -> &str;

    /// Issues `GET /` and reports whether any HTTP response came back.
    async fn probe(&self) -> ProbeOutcome;

    /// Posts one message on `thread_id` and returns the assistant's reply text.
    async fn send(&self, message: &str, thread_id: &str) -> Result<String, ExchangeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn display_includes_status_code() {
        let err = ExchangeError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "backend error (HTTP 503): unavailable");
    }

    #[test]
    fn display_timeout_in_seconds() {
        let err = ExchangeError::Timeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "request timed out after 60s");
    }
}
