//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::state::App;
use crate::exchange::{ChatBackend, ExchangeError, ProbeOutcome};

/// A backend that answers every call with a canned result.
pub struct ScriptedBackend {
    reply: Result<String, ExchangeError>,
    probe: ProbeOutcome,
    delay: Option<Duration>,
    sent: Mutex<Vec<(String, String)>>,
    probes: AtomicUsize,
}

impl ScriptedBackend {
    pub fn replying(reply: &str) -> Self {
        Self::with_result(Ok(reply.to_string()))
    }

    pub fn failing(error: ExchangeError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(reply: Result<String, ExchangeError>) -> Self {
        Self {
            reply,
            probe: ProbeOutcome::Responded(200),
            delay: None,
            sent: Mutex::new(Vec::new()),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn with_probe(mut self, probe: ProbeOutcome) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every `(message, thread_id)` pair received so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn probe(&self) -> ProbeOutcome {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.probe
    }

    async fn send(&self, message: &str, thread_id: &str) -> Result<String, ExchangeError> {
        self.sent
            .lock()
            .unwrap()
            .push((message.to_string(), thread_id.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

/// Creates a test App that already believes the backend is reachable.
pub fn connected_app() -> App {
    let mut app = App::new();
    app.connected = true;
    app
}
