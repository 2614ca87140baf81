//! Connection monitor.
//!
//! Probes `GET /` once at startup and then on a fixed period, reporting a
//! plain connected/disconnected boolean after every probe. There is no
//! hysteresis or backoff: one failed probe means disconnected.
//!
//! ```text
//! start ──► probe ──► report(bool) ──► sleep(interval) ──┐
//!             ▲                                          │
//!             └──────────────────────────────────────────┘
//!   cancel token fired / report() returns false ──► task exits
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::backend::ChatBackend;
use crate::ProbePolicy;

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(30);

pub struct ConnectionMonitor {
    backend: Arc<dyn ChatBackend>,
    policy: ProbePolicy,
    /// `None` probes exactly once.
    interval: Option<Duration>,
}

impl ConnectionMonitor {
    pub fn new(backend: Arc<dyn ChatBackend>, policy: ProbePolicy, interval: Option<Duration>) -> Self {
        Self {
            backend,
            policy,
            interval,
        }
    }

    /// Runs one probe and applies the policy to its outcome.
    pub async fn check(&self) -> bool {
        let outcome = self.backend.probe().await;
        let connected = self.policy.is_connected(outcome);
        debug!(
            "Probe via {}: {:?} under {:?} → connected={}",
            self.backend.name(),
            outcome,
            self.policy,
            connected
        );
        connected
    }

    /// Spawns the probe loop.
    ///
    /// `report` is called with each probe result; returning `false` means the
    /// receiver is gone and the loop stops.
    pub fn spawn<F>(self, cancel: CancellationToken, mut report: F) -> JoinHandle<()>
    where
        F: FnMut(bool) -> bool + Send + 'static,
    {
        info!(
            "Starting connection monitor: policy={:?}, interval={:?}",
            self.policy, self.interval
        );
        tokio::spawn(async move {
            loop {
                let connected = tokio::select! {
                    _ = cancel.cancelled() => break,
                    connected = self.check() => connected,
                };
                if !report(connected) {
                    debug!("Connection monitor receiver dropped");
                    break;
                }
                let Some(period) = self.interval else {
                    break;
                };
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(period) => {}
                }
            }
            info!("Connection monitor stopped");
        })
    }
}
