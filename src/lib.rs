//! graphchat library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::exchange::ProbeOutcome;

pub mod core;
pub mod exchange;
pub mod render;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// How a liveness probe response maps to "connected".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbePolicy {
    /// Any HTTP response counts, whatever its status.
    #[default]
    Lenient,
    /// Only 2xx counts.
    Strict,
}

impl ProbePolicy {
    pub fn is_connected(self, outcome: ProbeOutcome) -> bool {
        match (self, outcome) {
            (_, ProbeOutcome::Unreachable) => false,
            (ProbePolicy::Lenient, ProbeOutcome::Responded(_)) => true,
            (ProbePolicy::Strict, ProbeOutcome::Responded(status)) => (200..300).contains(&status),
        }
    }

    /// Case-insensitive name lookup, used for env var values.
    pub fn parse(s: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(s.trim(), true).ok()
    }
}
