//! # Application State
//!
//! Core business state for graphchat. Domain logic only: no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── transcript: Transcript      // ordered messages for this session
//! ├── session: Session            // thread id sent with every exchange
//! ├── connected: bool             // last liveness probe result
//! ├── phase: SubmitPhase          // idle | sending { request_id }
//! ├── status_message: String      // status bar text
//! ├── error_message: String       // fallback bubble text on failures
//! └── next_request_id: u64        // tags exchanges so stale replies are dropped
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::{DEFAULT_ERROR_MESSAGE, ResolvedConfig};
use crate::core::session::Session;
use crate::core::transcript::Transcript;

/// Where the single submission slot stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    /// An exchange is outstanding; further submissions are rejected.
    Sending { request_id: u64 },
}

impl SubmitPhase {
    pub fn is_sending(self) -> bool {
        matches!(self, SubmitPhase::Sending { .. })
    }
}

pub struct App {
    pub transcript: Transcript,
    pub session: Session,
    pub connected: bool,
    pub phase: SubmitPhase,
    pub status_message: String,
    /// Shown as an error-tagged assistant message whenever an exchange fails.
    pub error_message: String,
    pub next_request_id: u64,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            session: Session::default(),
            connected: false,
            phase: SubmitPhase::Idle,
            status_message: String::from("Welcome to graphchat!"),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            next_request_id: 1,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            session: Session::with_thread_id(config.thread_id.clone()),
            error_message: config.error_message.clone(),
            ..Self::new()
        }
    }

    pub fn is_sending(&self) -> bool {
        self.phase.is_sending()
    }

    /// Whether the input box should accept a submission right now.
    pub fn can_submit(&self) -> bool {
        self.connected && !self.is_sending()
    }
}
