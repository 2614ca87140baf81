//! # Actions
//!
//! Everything that can happen in graphchat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend replies? That's `Action::ReplyReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an [`Effect`] describing any I/O the caller must
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Submission lifecycle:
//!
//! ```text
//!          Submit (connected, idle)
//!   Idle ─────────────────────────────► Sending { request_id }
//!    ▲                                      │
//!    │  ReplyReceived | ExchangeFailed      │
//!    │  CancelExchange                      │
//!    └──────────────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::core::session::Session;
use crate::core::state::{App, SubmitPhase};
use crate::core::transcript::Message;
use crate::exchange::ExchangeError;

/// Text of the bubble appended when the user aborts an exchange.
pub const CANCELLED_MESSAGE: &str = "Request cancelled.";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Raw text from the input box. Slash commands are routed from here.
    Submit(String),
    ReplyReceived { request_id: u64, reply: String },
    ExchangeFailed { request_id: u64, error: ExchangeError },
    /// Result of one liveness probe.
    ConnectionChanged(bool),
    /// Empty the transcript and start a fresh thread.
    ClearSession,
    /// Empty the transcript and continue on a named thread.
    SwitchThread(String),
    CancelExchange,
    Quit,
}

impl Action {
    /// Maps a settled exchange to the action that records it.
    pub fn from_exchange(request_id: u64, result: Result<String, ExchangeError>) -> Self {
        match result {
            Ok(reply) => Action::ReplyReceived { request_id, reply },
            Err(error) => Action::ExchangeFailed { request_id, error },
        }
    }
}

/// Everything the caller needs to run one exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeTicket {
    pub request_id: u64,
    pub message: String,
    pub thread_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SpawnExchange(ExchangeTicket),
    /// Abort the outstanding exchange task.
    CancelExchange,
    Quit,
}

/// Input-box commands borrowed from the console client.
#[derive(Debug, PartialEq)]
enum Command<'a> {
    New,
    Thread(Option<&'a str>),
}

fn parse_command(text: &str) -> Option<Command<'_>> {
    let trimmed = text.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    match parts.next()? {
        "/new" | "/clear" => Some(Command::New),
        "/thread" => Some(Command::Thread(
            parts.next().map(str::trim).filter(|id| !id.is_empty()),
        )),
        _ => None,
    }
}

/// True for `/new`, `/clear` and `/thread …`, which work while disconnected.
pub fn is_command(text: &str) -> bool {
    parse_command(text).is_some()
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, text),

        Action::ReplyReceived { request_id, reply } => {
            if !settle(app, request_id) {
                return Effect::None;
            }
            app.transcript.push(Message::assistant(reply));
            app.status_message = String::from("Ready");
            Effect::None
        }

        Action::ExchangeFailed { request_id, error } => {
            if !settle(app, request_id) {
                return Effect::None;
            }
            warn!("Exchange {} failed: {}", request_id, error);
            app.transcript.push(Message::error(app.error_message.clone()));
            app.status_message = format!("Error: {error}");
            Effect::None
        }

        Action::ConnectionChanged(connected) => {
            if app.connected != connected {
                info!("Backend connection: {}", if connected { "up" } else { "down" });
                app.status_message = if connected {
                    String::from("Connected to backend")
                } else {
                    String::from("Backend unreachable")
                };
            }
            app.connected = connected;
            Effect::None
        }

        Action::ClearSession => {
            if app.is_sending() {
                app.status_message = String::from("Wait for the reply before clearing");
                return Effect::None;
            }
            let next = Session::fresh(&app.session);
            reset_session(app, next);
            Effect::None
        }

        Action::SwitchThread(thread_id) => {
            if app.is_sending() {
                app.status_message = String::from("Wait for the reply before switching threads");
                return Effect::None;
            }
            reset_session(app, Session::with_thread_id(thread_id));
            Effect::None
        }

        Action::CancelExchange => {
            let SubmitPhase::Sending { request_id } = app.phase else {
                return Effect::None;
            };
            info!("Exchange {} cancelled by user", request_id);
            app.phase = SubmitPhase::Idle;
            app.transcript.push(Message::error(CANCELLED_MESSAGE));
            app.status_message = String::from("Cancelled");
            Effect::CancelExchange
        }

        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    if text.trim().is_empty() {
        return Effect::None;
    }

    match parse_command(&text) {
        Some(Command::New) => return update(app, Action::ClearSession),
        Some(Command::Thread(Some(id))) => return update(app, Action::SwitchThread(id.to_string())),
        Some(Command::Thread(None)) => {
            app.status_message = String::from("Usage: /thread <id>");
            return Effect::None;
        }
        None => {}
    }

    if !app.connected {
        debug!("Submit rejected: backend not connected");
        app.status_message = String::from("Backend not connected");
        return Effect::None;
    }
    if app.is_sending() {
        debug!("Submit rejected: exchange already in flight");
        return Effect::None;
    }

    let request_id = app.next_request_id;
    app.next_request_id += 1;
    app.phase = SubmitPhase::Sending { request_id };
    app.transcript.push(Message::user(text.clone()));
    app.status_message = String::from("Sending...");

    Effect::SpawnExchange(ExchangeTicket {
        request_id,
        message: text,
        thread_id: app.session.thread_id().to_string(),
    })
}

/// Returns the slot to idle if `request_id` is the outstanding exchange.
/// Stale results (cancelled, or from a previous session) are dropped.
fn settle(app: &mut App, request_id: u64) -> bool {
    match app.phase {
        SubmitPhase::Sending { request_id: current } if current == request_id => {
            app.phase = SubmitPhase::Idle;
            true
        }
        _ => {
            debug!("Dropping stale result for exchange {}", request_id);
            false
        }
    }
}

fn reset_session(app: &mut App, next: Session) {
    info!(
        "Session reset: {} → {}",
        app.session.thread_id(),
        next.thread_id()
    );
    app.transcript.clear();
    app.session = next;
    app.status_message = format!("New thread: {}", app.session.thread_id());
}
