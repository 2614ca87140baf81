//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Background Work
//!
//! Two kinds of tasks run on the tokio runtime and talk back through one
//! `mpsc` channel of `Action`s:
//!
//! - the connection monitor, reporting `ConnectionChanged` after every probe
//! - at most one exchange task per submission, reporting `ReplyReceived` or
//!   `ExchangeFailed`
//!
//! The loop drains the channel every iteration and feeds each action through
//! `update()`, so all state changes happen on this thread.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (waiting for a reply or for the backend): draws every ~80ms
//!   so the spinners move.
//! - **Idle**: sleeps up to 500ms and only redraws on input, resize, or a
//!   background action.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod fragment;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio_util::sync::CancellationToken;

use crate::core::action::{Action, Effect, ExchangeTicket, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::exchange::{ChatBackend, ConnectionMonitor, ExchangeClient, HttpBackend};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_TICK: Duration = Duration::from_millis(80);
const IDLE_TICK: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
        }
    }

    /// Copy the props the input box renders from.
    fn sync_props(&mut self, app: &App) {
        self.input_box.connected = app.connected;
        self.input_box.sending = app.is_sending();
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol allows Shift+Enter detection; terminals
        // without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Applies actions to `App` and carries out the effects `update()` asks for.
struct Dispatcher {
    client: Arc<ExchangeClient>,
    typing_delay: Duration,
    tx: mpsc::Sender<Action>,
    shutdown: CancellationToken,
    /// Cancels the exchange in flight, if any.
    active_exchange: Option<CancellationToken>,
}

impl Dispatcher {
    /// Returns `false` when the app should quit.
    fn apply(&mut self, app: &mut App, tui: &mut TuiState, action: Action) -> bool {
        let had_messages = !app.transcript.is_empty();
        let keep_running = match update(app, action) {
            Effect::None => true,
            Effect::Quit => false,
            Effect::SpawnExchange(ticket) => {
                // Pin to the bottom so the user's message and the reply stay in view
                tui.message_list.handle_event(&TuiEvent::ScrollToBottom);
                self.active_exchange = Some(self.spawn_exchange(ticket));
                true
            }
            Effect::CancelExchange => {
                if let Some(token) = self.active_exchange.take() {
                    token.cancel();
                }
                true
            }
        };
        if had_messages && app.transcript.is_empty() {
            tui.message_list.reset();
        }
        tui.sync_props(app);
        keep_running
    }

    fn spawn_exchange(&self, ticket: ExchangeTicket) -> CancellationToken {
        info!(
            "Spawning exchange {} on thread {}",
            ticket.request_id, ticket.thread_id
        );
        let cancel = self.shutdown.child_token();
        let task_cancel = cancel.clone();
        let client = self.client.clone();
        let typing_delay = self.typing_delay;
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = client
                .send(&ticket.message, &ticket.thread_id, &task_cancel)
                .await;

            if result.is_ok() && !typing_delay.is_zero() {
                tokio::select! {
                    _ = task_cancel.cancelled() => {}
                    _ = tokio::time::sleep(typing_delay) => {}
                }
            }

            if tx.send(Action::from_exchange(ticket.request_id, result)).is_err() {
                warn!(
                    "Failed to deliver result of exchange {}: receiver dropped",
                    ticket.request_id
                );
            }
        });

        cancel
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(
        HttpBackend::new(config.base_url.clone()).with_probe_timeout(config.probe_timeout),
    );
    let client = Arc::new(ExchangeClient::new(backend.clone(), config.request_timeout));

    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let shutdown = CancellationToken::new();
    let monitor_tx = tx.clone();
    ConnectionMonitor::new(backend, config.probe_policy, config.probe_interval).spawn(
        shutdown.clone(),
        move |connected| monitor_tx.send(Action::ConnectionChanged(connected)).is_ok(),
    );

    let mut dispatcher = Dispatcher {
        client,
        typing_delay: config.typing_delay,
        tx,
        shutdown: shutdown.clone(),
        active_exchange: None,
    };

    let start_time = Instant::now();
    let mut needs_redraw = true;

    'main: loop {
        tui.sync_props(&app);

        let animating = app.is_sending() || !app.connected;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating { ANIMATION_TICK } else { IDLE_TICK };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process the first event and drain everything pending before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => None,
                TuiEvent::ForceQuit => Some(Action::Quit),
                TuiEvent::ClearChat => Some(Action::ClearSession),
                TuiEvent::Escape if app.is_sending() => Some(Action::CancelExchange),
                TuiEvent::Escape => None,
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                    None
                }
                _ => match tui.input_box.handle_event(&event) {
                    Some(InputEvent::Submit(text)) => Some(Action::Submit(text)),
                    _ => None,
                },
            };
            if let Some(action) = action
                && !dispatcher.apply(&mut app, &mut tui, action)
            {
                break 'main;
            }
        }

        // Background results (replies, failures, probe reports)
        while let Ok(action) = rx.try_recv() {
            debug!("Event loop received: {:?}", action);
            needs_redraw = true;
            if !dispatcher.apply(&mut app, &mut tui, action) {
                break 'main;
            }
        }
    }

    info!("Shutting down");
    shutdown.cancel();
    ratatui::restore();
    Ok(())
}
