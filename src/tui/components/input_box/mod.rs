//! # InputBox Component
//!
//! Multi-line message editor.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste, and cursor movement
//! - Emit `Submit` on Enter for non-blank text
//! - Show a placeholder while the backend is unreachable or a reply is pending
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `connected` and `sending` are
//! props synced from `App` every frame. When the box cannot send, Enter still
//! reports the text (so the core can explain why) but the draft is kept.
//! Recognised commands (`/new`, `/thread <id>`) are taken out of the box
//! whenever no reply is pending, since the core applies them while
//! disconnected too.

mod editing;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::action::is_command;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use editing::{
    CONTENT_OFFSET, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, cursor_position, inner_width, line_end,
    line_start, next_char_boundary, next_word_boundary, prev_char_boundary, prev_word_boundary,
    row_count, wrapped_rows,
};

pub const DISCONNECTED_PLACEHOLDER: &str = "Waiting for backend connection...";
pub const SENDING_PLACEHOLDER: &str = "Waiting for the reply... (Esc to cancel)";
pub const IDLE_PLACEHOLDER: &str = "Type a message. Enter sends, /new starts a new thread";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed on non-blank text
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Backend reachable (Prop)
    pub connected: bool,
    /// Exchange in flight (Prop)
    pub sending: bool,
    /// Cursor as a byte offset into `buffer`
    cursor: usize,
    /// First visible row when the text is taller than the box
    scroll: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            connected: false,
            sending: false,
            cursor: 0,
            scroll: 0,
        }
    }

    pub fn can_send(&self) -> bool {
        self.connected && !self.sending
    }

    fn placeholder(&self) -> &'static str {
        if !self.connected {
            DISCONNECTED_PLACEHOLDER
        } else if self.sending {
            SENDING_PLACEHOLDER
        } else {
            IDLE_PLACEHOLDER
        }
    }

    /// Height for the current buffer, between one and `MAX_VISIBLE_LINES` rows.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = row_count(&self.buffer, inner_width(area_width));
        rows.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Keep the cursor row inside the visible window.
    fn follow_cursor(&mut self, width: u16) {
        let total = row_count(&self.buffer, width);
        if total <= MAX_VISIBLE_LINES {
            self.scroll = 0;
            return;
        }
        let (row, _) = cursor_position(&self.buffer, self.cursor, width);
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll.saturating_add(MAX_VISIBLE_LINES) {
            self.scroll = row.saturating_add(1) - MAX_VISIBLE_LINES;
        }
        self.scroll = self.scroll.min(total - MAX_VISIBLE_LINES);
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        Some(InputEvent::ContentChanged)
    }

    fn move_to(&mut self, pos: usize) -> Option<InputEvent> {
        if pos == self.cursor {
            return None;
        }
        self.cursor = pos;
        Some(InputEvent::ContentChanged)
    }

    fn submit(&mut self) -> Option<InputEvent> {
        if self.buffer.trim().is_empty() {
            return None;
        }
        let command = !self.sending && is_command(&self.buffer);
        if self.can_send() || command {
            let text = std::mem::take(&mut self.buffer);
            self.cursor = 0;
            self.scroll = 0;
            Some(InputEvent::Submit(text))
        } else {
            Some(InputEvent::Submit(self.buffer.clone()))
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.follow_cursor(width);

        let border_style = if self.can_send() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title("Message")
            .padding(Padding::horizontal(1));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(Line::styled(
                self.placeholder(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            let lines: Vec<Line<'static>> = wrapped_rows(&self.buffer, width)
                .into_iter()
                .skip(self.scroll as usize)
                .take(MAX_VISIBLE_LINES as usize)
                .map(Line::raw)
                .collect();
            Paragraph::new(lines).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(paragraph.block(block), area);

        let (row, col) = cursor_position(&self.buffer, self.cursor, width);
        frame.set_cursor_position((
            area.x + CONTENT_OFFSET + col,
            area.y + 1 + row.saturating_sub(self.scroll),
        ));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => self.insert(c.encode_utf8(&mut [0; 4])),
            TuiEvent::Paste(text) => self.insert(&text.replace("\r\n", "\n")),
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => self.move_to(prev_char_boundary(&self.buffer, self.cursor)),
            TuiEvent::CursorRight => self.move_to(next_char_boundary(&self.buffer, self.cursor)),
            TuiEvent::WordLeft => self.move_to(prev_word_boundary(&self.buffer, self.cursor)),
            TuiEvent::WordRight => self.move_to(next_word_boundary(&self.buffer, self.cursor)),
            TuiEvent::CursorHome => self.move_to(line_start(&self.buffer, self.cursor)),
            TuiEvent::CursorEnd => self.move_to(line_end(&self.buffer, self.cursor)),
            TuiEvent::Submit => self.submit(),
            _ => None,
        }
    }
}
