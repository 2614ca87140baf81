//! # TitleBar Component
//!
//! Top status bar: app name, backend connection indicator, active thread,
//! status message, and a "↓ New" hint when content is below the scroll
//! position.
//!
//! Purely presentational. All fields are props from the parent:
//! - `connected`, `thread_id`, `status_message`: core `App` state
//! - `has_unseen_content`: TUI scroll state
//!
//! ```text
//! graphchat ● connected │ thread: default │ Ready │ ↓ New
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

const SEPARATOR: &str = " │ ";

pub struct TitleBar {
    pub connected: bool,
    pub thread_id: String,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        connected: bool,
        thread_id: String,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            connected,
            thread_id,
            status_message,
            has_unseen_content,
        }
    }

    fn line(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        let (dot, label, color) = if self.connected {
            ("● ", "connected", Color::Green)
        } else {
            ("○ ", "disconnected", Color::Red)
        };

        let mut spans = vec![
            Span::styled("graphchat ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(dot, Style::default().fg(color)),
            Span::styled(label, Style::default().fg(color)),
            Span::styled(SEPARATOR, dim),
            Span::styled(format!("thread: {}", self.thread_id), dim),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::styled(SEPARATOR, dim));
            spans.push(Span::raw(self.status_message.clone()));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(SEPARATOR, dim));
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}
