//! # Landing Page Component
//!
//! Shown in place of the message list while the transcript is empty.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct LandingPage<'a> {
    pub thread_id: &'a str,
    pub connected: bool,
    pub frame_index: usize,
}

impl<'a> LandingPage<'a> {
    pub fn new(thread_id: &'a str, connected: bool, frame_index: usize) -> Self {
        Self {
            thread_id,
            connected,
            frame_index,
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let status = if self.connected {
            Line::from(Span::styled(
                "Ask anything to get started.",
                Style::default().fg(Color::Green),
            ))
        } else {
            let frame = SPINNER[self.frame_index % SPINNER.len()];
            Line::from(Span::styled(
                format!("{frame} Looking for the backend..."),
                Style::default().fg(Color::Yellow),
            ))
        };

        vec![
            Line::from(Span::styled(
                "graphchat",
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), dim)),
            Line::default(),
            status,
            Line::from(Span::styled(format!("thread: {}", self.thread_id), dim)),
            Line::default(),
            Line::from(Span::styled(
                "/new starts a fresh thread · /thread <id> switches · Ctrl+C quits",
                dim,
            )),
        ]
    }
}

impl<'a> Component for LandingPage<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let [text_area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, text_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(page: &mut LandingPage) -> String {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_connected_greeting() {
        let mut page = LandingPage::new("default", true, 0);
        let text = rendered(&mut page);
        assert!(text.contains("graphchat"));
        assert!(text.contains("Ask anything"));
        assert!(text.contains("thread: default"));
    }

    #[test]
    fn test_disconnected_hint() {
        let mut page = LandingPage::new("research", false, 3);
        let text = rendered(&mut page);
        assert!(text.contains("Looking for the backend"));
        assert!(!text.contains("Ask anything"));
    }
}
