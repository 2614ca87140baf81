use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{self, Role};
use crate::render::render;
use crate::tui::component::Component;
use crate::tui::fragment::fragment_text;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Role → style. Error bubbles override the assistant color.
pub fn message_style(role: Role, is_error: bool) -> Style {
    match (role, is_error) {
        (_, true) => Style::default().fg(Color::Red),
        (Role::User, false) => Style::default().fg(Color::Green),
        (Role::Assistant, false) => Style::default().fg(Color::Blue),
    }
}

fn role_label(role: Role, is_error: bool) -> &'static str {
    match (role, is_error) {
        (_, true) => "error",
        (Role::User, false) => "you",
        (Role::Assistant, false) => "assistant",
    }
}

/// Styled body for one transcript message.
///
/// Assistant replies go through the content renderer; user text and error
/// bubbles are shown as typed.
pub fn message_body(message: &transcript::Message) -> Text<'static> {
    let color = message_style(message.role, message.is_error)
        .fg
        .unwrap_or(Color::Reset);
    match message.role {
        Role::Assistant if !message.is_error => fragment_text(&render(&message.content), color),
        _ => Text::from(
            message
                .content
                .trim()
                .lines()
                .map(|l| Line::styled(l.to_owned(), Style::default().fg(color)))
                .collect::<Vec<_>>(),
        ),
    }
}

/// A transient component that renders a single transcript message.
///
/// Created each frame by `MessageList` with the body it cached for this
/// message, so the content renderer runs once per message, not per frame.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a transcript::Message,
    pub body: &'a Text<'static>,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a transcript::Message, body: &'a Text<'static>) -> Self {
        Self { message, body }
    }

    /// Rows needed to show `body` inside a bordered block of `width` columns.
    pub fn calculate_height(body: &Text<'static>, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still occupy a row.
            return 1;
        }
        if body.lines.is_empty() {
            return VERTICAL_OVERHEAD;
        }
        let rows = Paragraph::new(body.clone())
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        (rows as u16).max(1) + VERTICAL_OVERHEAD
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = message_style(self.message.role, self.message.is_error);
        let border_style = if self.message.is_error {
            style
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let mut block = Block::bordered()
            .title(role_label(self.message.role, self.message.is_error))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if let Some(ts) = self.message.timestamp {
            let local = ts.with_timezone(&chrono::Local).format("%H:%M").to_string();
            block = block.title_top(Line::from(local).right_aligned());
        }

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.body.clone())
            .wrap(Wrap { trim: false })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
