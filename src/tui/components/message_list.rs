//! # MessageList Component
//!
//! Scrollable view of the transcript with a typing indicator underneath
//! while an exchange is in flight.
//!
//! `MessageList` is created each frame and wraps `&mut MessageListState`
//! (persistent: scroll position, rendered bodies, layout cache) plus the
//! transcript as a prop. Messages never change once appended, so each body is
//! rendered and measured once; only a width change or a cleared transcript
//! invalidates the cache.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Message, message_body};
use crate::tui::event::TuiEvent;

pub const TYPING_TEXT: &str = "Assistant is typing...";
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Blank row plus the indicator line.
const TYPING_ROWS: u16 = 2;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Content exists below the current scroll position.
    pub has_unseen_content: bool,
    /// Rendered body per transcript message, with the message id it came from.
    bodies: Vec<(Option<String>, Text<'static>)>,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            has_unseen_content: false,
            bodies: Vec::new(),
        }
    }

    /// Render bodies for newly appended messages.
    ///
    /// A shorter transcript, or a different id at the last cached index,
    /// means the session was reset: everything is rebuilt.
    pub fn sync_bodies(&mut self, transcript: &Transcript) {
        let messages = transcript.messages();
        let still_valid = self.bodies.len() <= messages.len()
            && self
                .bodies
                .last()
                .is_none_or(|(id, _)| *id == messages[self.bodies.len() - 1].id);
        if !still_valid {
            self.reset();
        }
        for message in &messages[self.bodies.len()..] {
            self.bodies.push((message.id.clone(), message_body(message)));
        }
    }

    /// Forget rendered bodies and scroll position (session reset).
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.layout = LayoutCache::new();
        self.scroll_state = ScrollViewState::default();
        self.stick_to_bottom = true;
        self.has_unseen_content = false;
    }

    fn max_scroll(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub is_sending: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        is_sending: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            is_sending,
            spinner_frame,
        }
    }

    fn typing_line(&self) -> Line<'static> {
        let frame = SPINNER[self.spinner_frame % SPINNER.len()];
        let style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        Line::from(vec![
            Span::styled(format!(" {frame} "), Style::default().fg(Color::Blue)),
            Span::styled(TYPING_TEXT, style),
        ])
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        self.state.sync_bodies(self.transcript);

        // 1. Measure anything not yet cached
        let count = self.state.bodies.len();
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(count, content_width);
        layout.heights.truncate(reusable);
        for (_, body) in self.state.bodies.iter().skip(reusable) {
            layout.heights.push(Message::calculate_height(body, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.content_width = content_width;

        let total_height = self.state.layout.total_height();
        let typing_rows = if self.is_sending { TYPING_ROWS } else { 0 };
        let canvas_height = total_height + typing_rows;

        // 2. Clamp scroll offset (skip when auto-scrolling to the bottom)
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let messages = self.transcript.messages();
        let mut y = self.state.layout.top_of(visible.start);
        for i in visible {
            let height = self.state.layout.heights[i];
            let (_, body) = &self.state.bodies[i];
            scroll_view.render_widget(
                Message::new(&messages[i], body),
                Rect::new(0, y, content_width, height),
            );
            y += height;
        }

        if self.is_sending {
            scroll_view.render_widget(
                self.typing_line(),
                Rect::new(0, total_height + 1, content_width, 1),
            );
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_content =
            canvas_height > area.height && offset < canvas_height.saturating_sub(area.height);
    }
}

impl EventHandler for MessageListState {
    type Event = (); // scrolling is handled internally

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.scroll_state.scroll_to_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached message heights at one content width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    /// Running sums: `prefix_heights[i]` is the bottom edge of message `i`.
    pub prefix_heights: Vec<u16>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
        }
    }

    /// How many cached heights are still valid for `message_count` messages.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        self.heights.len().min(message_count)
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top edge of message `index`.
    pub fn top_of(&self, index: usize) -> u16 {
        match index {
            0 => 0,
            i => self.prefix_heights.get(i - 1).copied().unwrap_or(0),
        }
    }

    /// Messages overlapping the viewport, padded by half a screen each way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let pad = viewport_height / 2;
        let from = scroll_offset.saturating_sub(pad);
        let to = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(pad);

        let start = self.prefix_heights.partition_point(|&bottom| bottom <= from);
        let end = self
            .prefix_heights
            .partition_point(|&bottom| bottom < to)
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::Message as Entry;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn transcript(entries: &[Entry]) -> Transcript {
        let mut t = Transcript::new();
        for e in entries {
            t.push(e.clone());
        }
        t
    }

    fn draw(state: &mut MessageListState, t: &Transcript, sending: bool, w: u16, h: u16) -> String {
        let backend = TestBackend::new(w, h);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                MessageList::new(state, t, sending, 0).render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 5];
        cache.content_width = 80;

        assert_eq!(cache.reusable_count(5, 80), 5);
        // New message appended: the cached five stay valid
        assert_eq!(cache.reusable_count(6, 80), 5);
        // Transcript cleared
        assert_eq!(cache.reusable_count(0, 80), 0);
        // Width changed
        assert_eq!(cache.reusable_count(5, 40), 0);
    }

    #[test]
    fn test_prefix_heights_and_visible_range() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 3, 3, 3, 3, 3];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![3, 6, 9, 12, 15, 18]);
        assert_eq!(cache.total_height(), 18);
        assert_eq!(cache.top_of(0), 0);
        assert_eq!(cache.top_of(2), 6);

        // viewport rows 9..13, padded by 2 → rows 7..15
        let range = cache.visible_range(9, 4);
        assert_eq!(range, 2..5);
    }

    #[test]
    fn test_visible_range_empty() {
        let cache = LayoutCache::new();
        assert_eq!(cache.visible_range(0, 10), 0..0);
    }

    #[test]
    fn test_sync_bodies_appends_then_resets() {
        let mut state = MessageListState::new();
        let mut t = transcript(&[Entry::user("hi"), Entry::assistant("hello")]);
        state.sync_bodies(&t);
        assert_eq!(state.bodies.len(), 2);

        t.push(Entry::user("again"));
        state.sync_bodies(&t);
        assert_eq!(state.bodies.len(), 3);

        // Cleared and refilled to the same length with different messages
        let replaced = transcript(&[Entry::user("a"), Entry::user("b"), Entry::user("c")]);
        state.sync_bodies(&replaced);
        assert_eq!(state.bodies.len(), 3);
        assert_eq!(state.bodies[2].0, replaced.messages()[2].id);

        state.sync_bodies(&Transcript::new());
        assert!(state.bodies.is_empty());
    }

    #[test]
    fn test_render_shows_messages() {
        let mut state = MessageListState::new();
        let t = transcript(&[Entry::user("What is a graph?"), Entry::assistant("**Nodes** and edges")]);
        let text = draw(&mut state, &t, false, 50, 12);
        assert!(text.contains("What is a graph?"));
        assert!(text.contains("Nodes and edges"));
        assert!(!text.contains(TYPING_TEXT));
    }

    #[test]
    fn test_typing_indicator_while_sending() {
        let mut state = MessageListState::new();
        let t = transcript(&[Entry::user("ping")]);
        let text = draw(&mut state, &t, true, 50, 12);
        assert!(text.contains(TYPING_TEXT));
    }

    #[test]
    fn test_scroll_up_detaches_and_scroll_to_bottom_repins() {
        let mut state = MessageListState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_unseen_content_when_scrolled_up() {
        let mut state = MessageListState::new();
        let entries: Vec<Entry> = (0..10).map(|i| Entry::user(format!("message {i}"))).collect();
        let t = transcript(&entries);
        draw(&mut state, &t, false, 40, 6);
        assert!(!state.has_unseen_content, "pinned to bottom");

        state.handle_event(&TuiEvent::ScrollPageUp);
        draw(&mut state, &t, false, 40, 6);
        assert!(state.has_unseen_content);
    }
}
