//! [`DisplayFragment`] → ratatui `Text`.
//!
//! Walks the typed node tree and emits styled `Line`/`Span` values: headings,
//! bold, italic, inline code, fenced code blocks (with syntect highlighting),
//! lists, blockquotes, links, and search-result cards.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::render::fragment::VIEW_SOURCE_LABEL;
use crate::render::{Block, DisplayFragment, Inline, SearchResults};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);
const CODE_THEME: &str = "base16-ocean.dark";

/// Render a fragment as styled `Text` using `base_fg` for unstyled text.
///
/// Returns owned text (`'static`) so it can be cached per message.
pub fn fragment_text(fragment: &DisplayFragment, base_fg: Color) -> Text<'static> {
    let mut w = Writer::new(base_fg);
    w.blocks(&fragment.blocks, true);
    Text::from(w.lines)
}

// ── Writer ──────────────────────────────────────────────────────────────────

/// Per-line prefix. `first` is used once (list markers), `rest` afterwards.
struct Prefix {
    first: Option<Span<'static>>,
    rest: Span<'static>,
}

struct Writer {
    lines: Vec<Line<'static>>,
    base_fg: Color,
    prefixes: Vec<Prefix>,
    /// Quote nesting dims and italicizes everything inside it.
    quote_depth: usize,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            lines: vec![],
            base_fg,
            prefixes: vec![],
            quote_depth: 0,
        }
    }

    fn base_style(&self) -> Style {
        let style = Style::default().fg(self.base_fg);
        if self.quote_depth > 0 {
            style.add_modifier(Modifier::DIM | Modifier::ITALIC)
        } else {
            style
        }
    }

    // ── Line/span helpers ───────────────────────────────────────────────

    fn new_line(&mut self) {
        let spans: Vec<Span<'static>> = self
            .prefixes
            .iter_mut()
            .map(|p| p.first.take().unwrap_or_else(|| p.rest.clone()))
            .collect();
        self.lines.push(Line::from(spans));
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => {
                self.new_line();
                self.push_span(span);
            }
        }
    }

    // ── Blocks ──────────────────────────────────────────────────────────

    /// `spaced` separates blocks with a blank line (tight list items are not).
    fn blocks(&mut self, blocks: &[Block], spaced: bool) {
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 && spaced {
                self.new_line();
            }
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(content) => {
                self.new_line();
                let style = self.base_style();
                self.inlines(content, style);
            }
            Block::Heading { level, content } => {
                self.new_line();
                let hs = heading_style(self.base_style(), *level);
                self.push_span(Span::styled(format!("{} ", "#".repeat(*level as usize)), hs));
                self.inlines(content, hs);
            }
            Block::List { start, items } => self.list(*start, items),
            Block::CodeBlock { lang, code } => self.code_block(lang.as_deref(), code),
            Block::Quote(inner) => {
                self.prefixes.push(Prefix {
                    first: None,
                    rest: Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                });
                self.quote_depth += 1;
                self.blocks(inner, true);
                self.quote_depth -= 1;
                self.prefixes.pop();
            }
            Block::Rule => {
                self.new_line();
                self.push_span(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Block::SearchResults(search) => self.search_results(search),
        }
    }

    fn list(&mut self, start: Option<u64>, items: &[Vec<Block>]) {
        let marker_style = Style::default().fg(Color::DarkGray);
        for (i, item) in items.iter().enumerate() {
            let marker = match start {
                None => "- ".to_string(),
                Some(n) => format!("{}. ", n + i as u64),
            };
            let indent = " ".repeat(marker.chars().count());
            self.prefixes.push(Prefix {
                first: Some(Span::styled(marker, marker_style)),
                rest: Span::raw(indent),
            });
            if item.is_empty() {
                self.new_line();
            }
            self.blocks(item, false);
            self.prefixes.pop();
        }
    }

    fn code_block(&mut self, lang: Option<&str>, code: &str) {
        let bs = Style::default().fg(Color::DarkGray);

        // Top border: ╭── lang ──  or just ╭──
        self.new_line();
        match lang {
            Some(lang) => {
                self.push_span(Span::styled("╭── ", bs));
                self.push_span(Span::styled(lang.to_owned(), bs.add_modifier(Modifier::BOLD)));
                self.push_span(Span::styled(" ──", bs));
            }
            None => self.push_span(Span::styled("╭──", bs)),
        }

        self.prefixes.push(Prefix {
            first: None,
            rest: Span::styled("│ ", bs),
        });
        let highlighted = lang.and_then(|l| highlight(l, code));
        match highlighted {
            Some(lines) => {
                for spans in lines {
                    self.new_line();
                    for span in spans {
                        self.push_span(span);
                    }
                }
            }
            None => {
                let code_style = Style::default().fg(Color::White);
                for line in code.lines() {
                    self.new_line();
                    self.push_span(Span::styled(expand_tabs(line), code_style));
                }
            }
        }
        self.prefixes.pop();

        self.new_line();
        self.push_span(Span::styled("╰──", bs));
    }

    fn search_results(&mut self, search: &SearchResults) {
        let base = self.base_style();
        self.new_line();
        self.push_span(Span::styled(
            search.title.clone(),
            base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
        for result in &search.results {
            self.new_line();
            self.new_line();
            self.push_span(Span::styled(
                format!("{}. ", result.number),
                Style::default().fg(Color::DarkGray),
            ));
            self.push_span(Span::styled(result.title.clone(), base.add_modifier(Modifier::BOLD)));
            for line in result.content.lines() {
                self.new_line();
                self.push_span(Span::styled(expand_tabs(line), base));
            }
            if let Some(url) = &result.url {
                self.new_line();
                self.push_span(Span::styled(VIEW_SOURCE_LABEL, link_style()));
                self.push_span(Span::styled(
                    format!(" ({url})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
    }

    // ── Inlines ─────────────────────────────────────────────────────────

    fn inlines(&mut self, inlines: &[Inline], style: Style) {
        for inline in inlines {
            match inline {
                Inline::Text(t) => self.push_span(Span::styled(expand_tabs(t), style)),
                Inline::Strong(inner) => self.inlines(inner, style.add_modifier(Modifier::BOLD)),
                Inline::Emphasis(inner) => {
                    self.inlines(inner, style.add_modifier(Modifier::ITALIC))
                }
                Inline::Code(c) => self.push_span(Span::styled(
                    c.clone(),
                    Style::default().fg(Color::White).bg(Color::DarkGray),
                )),
                Inline::Link { url, content } => {
                    self.inlines(content, style.patch(link_style()));
                    if crate::render::fragment::inlines_text(content) != *url {
                        self.push_span(Span::styled(
                            format!(" ({url})"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                }
                Inline::LineBreak => self.new_line(),
            }
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Syntax-highlighted spans per line, or `None` for unknown languages.
fn highlight(lang: &str, code: &str) -> Option<Vec<Vec<Span<'static>>>> {
    let syntax = SYNTAX_SET.find_syntax_by_token(lang)?;
    let theme = THEME_SET.themes.get(CODE_THEME)?;
    let mut hl = HighlightLines::new(syntax, theme);
    let mut out = Vec::new();
    for line in LinesWithEndings::from(code) {
        let ranges = hl.highlight_line(line, &SYNTAX_SET).ok()?;
        let spans = ranges
            .into_iter()
            .filter_map(|(hl_style, frag)| {
                let content = expand_tabs(frag.trim_end_matches('\n'));
                if content.is_empty() {
                    return None;
                }
                let fg = Color::Rgb(
                    hl_style.foreground.r,
                    hl_style.foreground.g,
                    hl_style.foreground.b,
                );
                Some(Span::styled(content, Style::default().fg(fg)))
            })
            .collect();
        out.push(spans);
    }
    Some(out)
}

/// ratatui renders `\t` as zero-width.
fn expand_tabs(s: &str) -> String {
    s.replace('\t', "    ")
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

fn heading_style(base: Style, level: u8) -> Style {
    match level {
        1 => base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        2 => base.add_modifier(Modifier::BOLD),
        _ => base.add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;

    fn line_strings(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn bold_only_styles_its_words() {
        let text = fragment_text(&render("**hi** there"), Color::Blue);
        let line = &text.lines[0];
        let hi = line.spans.iter().find(|s| s.content == "hi").unwrap();
        let there = line.spans.iter().find(|s| s.content == " there").unwrap();
        assert!(hi.style.add_modifier.contains(Modifier::BOLD));
        assert!(!there.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(there.style.fg, Some(Color::Blue));
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let text = fragment_text(&render("## Hello"), Color::Blue);
        let line = &text.lines[0];
        assert_eq!(line.spans[0].content, "## ");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[1].style.fg, Some(Color::Blue));
    }

    #[test]
    fn paragraphs_are_separated_by_blank_line() {
        let text = fragment_text(&render("one\n\ntwo"), Color::Blue);
        assert_eq!(line_strings(&text), vec!["one", "", "two"]);
    }

    #[test]
    fn list_markers_and_continuation_indent() {
        let text = fragment_text(&render("3. first\n   more\n4. second"), Color::Blue);
        assert_eq!(line_strings(&text), vec!["3. first", "   more", "4. second"]);
    }

    #[test]
    fn code_block_has_border_structure() {
        let text = fragment_text(&render("```\nline1\n\tline2\n```"), Color::Blue);
        let lines = line_strings(&text);
        assert!(lines[0].starts_with('╭'), "got {:?}", lines);
        assert_eq!(lines[1], "│ line1");
        assert_eq!(lines[2], "│     line2");
        assert!(lines.last().unwrap().starts_with('╰'));
    }

    #[test]
    fn highlighted_code_keeps_language_label() {
        let text = fragment_text(&render("```rust\nfn main() {}\n```"), Color::Blue);
        let lines = line_strings(&text);
        assert!(lines[0].contains("rust"));
        assert!(lines[1].starts_with("│ "));
        assert!(lines[1].contains("fn main"));
    }

    #[test]
    fn quote_lines_are_prefixed() {
        let text = fragment_text(&render("> wise words"), Color::Blue);
        assert_eq!(line_strings(&text), vec!["│ wise words"]);
        let body = &text.lines[0].spans[1];
        assert!(body.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn link_shows_url_after_text() {
        let text = fragment_text(&render("[docs](https://example.com)"), Color::Blue);
        assert_eq!(line_strings(&text), vec!["docs (https://example.com)"]);
        assert!(text.lines[0].spans[0].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn search_results_render_as_cards() {
        let raw = r#"{"type":"search_results","title":"Hits","results":[
            {"number":1,"title":"Alpha","content":"first body","url":"https://a.example"},
            {"number":2,"title":"Beta","content":"second body"}
        ]}"#;
        let text = fragment_text(&render(raw), Color::Blue);
        let lines = line_strings(&text);
        assert_eq!(lines[0], "Hits");
        assert!(lines.contains(&"1. Alpha".to_string()));
        assert!(lines.contains(&"view source (https://a.example)".to_string()));
        assert!(lines.contains(&"2. Beta".to_string()));
        assert_eq!(lines.iter().filter(|l| l.starts_with("view source")).count(), 1);
    }

    #[test]
    fn raw_html_is_shown_verbatim() {
        let text = fragment_text(&render("<b>bold?</b>"), Color::Blue);
        assert_eq!(line_strings(&text), vec!["<b>bold?</b>"]);
    }
}
