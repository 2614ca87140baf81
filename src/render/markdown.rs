//! Markdown → [`DisplayFragment`] builder.
//!
//! Walks `pulldown_cmark` events and assembles typed nodes. Raw HTML in the
//! input becomes literal text.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Parser, Tag, TagEnd};

use super::fragment::{Block, DisplayFragment, Inline, push_text};

pub fn parse(content: &str) -> DisplayFragment {
    let mut b = Builder::new();
    for event in Parser::new(content) {
        b.handle(event);
    }
    b.finish()
}

// ── Builder ─────────────────────────────────────────────────────────────────

enum Container {
    Root,
    Quote,
    List {
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    Item,
}

struct BlockFrame {
    container: Container,
    blocks: Vec<Block>,
}

enum InlineKind {
    Paragraph,
    /// Text with no enclosing paragraph (tight list items).
    Loose,
    Heading(u8),
    Strong,
    Emphasis,
    Link(String),
}

struct InlineFrame {
    kind: InlineKind,
    children: Vec<Inline>,
}

struct Builder {
    /// Never empty: `[0]` is the root.
    blocks: Vec<BlockFrame>,
    inlines: Vec<InlineFrame>,
    /// Language and accumulated body of an open code block.
    code: Option<(Option<String>, String)>,
}

impl Builder {
    fn new() -> Self {
        Self {
            blocks: vec![BlockFrame {
                container: Container::Root,
                blocks: vec![],
            }],
            inlines: vec![],
            code: None,
        }
    }

    fn finish(mut self) -> DisplayFragment {
        self.flush_inlines();
        while self.blocks.len() > 1 {
            self.close_container();
        }
        let blocks = self.blocks.pop().map(|f| f.blocks).unwrap_or_default();
        DisplayFragment::new(blocks)
    }

    // ── Stack helpers ───────────────────────────────────────────────────

    fn push_block(&mut self, block: Block) {
        if let Some(frame) = self.blocks.last_mut() {
            frame.blocks.push(block);
        }
    }

    fn open_inline(&mut self, kind: InlineKind) {
        self.inlines.push(InlineFrame {
            kind,
            children: vec![],
        });
    }

    /// Inline content needs somewhere to live even without a paragraph.
    fn ensure_inline_root(&mut self) {
        if self.inlines.is_empty() {
            self.open_inline(InlineKind::Loose);
        }
    }

    fn current_inlines(&mut self) -> &mut Vec<Inline> {
        self.ensure_inline_root();
        let last = self.inlines.len() - 1;
        &mut self.inlines[last].children
    }

    /// Pops the top inline frame and attaches it to its parent.
    fn close_inline(&mut self) {
        let Some(frame) = self.inlines.pop() else {
            return;
        };
        let children = frame.children;
        let node = match frame.kind {
            InlineKind::Paragraph | InlineKind::Loose => {
                if !children.is_empty() {
                    self.push_block(Block::Paragraph(children));
                }
                return;
            }
            InlineKind::Heading(level) => {
                self.push_block(Block::Heading {
                    level,
                    content: children,
                });
                return;
            }
            InlineKind::Strong => Inline::Strong(children),
            InlineKind::Emphasis => Inline::Emphasis(children),
            InlineKind::Link(url) => Inline::Link {
                url,
                content: children,
            },
        };
        self.current_inlines().push(node);
    }

    /// Closes every open inline frame, emitting the enclosing block.
    fn flush_inlines(&mut self) {
        while !self.inlines.is_empty() {
            self.close_inline();
        }
    }

    fn open_container(&mut self, container: Container) {
        self.flush_inlines();
        self.blocks.push(BlockFrame {
            container,
            blocks: vec![],
        });
    }

    fn close_container(&mut self) {
        self.flush_inlines();
        if self.blocks.len() <= 1 {
            return;
        }
        let Some(frame) = self.blocks.pop() else {
            return;
        };
        match frame.container {
            Container::Root => {}
            Container::Quote => self.push_block(Block::Quote(frame.blocks)),
            Container::List { start, items } => self.push_block(Block::List { start, items }),
            Container::Item => {
                if let Some(BlockFrame {
                    container: Container::List { items, .. },
                    ..
                }) = self.blocks.last_mut()
                {
                    items.push(frame.blocks);
                } else {
                    for block in frame.blocks {
                        self.push_block(block);
                    }
                }
            }
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.current_inlines().push(Inline::Code(c.to_string())),
            Event::Html(h) | Event::InlineHtml(h) => self.literal(&h),
            Event::SoftBreak | Event::HardBreak => self.current_inlines().push(Inline::LineBreak),
            Event::Rule => {
                self.flush_inlines();
                self.push_block(Block::Rule);
            }
            _ => {} // footnotes, math, task markers
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::HtmlBlock => {
                self.flush_inlines();
                self.open_inline(InlineKind::Paragraph);
            }
            Tag::Heading { level, .. } => {
                self.flush_inlines();
                self.open_inline(InlineKind::Heading(heading_level(level)));
            }
            Tag::BlockQuote(_) => self.open_container(Container::Quote),
            Tag::List(start) => self.open_container(Container::List {
                start,
                items: vec![],
            }),
            Tag::Item => self.open_container(Container::Item),
            Tag::CodeBlock(kind) => {
                self.flush_inlines();
                let lang = match kind {
                    CodeBlockKind::Fenced(l) if !l.trim().is_empty() => Some(l.trim().to_string()),
                    _ => None,
                };
                self.code = Some((lang, String::new()));
            }
            Tag::Emphasis => {
                self.ensure_inline_root();
                self.open_inline(InlineKind::Emphasis);
            }
            Tag::Strong => {
                self.ensure_inline_root();
                self.open_inline(InlineKind::Strong);
            }
            Tag::Link { dest_url, .. } => {
                self.ensure_inline_root();
                self.open_inline(InlineKind::Link(dest_url.to_string()));
            }
            _ => {} // tables, images, footnote definitions
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::HtmlBlock | TagEnd::Heading(_) => self.flush_inlines(),
            TagEnd::BlockQuote(_) | TagEnd::List(_) | TagEnd::Item => self.close_container(),
            TagEnd::CodeBlock => {
                if let Some((lang, mut code)) = self.code.take() {
                    while code.ends_with('\n') {
                        code.pop();
                    }
                    self.push_block(Block::CodeBlock { lang, code });
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Link => self.close_inline(),
            _ => {}
        }
    }

    // ── Content handlers ────────────────────────────────────────────────

    fn text(&mut self, cow: CowStr<'_>) {
        if let Some((_, code)) = self.code.as_mut() {
            code.push_str(&cow);
            return;
        }
        push_text(self.current_inlines(), &cow);
    }

    /// Markup from the reply is shown as-is, split at its own newlines.
    fn literal(&mut self, html: &str) {
        let html = html.trim_end_matches('\n');
        let inlines = self.current_inlines();
        for (i, line) in html.split('\n').enumerate() {
            if i > 0 {
                inlines.push(Inline::LineBreak);
            }
            push_text(inlines, line);
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Three visual levels; anything deeper renders as level 3.
fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn bold_wraps_only_its_text() {
        let fragment = parse("**hi** there");
        assert_eq!(
            fragment.blocks,
            vec![Block::Paragraph(vec![
                Inline::Strong(vec![text("hi")]),
                text(" there"),
            ])]
        );
    }

    #[test]
    fn bold_italic_nests_italic_inside_strong() {
        let fragment = parse("***x***");
        let Block::Paragraph(inlines) = &fragment.blocks[0] else {
            panic!("expected paragraph, got {:?}", fragment.blocks);
        };
        // Either nesting order keeps both styles
        let nested = match &inlines[0] {
            Inline::Strong(inner) => matches!(inner.as_slice(), [Inline::Emphasis(_)]),
            Inline::Emphasis(inner) => matches!(inner.as_slice(), [Inline::Strong(_)]),
            _ => false,
        };
        assert!(nested, "got {:?}", inlines);
    }

    #[test]
    fn headings_clamp_to_three_levels() {
        let fragment = parse("# One\n\n## Two\n\n### Three\n\n###### Six");
        let levels: Vec<u8> = fragment
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading { level, .. } => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 3]);
    }

    #[test]
    fn tight_lists_keep_item_text() {
        let fragment = parse("- apples\n- pears\n\n3. three\n4. four");
        assert_eq!(fragment.blocks.len(), 2);
        match &fragment.blocks[0] {
            Block::List { start, items } => {
                assert_eq!(*start, None);
                assert_eq!(items.len(), 2);
                assert_eq!(items[1], vec![Block::Paragraph(vec![text("pears")])]);
            }
            other => panic!("expected bullet list, got {:?}", other),
        }
        match &fragment.blocks[1] {
            Block::List { start, items } => {
                assert_eq!(*start, Some(3));
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected ordered list, got {:?}", other),
        }
    }

    #[test]
    fn nested_list_lands_inside_item() {
        let fragment = parse("- outer\n  - inner");
        let Block::List { items, .. } = &fragment.blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items[0].len(), 2);
        assert!(matches!(items[0][1], Block::List { .. }));
    }

    #[test]
    fn line_breaks_are_kept() {
        let fragment = parse("first\nsecond");
        assert_eq!(
            fragment.blocks,
            vec![Block::Paragraph(vec![
                text("first"),
                Inline::LineBreak,
                text("second")
            ])]
        );
    }

    #[test]
    fn links_and_inline_code() {
        let fragment = parse("See [docs](https://example.com) or `cargo doc`");
        let Block::Paragraph(inlines) = &fragment.blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(inlines.contains(&Inline::Link {
            url: "https://example.com".into(),
            content: vec![text("docs")],
        }));
        assert!(inlines.contains(&Inline::Code("cargo doc".into())));
    }

    #[test]
    fn fenced_code_keeps_language_and_body() {
        let fragment = parse("```rust\nfn main() {}\n```");
        assert_eq!(
            fragment.blocks,
            vec![Block::CodeBlock {
                lang: Some("rust".into()),
                code: "fn main() {}".into(),
            }]
        );
    }

    #[test]
    fn quote_and_rule() {
        let fragment = parse("> quoted\n\n---\n\nafter");
        assert_eq!(
            fragment.blocks,
            vec![
                Block::Quote(vec![Block::Paragraph(vec![text("quoted")])]),
                Block::Rule,
                Block::Paragraph(vec![text("after")]),
            ]
        );
    }

    #[test]
    fn inline_html_is_literal_text() {
        let fragment = parse("hi <b>there</b>");
        assert_eq!(fragment.plain_text(), "hi <b>there</b>");
        let Block::Paragraph(inlines) = &fragment.blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(inlines.iter().all(|i| matches!(i, Inline::Text(_))));
    }

    #[test]
    fn html_block_is_literal_text() {
        let fragment = parse("<script>alert(1)</script>");
        assert_eq!(fragment.plain_text(), "<script>alert(1)</script>");
    }

    #[test]
    fn empty_input_is_empty_fragment() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n").is_empty());
    }
}
