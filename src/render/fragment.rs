//! Typed display nodes.
//!
//! A reply is never carried around as markup. Every front-end walks this tree
//! and decides for itself how each node looks, so text content stays text.

/// Rendered form of one assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayFragment {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// Level is always 1..=3.
    Heading { level: u8, content: Vec<Inline> },
    /// `start` is `None` for bullet lists, the first ordinal otherwise.
    List { start: Option<u64>, items: Vec<Vec<Block>> },
    CodeBlock { lang: Option<String>, code: String },
    Quote(Vec<Block>),
    Rule,
    SearchResults(SearchResults),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Code(String),
    Link { url: String, content: Vec<Inline> },
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub title: String,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SearchResult {
    pub number: u32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
}

pub const VIEW_SOURCE_LABEL: &str = "view source";

impl DisplayFragment {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Concatenated text with one `\n` between blocks and at line breaks.
    pub fn plain_text(&self) -> String {
        blocks_text(&self.blocks)
    }
}

fn blocks_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(block_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn block_text(block: &Block) -> String {
    match block {
        Block::Paragraph(content) | Block::Heading { content, .. } => inlines_text(content),
        Block::List { items, .. } => items
            .iter()
            .map(|item| blocks_text(item))
            .collect::<Vec<_>>()
            .join("\n"),
        Block::CodeBlock { code, .. } => code.clone(),
        Block::Quote(inner) => blocks_text(inner),
        Block::Rule => String::new(),
        Block::SearchResults(search) => {
            let mut lines = vec![search.title.clone()];
            for result in &search.results {
                lines.push(format!("{}. {}", result.number, result.title));
                lines.push(result.content.clone());
                if let Some(url) = &result.url {
                    lines.push(url.clone());
                }
            }
            lines.join("\n")
        }
    }
}

pub(crate) fn inlines_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) | Inline::Code(t) => out.push_str(t),
            Inline::Strong(inner) | Inline::Emphasis(inner) => out.push_str(&inlines_text(inner)),
            Inline::Link { content, .. } => out.push_str(&inlines_text(content)),
            Inline::LineBreak => out.push('\n'),
        }
    }
    out
}

/// Appends text, merging with a trailing text node.
pub(crate) fn push_text(inlines: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = inlines.last_mut() {
        last.push_str(text);
    } else {
        inlines.push(Inline::Text(text.to_string()));
    }
}
