//! # Content Renderer
//!
//! Turns a raw assistant reply into a [`DisplayFragment`]:
//!
//! ```text
//! raw ──► search::detect ──Some──► [Block::SearchResults]
//!              │
//!             None
//!              ▼
//!        markdown::parse ──► paragraphs, headings, lists, code, quotes
//! ```
//!
//! The result is a typed tree, never markup. The TUI maps it to styled spans,
//! `DisplayFragment::to_html()` maps it to escaped HTML.

pub mod fragment;
pub mod html;
pub mod markdown;
pub mod search;

pub use fragment::{Block, DisplayFragment, Inline, SearchResult, SearchResults};

pub fn render(raw: &str) -> DisplayFragment {
    match search::detect(raw) {
        Some(results) => DisplayFragment::new(vec![Block::SearchResults(results)]),
        None => markdown::parse(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_around_hi_only() {
        let fragment = render("**hi** there");
        assert_eq!(
            fragment.blocks,
            vec![Block::Paragraph(vec![
                Inline::Strong(vec![Inline::Text("hi".into())]),
                Inline::Text(" there".into()),
            ])]
        );
    }

    #[test]
    fn test_bad_search_payload_falls_back_to_text() {
        let raw = r#"{"type": "search_results", "title": "oops"}"#;
        let fragment = render(raw);
        assert!(matches!(fragment.blocks[0], Block::Paragraph(_)));
        assert_eq!(fragment.plain_text(), raw);
    }

    #[test]
    fn test_search_payload_becomes_single_block() {
        let raw = r#"{"type":"search_results","title":"T","results":[]}"#;
        let fragment = render(raw);
        assert_eq!(fragment.blocks.len(), 1);
        assert!(matches!(&fragment.blocks[0], Block::SearchResults(s) if s.title == "T"));
    }

    /// Inputs here carry no edge whitespace; see the test below for that case.
    #[test]
    fn test_plain_text_is_unchanged() {
        for input in [
            "hello world",
            "The answer is 42.",
            "line one\nline two",
            "Graph nodes: Alice, Bob",
        ] {
            assert_eq!(render(input).plain_text(), input);
        }
    }

    #[test]
    fn test_edge_whitespace_is_trimmed_like_commonmark() {
        // Up to three leading spaces and any trailing spaces belong to the
        // paragraph markup, not its text.
        assert_eq!(render("  indented start").plain_text(), "indented start");
        assert_eq!(render("trailing end   ").plain_text(), "trailing end");
        for input in ["  indented start", "trailing end   ", " both "] {
            assert_eq!(render(input).plain_text(), input.trim());
        }
    }

    #[test]
    fn test_paragraph_breaks_normalize_to_newline() {
        assert_eq!(render("first\n\nsecond").plain_text(), "first\nsecond");
    }
}
