//! HTML emitter for [`DisplayFragment`].
//!
//! Every text node and attribute value is escaped, so a reply cannot inject
//! tags or scripts into whatever page embeds the output.

use super::fragment::{Block, DisplayFragment, Inline, SearchResults, VIEW_SOURCE_LABEL};

impl DisplayFragment {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_blocks(&mut out, &self.blocks);
        out
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only web and mail links become `href`s; anything else (`javascript:` and
/// friends) renders as plain text.
fn safe_url(url: &str) -> Option<String> {
    let lower = url.trim().to_ascii_lowercase();
    ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        .then(|| escape(url.trim()))
}

fn write_blocks(out: &mut String, blocks: &[Block]) {
    for block in blocks {
        write_block(out, block);
    }
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph(content) => {
            out.push_str("<p>");
            write_inlines(out, content);
            out.push_str("</p>");
        }
        Block::Heading { level, content } => {
            let level = (*level).clamp(1, 3);
            out.push_str(&format!("<h{level}>"));
            write_inlines(out, content);
            out.push_str(&format!("</h{level}>"));
        }
        Block::List { start, items } => {
            let tag = match start {
                Some(1) => {
                    out.push_str("<ol>");
                    "ol"
                }
                Some(n) => {
                    out.push_str(&format!("<ol start=\"{n}\">"));
                    "ol"
                }
                None => {
                    out.push_str("<ul>");
                    "ul"
                }
            };
            for item in items {
                out.push_str("<li>");
                write_blocks(out, item);
                out.push_str("</li>");
            }
            out.push_str(&format!("</{tag}>"));
        }
        Block::CodeBlock { lang, code } => {
            match lang {
                Some(lang) => out.push_str(&format!(
                    "<pre><code class=\"language-{}\">",
                    escape(lang)
                )),
                None => out.push_str("<pre><code>"),
            }
            out.push_str(&escape(code));
            out.push_str("</code></pre>");
        }
        Block::Quote(inner) => {
            out.push_str("<blockquote>");
            write_blocks(out, inner);
            out.push_str("</blockquote>");
        }
        Block::Rule => out.push_str("<hr>"),
        Block::SearchResults(search) => write_search(out, search),
    }
}

fn write_search(out: &mut String, search: &SearchResults) {
    out.push_str("<div class=\"search-results\">");
    out.push_str(&format!(
        "<div class=\"search-header\">{}</div>",
        escape(&search.title)
    ));
    for result in &search.results {
        out.push_str("<div class=\"search-result\">");
        out.push_str(&format!(
            "<div class=\"result-title\"><span class=\"result-number\">{}</span> {}</div>",
            result.number,
            escape(&result.title)
        ));
        out.push_str(&format!(
            "<div class=\"result-content\">{}</div>",
            escape(&result.content)
        ));
        if let Some(href) = result.url.as_deref().and_then(safe_url) {
            out.push_str(&format!(
                "<a class=\"result-link\" href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\">{VIEW_SOURCE_LABEL}</a>"
            ));
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
}

fn write_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(t) => out.push_str(&escape(t)),
            Inline::Strong(inner) => {
                out.push_str("<strong>");
                write_inlines(out, inner);
                out.push_str("</strong>");
            }
            Inline::Emphasis(inner) => {
                out.push_str("<em>");
                write_inlines(out, inner);
                out.push_str("</em>");
            }
            Inline::Code(c) => {
                out.push_str("<code>");
                out.push_str(&escape(c));
                out.push_str("</code>");
            }
            Inline::Link { url, content } => match safe_url(url) {
                Some(href) => {
                    out.push_str(&format!("<a href=\"{href}\">"));
                    write_inlines(out, content);
                    out.push_str("</a>");
                }
                None => write_inlines(out, content),
            },
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::render::render;

    #[test]
    fn test_bold_emits_strong() {
        assert_eq!(
            render("**hi** there").to_html(),
            "<p><strong>hi</strong> there</p>"
        );
    }

    #[test]
    fn test_script_is_escaped() {
        let html = render("<script>alert('x')</script>").to_html();
        assert!(!html.contains("<script>"), "got {html}");
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_inline_tags_are_escaped() {
        let html = render("click <img src=x onerror=alert(1)> now").to_html();
        assert!(!html.contains("<img"), "got {html}");
    }

    #[test]
    fn test_javascript_link_is_not_a_link() {
        let html = render("[bad](javascript:alert(1))").to_html();
        assert!(!html.contains("href"), "got {html}");
        assert!(html.contains("bad"));
    }

    #[test]
    fn test_search_results_markup() {
        let raw = r#"{"type":"search_results","title":"Top <hits>","results":[
            {"number":1,"title":"A & B","content":"body","url":"https://a.example/?q=1&r=2"},
            {"number":2,"title":"C","content":"no link"}
        ]}"#;
        let html = render(raw).to_html();
        assert!(html.contains("Top &lt;hits&gt;"));
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("href=\"https://a.example/?q=1&amp;r=2\""));
        assert_eq!(html.matches("view source").count(), 1);
    }

    #[test]
    fn test_headings_and_lists() {
        let html = render("#### Deep\n\n1. one\n2. two").to_html();
        assert!(html.starts_with("<h3>Deep</h3>"), "got {html}");
        assert!(html.contains("<ol><li><p>one</p></li><li><p>two</p></li></ol>"), "got {html}");
    }
}
