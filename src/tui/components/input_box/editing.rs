//! Buffer geometry and cursor movement for the InputBox.
//!
//! Stateless helpers over `(text, byte offset)`. Wrapping is done per logical
//! line so an empty line (or a trailing `\n`) always occupies a row.

use unicode_width::UnicodeWidthStr;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Rows shown before the box scrolls internally
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + left padding)
pub(super) const CONTENT_OFFSET: u16 = 2;

pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Rows of one logical line (no `\n` inside) at `width`.
fn wrap_line(line: &str, width: u16) -> Vec<String> {
    let rows: Vec<String> = textwrap::wrap(line, wrap_options(width))
        .into_iter()
        .map(|row| row.into_owned())
        .collect();
    if rows.is_empty() { vec![String::new()] } else { rows }
}

/// Every display row of `text` at `width`.
pub(super) fn wrapped_rows(text: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    text.split('\n').flat_map(|line| wrap_line(line, width)).collect()
}

/// Row and column counts saturate: a huge paste pins at `u16::MAX`.
fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

pub(super) fn row_count(text: &str, width: u16) -> u16 {
    saturating_u16(wrapped_rows(text, width).len().max(1))
}

/// Display `(row, column)` of the byte offset `cursor`.
pub(super) fn cursor_position(text: &str, cursor: usize, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let before = &text[..cursor];
    let mut lines = before.split('\n').peekable();
    let mut row = 0u16;
    let mut col = 0u16;
    while let Some(line) = lines.next() {
        let rows = wrap_line(line, width);
        if lines.peek().is_some() {
            row = row.saturating_add(saturating_u16(rows.len()));
            continue;
        }
        row = row.saturating_add(saturating_u16(rows.len() - 1));
        // textwrap drops the spaces it breaks on, so measure from the raw line
        let shown: usize = rows[..rows.len() - 1].iter().map(|r| r.width()).sum();
        col = saturating_u16(line.width().saturating_sub(shown)).min(width);
    }
    (row, col)
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// readline `backward-word`: skip separators, then the word before them.
pub(super) fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let before = &text[..pos];
    let trimmed = before.trim_end_matches(|c: char| !is_word_char(c));
    trimmed
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// readline `forward-word`: skip separators, then the word after them.
pub(super) fn next_word_boundary(text: &str, pos: usize) -> usize {
    let after = &text[pos..];
    let skipped = after.len() - after.trim_start_matches(|c: char| !is_word_char(c)).len();
    let rest = &after[skipped..];
    let word_len = rest
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(rest.len(), |(i, _)| i);
    pos + skipped + word_len
}

/// Start of the logical line containing `pos`.
pub(super) fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// End of the logical line containing `pos`.
pub(super) fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}
