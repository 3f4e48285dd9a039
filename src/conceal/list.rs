//! Unordered list markers and their nesting tier

use super::bucket::Bucket;
use crate::document::{Range, TextDocument};
use crate::error::Result;
use crate::selection::Selection;

/// Parsed unordered list marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    /// Byte length of the leading whitespace
    pub indent_len: usize,
    /// Indentation width with tabs expanded
    pub indent_width: usize,
    /// `-`, `*` or `+`
    pub marker: char,
}

impl ListMarker {
    /// Raw nesting level for a tab size
    pub fn level(&self, tab_size: usize) -> usize {
        self.indent_width / tab_size.max(1)
    }

    /// Display tier (0-3), cycling for deeper nesting
    pub fn tier(&self, tab_size: usize) -> usize {
        self.level(tab_size) % 4
    }
}

/// Parse a `-`, `*` or `+` marker followed by a space or tab
pub fn parse_marker(line: &str, tab_size: usize) -> Option<ListMarker> {
    let mut indent_len = 0;
    let mut indent_width: usize = 0;
    for c in line.chars() {
        match c {
            ' ' => indent_width += 1,
            '\t' => indent_width = indent_width.saturating_add(tab_size),
            _ => break,
        }
        indent_len += 1;
    }

    let mut rest = line[indent_len..].chars();
    let marker = rest.next().filter(|c| matches!(c, '-' | '*' | '+'))?;
    if !matches!(rest.next(), Some(' ') | Some('\t')) {
        return None;
    }
    Some(ListMarker {
        indent_len,
        indent_width,
        marker,
    })
}

/// Lines the list scanner never decorates
fn is_fence_line(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// A hidden marker and the tier bucket for its glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMark {
    pub range: Range,
    pub bucket: Bucket,
}

/// Scan every line for list markers
///
/// Checkbox lines are left to the checkbox scanner.
pub fn extract<D: TextDocument + ?Sized>(
    doc: &D,
    selection: &Selection,
    checkbox: &regex::Regex,
    tab_size: usize,
) -> Result<Vec<ListMark>> {
    let mut marks = Vec::new();

    for number in 0..doc.line_count() {
        let line = doc.line_at(number)?;
        if line.is_empty_or_whitespace || is_fence_line(line.text) {
            continue;
        }
        let Some(marker) = parse_marker(line.text, tab_size) else {
            continue;
        };
        if checkbox.is_match(line.text) || selection.touches_lines_of(&line.range) {
            continue;
        }

        // Indentation is spaces and tabs only: one UTF-16 unit each
        let start = marker.indent_len;
        marks.push(ListMark {
            range: Range::on_line(number, start, start + 1),
            bucket: Bucket::list_level(marker.tier(tab_size)),
        });
    }

    Ok(marks)
}
