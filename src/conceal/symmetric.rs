//! Delimiter-pair constructs: emphasis, strikethrough and code
//!
//! Only the delimiters are hidden; the body between them stays visible.

use tracing::trace;

use super::rules::{Matches, SymmetricRule};
use crate::document::{Line, Range, TextDocument};
use crate::error::Result;
use crate::selection::Selection;

/// One matched delimiter pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleMatch {
    /// Opening delimiter (for fences, the opening fence token)
    pub opening: Range,
    /// Closing delimiter (for fences, the closing fence line)
    pub closing: Range,
    /// Whole construct, delimiters included
    pub full: Range,
}

/// Find every pair for an inline rule, leaving out selected lines
pub fn extract<D: TextDocument + ?Sized>(
    doc: &D,
    selection: &Selection,
    rule: &SymmetricRule,
) -> Result<Vec<ToggleMatch>> {
    let mut found = Vec::new();

    for number in 0..doc.line_count() {
        let line = doc.line_at(number)?;
        if selection.touches_lines_of(&line.range) {
            continue;
        }

        for caps in Matches::new(&rule.pattern, line.text) {
            let (Some(whole), Some(open), Some(close)) =
                (caps.get(0), caps.get(1), caps.get(caps.len() - 1))
            else {
                trace!(rule = rule.toggle.name(), "match without delimiter groups");
                continue;
            };

            let spans = (
                line.range_between(whole.start(), whole.end()),
                line.range_between(open.start(), open.end()),
                line.range_between(close.start(), close.end()),
            );
            let (Some(full), Some(opening), Some(closing)) = spans else {
                trace!(rule = rule.toggle.name(), line = number, "unaddressable match");
                continue;
            };
            found.push(ToggleMatch {
                opening,
                closing,
                full,
            });
        }
    }

    Ok(found)
}

/// Pair fenced code blocks, leaving out blocks that touch a selected line
///
/// A fence opens at three backticks or tildes ending a line, optionally
/// followed by an info word, and closes at the next line holding exactly
/// the same three characters. An opening with no closing line is left raw.
pub fn extract_fences<D: TextDocument + ?Sized>(
    doc: &D,
    selection: &Selection,
    fence_open: &regex::Regex,
) -> Result<Vec<ToggleMatch>> {
    let lines = (0..doc.line_count())
        .map(|n| doc.line_at(n))
        .collect::<Result<Vec<_>>>()?;
    let backticks = closing_lines(&lines, "```");
    let tildes = closing_lines(&lines, "~~~");

    let mut found = Vec::new();
    let mut number = 0;
    while number < lines.len() {
        let line = &lines[number];
        number += 1;

        let Some(caps) = fence_open.captures(line.text) else {
            continue;
        };
        let (Some(whole), Some(fence)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let closers = if fence.as_str().starts_with('`') {
            &backticks
        } else {
            &tildes
        };
        let next = closers.partition_point(|&n| n <= line.number);
        let Some(&close_number) = closers.get(next) else {
            trace!(line = line.number, "unterminated fence");
            continue;
        };
        number = close_number + 1;

        let Some(opening) = line.range_between(whole.start(), whole.end()) else {
            continue;
        };
        let closing = lines[close_number].range;
        let full = Range::new(opening.start, closing.end);
        if selection.touches_lines_of(&full) {
            continue;
        }
        found.push(ToggleMatch {
            opening,
            closing,
            full,
        });
    }

    Ok(found)
}

/// Numbers of the lines consisting of exactly `fence`, ascending
fn closing_lines(lines: &[Line<'_>], fence: &str) -> Vec<usize> {
    lines
        .iter()
        .filter(|line| line.text == fence)
        .map(|line| line.number)
        .collect()
}
