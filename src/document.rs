//! Document addressing: positions, ranges and line access
//!
//! Offsets handed around inside the engine are byte offsets into the
//! document text. Positions exposed to hosts use UTF-16 columns, which is
//! what editor front ends count in.

use std::fmt;

use crate::error::{ConcealError, Result};

/// A (line, column) location; the column counts UTF-16 code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based line number
    pub line: usize,
    /// Zero-based UTF-16 column within the line
    pub character: usize,
}

impl Position {
    /// Create a new position
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// A half-open span between two positions (start <= end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range, swapping the endpoints if they are reversed
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Range on a single line between two columns
    pub fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self::new(Position::new(line, start), Position::new(line, end))
    }

    /// Empty range at a position (a caret)
    pub fn caret(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Check if the range covers no characters
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if both endpoints are on the same line
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Check if `other` lies entirely inside this range
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if a position lies inside this range (end inclusive)
    pub fn contains_position(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Check if the line spans of two ranges overlap
    pub fn shares_line_with(&self, other: &Range) -> bool {
        !(self.end.line < other.start.line || self.start.line > other.end.line)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One line of a document, as handed to line-oriented scanners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Zero-based line number
    pub number: usize,
    /// Line content without its terminator
    pub text: &'a str,
    /// Range from column 0 to the end of the content
    pub range: Range,
    /// Whether the line holds only spaces and tabs (or nothing)
    pub is_empty_or_whitespace: bool,
}

impl Line<'_> {
    /// Position of a byte offset into the line content
    pub fn position_at(&self, offset: usize) -> Option<Position> {
        if offset > self.text.len() || !self.text.is_char_boundary(offset) {
            return None;
        }
        Some(Position::new(self.number, utf16_len(&self.text[..offset])))
    }

    /// Range between two byte offsets into the line content
    pub fn range_between(&self, start: usize, end: usize) -> Option<Range> {
        Some(Range::new(self.position_at(start)?, self.position_at(end)?))
    }
}

/// Text and addressing model supplied by the host editor
pub trait TextDocument {
    /// Full document content
    fn text(&self) -> &str;

    /// Convert a byte offset into a position
    fn position_at(&self, offset: usize) -> Result<Position>;

    /// Number of lines (a trailing newline starts one more, empty line)
    fn line_count(&self) -> usize;

    /// Line accessor for line-oriented scanning
    fn line_at(&self, line: usize) -> Result<Line<'_>>;

    /// Range between two byte offsets
    fn range_between(&self, start: usize, end: usize) -> Result<Range> {
        Ok(Range::new(self.position_at(start)?, self.position_at(end)?))
    }
}

/// In-memory document over a borrowed string
#[derive(Debug, Clone)]
pub struct Document<'a> {
    text: &'a str,
    /// Byte offset where each line starts
    line_starts: Vec<usize>,
}

impl<'a> Document<'a> {
    /// Index the line starts of `text`
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    /// Byte span of a line's content, terminator excluded
    fn line_span(&self, line: usize) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line)?;
        let mut end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Some((start, end))
    }
}

impl TextDocument for Document<'_> {
    fn text(&self) -> &str {
        self.text
    }

    fn position_at(&self, offset: usize) -> Result<Position> {
        if offset > self.text.len() || !self.text.is_char_boundary(offset) {
            return Err(ConcealError::OffsetOutOfRange {
                offset,
                len: self.text.len(),
            });
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        Ok(Position::new(line, utf16_len(&self.text[start..offset])))
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_at(&self, line: usize) -> Result<Line<'_>> {
        let (start, end) = self.line_span(line).ok_or(ConcealError::LineOutOfRange {
            line,
            count: self.line_count(),
        })?;
        let text = &self.text[start..end];
        Ok(Line {
            number: line,
            text,
            range: Range::on_line(line, 0, utf16_len(text)),
            is_empty_or_whitespace: text.chars().all(|c| c == ' ' || c == '\t'),
        })
    }
}

/// Length of a string in UTF-16 code units
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}
