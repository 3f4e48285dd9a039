//! ATX headings

use super::bucket::Bucket;
use crate::document::{utf16_len, Range, TextDocument};
use crate::error::Result;
use crate::selection::Selection;

/// Parsed `#` marker at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMarker {
    /// Number of `#` characters (1-6)
    pub level: usize,
    /// Byte length of indentation, marks and the first following blank
    pub prefix_len: usize,
}

/// Parse a heading marker from a line (without terminator)
///
/// Accepts `[ \t]*#{1,6}` followed by a space, a tab or the end of the
/// line. Seven or more marks are not a heading.
pub fn parse_marker(line: &str) -> Option<HeadingMarker> {
    let bytes = line.as_bytes();
    let indent = bytes.iter().take_while(|&&b| b == b' ' || b == b'\t').count();
    let level = bytes[indent..].iter().take_while(|&&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let after = indent + level;
    let prefix_len = match bytes.get(after) {
        None => after,
        Some(b' ') | Some(b'\t') => after + 1,
        Some(_) => return None,
    };
    Some(HeadingMarker { level, prefix_len })
}

/// Ranges contributed by headings
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HeadingRanges {
    /// Marker prefixes to hide
    pub hidden: Vec<Range>,
    /// Whole heading lines, candidates for the default color
    pub lines: Vec<Range>,
    /// Whole heading lines per size tier
    pub sized: Vec<(Bucket, Range)>,
}

/// Scan every line for headings, skipping selected lines
pub fn extract<D: TextDocument + ?Sized>(doc: &D, selection: &Selection) -> Result<HeadingRanges> {
    let mut ranges = HeadingRanges::default();

    for number in 0..doc.line_count() {
        let line = doc.line_at(number)?;
        let Some(marker) = parse_marker(line.text) else {
            continue;
        };
        if selection.touches_lines_of(&line.range) {
            continue;
        }

        // The prefix is ASCII, so its byte length is its UTF-16 length
        let prefix_end = utf16_len(&line.text[..marker.prefix_len]);
        ranges.hidden.push(Range::on_line(number, 0, prefix_end));
        ranges.lines.push(line.range);
        if let Some(bucket) = Bucket::heading_size(marker.level) {
            ranges.sized.push((bucket, line.range));
        }
    }

    Ok(ranges)
}
