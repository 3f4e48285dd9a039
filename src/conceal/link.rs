//! Inline links and images
//!
//! The bracket syntax and the `](url)` tail are hidden; the label stays
//! visible and an icon is anchored where the opening token was.

use fancy_regex::Regex;
use tracing::trace;

use super::rules::Matches;
use crate::document::{Range, TextDocument};
use crate::error::Result;
use crate::selection::Selection;

/// Hidden pieces of one link or image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMark {
    /// `[` or `![`, also the icon anchor
    pub opening: Range,
    /// `](url)`
    pub closing: Range,
}

/// Which inline construct a pattern matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `[title](url)`; the title may not be empty
    Hyperlink,
    /// `![alt](url)`; the alt text may be empty
    Image,
}

/// Scan for links or images line by line, skipping selected lines
pub fn extract<D: TextDocument + ?Sized>(
    doc: &D,
    selection: &Selection,
    pattern: &Regex,
    kind: LinkKind,
) -> Result<Vec<LinkMark>> {
    let mut marks = Vec::new();

    for number in 0..doc.line_count() {
        let line = doc.line_at(number)?;
        if selection.touches_lines_of(&line.range) {
            continue;
        }

        for caps in Matches::new(pattern, line.text) {
            let (Some(whole), Some(label), Some(_url)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                trace!(?kind, "link match without label or url group");
                continue;
            };
            if kind == LinkKind::Hyperlink && label.as_str().is_empty() {
                continue;
            }

            let spans = (
                line.range_between(whole.start(), label.start()),
                line.range_between(label.end(), whole.end()),
            );
            let (Some(opening), Some(closing)) = spans else {
                trace!(?kind, line = number, "unaddressable link");
                continue;
            };
            marks.push(LinkMark { opening, closing });
        }
    }

    Ok(marks)
}
