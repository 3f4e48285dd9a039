//! Task list checkboxes

use tracing::trace;

use crate::document::{Range, TextDocument};
use crate::error::Result;
use crate::selection::Selection;

/// Recognised checkbox states
///
/// Only `[ ]` and `[x]` are matched; no other notation is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckboxState {
    Unchecked,
    Checked,
}

impl CheckboxState {
    /// Classify a `[?]` token
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("[ ]") {
            CheckboxState::Unchecked
        } else {
            CheckboxState::Checked
        }
    }
}

/// A list marker plus checkbox, e.g. `- [ ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxMark {
    pub range: Range,
    pub state: CheckboxState,
}

/// Scan every line for checkboxes, skipping selected lines
pub fn extract<D: TextDocument + ?Sized>(
    doc: &D,
    selection: &Selection,
    pattern: &regex::Regex,
) -> Result<Vec<CheckboxMark>> {
    let mut marks = Vec::new();

    for number in 0..doc.line_count() {
        let line = doc.line_at(number)?;
        let Some(caps) = pattern.captures(line.text) else {
            continue;
        };
        let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
            trace!(line = number, "checkbox match without token group");
            continue;
        };

        let matched = whole.as_str();
        let Some(content_start) = matched.find(|c: char| c != ' ' && c != '\t') else {
            continue;
        };
        // The match is ASCII, so byte columns are UTF-16 columns
        let range = Range::on_line(number, content_start, whole.end());
        if selection.touches_lines_of(&range) {
            continue;
        }

        marks.push(CheckboxMark {
            range,
            state: CheckboxState::from_token(token.as_str()),
        });
    }

    Ok(marks)
}
