//! Pattern rules for construct extraction
//!
//! Inline constructs are matched with `fancy_regex`, since the emphasis
//! rules need lookaround and backreferences. Line-anchored checks use the
//! plain `regex` engine. Every inline construct fits on one line, so
//! callers run these patterns a line at a time.

use fancy_regex::{Captures, Regex, RegexBuilder};
use tracing::warn;

use crate::error::{ConcealError, Result};

/// Backtracking budget for a single inline match attempt
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// `**bold**` or `__bold__`
const BOLD: &str = r"(\*{2}|_{2})((?=[^\s*_]).*?[^\s*_])(\1)";
/// `*italic*` or `_italic_`, not touching another delimiter
const ITALIC: &str = r"(?<![*_])(\*|_)((?=[^\s*_]).*?[^\s*_])(\1)(?![*_])";
/// `~~strike~~`, not part of a `~~~` run
const STRIKETHROUGH: &str = r"(?<!~)(~{2})((?=[^\s~]).*?[^\s~])(~{2})(?!~)";
/// `` `code` ``
const INLINE_CODE: &str = r"(`)((?=[^\s`]).*?[^\s`])(`)";
/// Opening fence at the end of a line, with an optional info word
const FENCE_OPEN: &str = r"(`{3}|~{3})[A-Za-z0-9_]*$";

/// `[title](url)` not preceded by `!`
const HYPERLINK: &str = r"(?<!!)\[([^\]\n]+)\]\(([^)\n]+)\)";
/// `![alt](url)`
const IMAGE: &str = r"!\[([^\]\n]*)\]\(([^)\n]+)\)";

/// List marker followed by a checkbox token
const CHECKBOX: &str = r"(?i)^[ \t]*(?:[-*+]|[0-9]+\.)[ \t]+(\[( |x)\])";
/// Link target with an explicit scheme
const URL_SCHEME: &str = r"(?i)^[a-z][a-z0-9+.-]*://";

/// Delimiter-pair constructs whose delimiters are hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    CodeFence,
}

impl Toggle {
    /// Toggles matched within a single line
    pub const INLINE: [Toggle; 4] = [
        Toggle::Bold,
        Toggle::Italic,
        Toggle::Strikethrough,
        Toggle::InlineCode,
    ];

    /// Name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Toggle::Bold => "bold",
            Toggle::Italic => "italic",
            Toggle::Strikethrough => "strikethrough",
            Toggle::InlineCode => "inline_code",
            Toggle::CodeFence => "code_fence",
        }
    }

    /// Inline pattern; fences are paired line by line instead
    fn pattern(&self) -> Option<&'static str> {
        match self {
            Toggle::Bold => Some(BOLD),
            Toggle::Italic => Some(ITALIC),
            Toggle::Strikethrough => Some(STRIKETHROUGH),
            Toggle::InlineCode => Some(INLINE_CODE),
            Toggle::CodeFence => None,
        }
    }

    /// Whether matched text is reset to the default foreground
    pub fn colors_body(&self) -> bool {
        matches!(self, Toggle::Bold | Toggle::Italic)
    }
}

/// A compiled inline toggle pattern
///
/// The first capture group is the opening delimiter, the last one the
/// closing delimiter.
pub struct SymmetricRule {
    pub toggle: Toggle,
    pub pattern: Regex,
}

impl SymmetricRule {
    /// Compile the rule for an inline toggle
    pub fn new(toggle: Toggle) -> Result<Self> {
        Self::with_backtrack_limit(toggle, DEFAULT_BACKTRACK_LIMIT)
    }

    /// Compile with a custom backtracking budget
    pub fn with_backtrack_limit(toggle: Toggle, limit: usize) -> Result<Self> {
        let pattern = toggle.pattern().ok_or_else(|| {
            ConcealError::Message(format!("{} has no inline pattern", toggle.name()))
        })?;
        Ok(Self {
            toggle,
            pattern: compile(pattern, limit)?,
        })
    }
}

/// Every pattern the engine needs, compiled once
pub struct Rules {
    pub inline: Vec<SymmetricRule>,
    pub fence_open: regex::Regex,
    pub hyperlink: Regex,
    pub image: Regex,
    pub checkbox: regex::Regex,
    pub url_scheme: regex::Regex,
}

impl Rules {
    /// Compile all rules
    pub fn new() -> Result<Self> {
        Self::with_backtrack_limit(DEFAULT_BACKTRACK_LIMIT)
    }

    /// Compile all rules with a custom backtracking budget
    pub fn with_backtrack_limit(limit: usize) -> Result<Self> {
        Ok(Self {
            inline: Toggle::INLINE
                .into_iter()
                .map(|toggle| SymmetricRule::with_backtrack_limit(toggle, limit))
                .collect::<Result<Vec<_>>>()?,
            fence_open: regex::Regex::new(FENCE_OPEN)?,
            hyperlink: compile(HYPERLINK, limit)?,
            image: compile(IMAGE, limit)?,
            checkbox: regex::Regex::new(CHECKBOX)?,
            url_scheme: regex::Regex::new(URL_SCHEME)?,
        })
    }
}

fn compile(pattern: &str, limit: usize) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).backtrack_limit(limit).build()?)
}

/// Successive non-overlapping matches of a pattern
///
/// The scan position is owned by the iterator, so nothing carries over
/// between scans. A match that fails at runtime (backtrack limit) is
/// logged and ends the scan of this text.
pub struct Matches<'r, 't> {
    pattern: &'r Regex,
    text: &'t str,
    pos: usize,
}

impl<'r, 't> Matches<'r, 't> {
    /// Scan `text` from the start
    pub fn new(pattern: &'r Regex, text: &'t str) -> Self {
        Self { pattern, text, pos: 0 }
    }

    fn step_past(&self, at: usize) -> usize {
        self.text[at..]
            .chars()
            .next()
            .map_or(self.text.len() + 1, |c| at + c.len_utf8())
    }
}

impl<'t> Iterator for Matches<'_, 't> {
    type Item = Captures<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos > self.text.len() {
            return None;
        }
        match self.pattern.captures_from_pos(self.text, self.pos) {
            Ok(Some(caps)) => {
                let whole = caps.get(0)?;
                self.pos = if whole.end() > whole.start() {
                    whole.end()
                } else {
                    self.step_past(whole.end())
                };
                Some(caps)
            }
            Ok(None) => {
                self.pos = self.text.len() + 1;
                None
            }
            Err(e) => {
                warn!(
                    pos = self.pos,
                    len = self.text.len(),
                    error = %e,
                    "pattern failed, skipping the rest of the line"
                );
                self.pos = self.text.len() + 1;
                None
            }
        }
    }
}
