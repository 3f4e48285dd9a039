//! Caret and selection sets

use crate::document::{Position, Range};

/// Zero or more selected ranges; empty ranges are carets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<Range>,
}

impl Selection {
    /// Create a selection from ranges
    pub fn new(ranges: Vec<Range>) -> Self {
        Self { ranges }
    }

    /// No selection at all; every construct is decorated
    pub fn none() -> Self {
        Self::default()
    }

    /// A single caret
    pub fn caret(position: Position) -> Self {
        Self::new(vec![Range::caret(position)])
    }

    /// Selected ranges
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// Check if there are no selections
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Check if any selection touches a line that `range` spans
    ///
    /// Constructs on such lines are shown as raw syntax so they can be
    /// edited.
    pub fn touches_lines_of(&self, range: &Range) -> bool {
        self.ranges.iter().any(|s| range.shares_line_with(s))
    }
}

impl From<Vec<Range>> for Selection {
    fn from(ranges: Vec<Range>) -> Self {
        Self::new(ranges)
    }
}
