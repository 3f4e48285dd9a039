//! Overlap filter between hidden and styled ranges

use crate::document::{Position, Range};

/// Drop style ranges wholly contained in some hidden range
///
/// Hidden ranges are sorted by start; a candidate is contained in one of
/// them exactly when the furthest end among those starting at or before
/// it reaches past its own end.
pub fn retain_visible(candidates: Vec<Range>, hidden: &[Range]) -> Vec<Range> {
    let mut spans = hidden.to_vec();
    spans.sort();
    let reach: Vec<Position> = spans
        .iter()
        .scan(Position::default(), |furthest, span| {
            *furthest = (*furthest).max(span.end);
            Some(*furthest)
        })
        .collect();

    candidates
        .into_iter()
        .filter(|range| {
            let before = spans.partition_point(|span| span.start <= range.start);
            before == 0 || reach[before - 1] < range.end
        })
        .collect()
}
