//! Span engine
//!
//! Scans Markdown text and computes which ranges to hide and which to
//! restyle so an editor can show a rendered view over the raw source.
//! Constructs on lines touched by the selection are left raw so they can
//! be edited.
//!
//! Every call to [`Engine::recompute`] starts from scratch; the only state
//! kept between calls is the compiled patterns.

mod bucket;
mod checkbox;
mod filter;
mod heading;
mod link;
mod list;
pub(crate) mod rules;
mod symmetric;

use std::collections::BTreeMap;

use tracing::{debug, warn};

pub use bucket::{Bucket, DecorationPlan};
pub use checkbox::CheckboxState;
pub use rules::{Toggle, DEFAULT_BACKTRACK_LIMIT};

use crate::document::{Document, Range, TextDocument};
use crate::error::Result;
use crate::selection::Selection;
use link::LinkKind;
use rules::Rules;

/// Tab width used when the host has none, or an unusable one
pub const DEFAULT_TAB_SIZE: usize = 2;

/// Widest tab honoured; larger values are capped
pub const MAX_TAB_SIZE: usize = 16;

/// Tab width to compute list levels with
///
/// Zero falls back to the default and anything above [`MAX_TAB_SIZE`] is
/// capped.
pub fn effective_tab_size(tab_size: usize) -> usize {
    match tab_size {
        0 => DEFAULT_TAB_SIZE,
        n => n.min(MAX_TAB_SIZE),
    }
}

/// Compiled extractors
pub struct Engine {
    rules: Rules,
}

impl Engine {
    /// Compile every pattern
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: Rules::new()?,
        })
    }

    /// Compile every pattern with a custom backtracking budget per match
    ///
    /// A line whose match runs out of budget is left undecorated by that
    /// rule.
    pub fn with_backtrack_limit(limit: usize) -> Result<Self> {
        Ok(Self {
            rules: Rules::with_backtrack_limit(limit)?,
        })
    }

    pub(crate) fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Compute the full decoration plan for a document
    ///
    /// Extractors run independently: one that fails is logged and
    /// contributes nothing, the rest still fill their buckets.
    pub fn recompute<D: TextDocument + ?Sized>(
        &self,
        doc: &D,
        selection: &Selection,
        tab_size: usize,
    ) -> DecorationPlan {
        let tab_size = effective_tab_size(tab_size);
        let mut plan = DecorationPlan::new();
        let mut styles: BTreeMap<Bucket, Vec<Range>> = BTreeMap::new();

        let toggles = self
            .rules
            .inline
            .iter()
            .map(|rule| (rule.toggle, symmetric::extract(doc, selection, rule)))
            .chain(std::iter::once((
                Toggle::CodeFence,
                symmetric::extract_fences(doc, selection, &self.rules.fence_open),
            )));
        for (toggle, result) in toggles {
            let Some(found) = report(toggle.name(), result) else {
                continue;
            };
            for m in &found {
                plan.push(Bucket::Hidden, m.opening);
                plan.push(Bucket::Hidden, m.closing);
            }
            if toggle.colors_body() {
                styles
                    .entry(Bucket::DefaultColor)
                    .or_default()
                    .extend(found.iter().map(|m| m.full));
            }
        }

        if let Some(headings) = report("heading", heading::extract(doc, selection)) {
            plan.extend(Bucket::Hidden, headings.hidden);
            styles
                .entry(Bucket::DefaultColor)
                .or_default()
                .extend(headings.lines);
            for (bucket, range) in headings.sized {
                styles.entry(bucket).or_default().push(range);
            }
        }

        let link_scans = [
            (&self.rules.hyperlink, LinkKind::Hyperlink, Bucket::HyperlinkIcon),
            (&self.rules.image, LinkKind::Image, Bucket::ImageIcon),
        ];
        for (pattern, kind, icon) in link_scans {
            let name = match kind {
                LinkKind::Hyperlink => "hyperlink",
                LinkKind::Image => "image",
            };
            if let Some(marks) = report(name, link::extract(doc, selection, pattern, kind)) {
                for mark in marks {
                    plan.push(Bucket::Hidden, mark.opening);
                    plan.push(Bucket::Hidden, mark.closing);
                    plan.push(icon, mark.opening);
                }
            }
        }

        if let Some(marks) = report(
            "checkbox",
            checkbox::extract(doc, selection, &self.rules.checkbox),
        ) {
            for mark in marks {
                let bucket = match mark.state {
                    CheckboxState::Unchecked => Bucket::CheckboxUnchecked,
                    CheckboxState::Checked => Bucket::CheckboxChecked,
                };
                plan.push(bucket, mark.range);
                plan.push(Bucket::Hidden, mark.range);
            }
        }

        if let Some(marks) = report(
            "list",
            list::extract(doc, selection, &self.rules.checkbox, tab_size),
        ) {
            for mark in marks {
                plan.push(Bucket::Hidden, mark.range);
                plan.push(mark.bucket, mark.range);
            }
        }

        let hidden = plan.get(Bucket::Hidden).to_vec();
        for (bucket, candidates) in styles {
            plan.set(bucket, filter::retain_visible(candidates, &hidden));
        }

        debug!(
            hidden = hidden.len(),
            styled = plan.get(Bucket::DefaultColor).len(),
            total = plan.len(),
            "decoration plan recomputed"
        );
        plan
    }
}

/// Compute a plan for a string, compiling the patterns on the spot
///
/// Hosts calling this per keystroke should hold an [`Engine`] instead.
pub fn recompute(text: &str, selection: &Selection, tab_size: usize) -> Result<DecorationPlan> {
    let engine = Engine::new()?;
    Ok(engine.recompute(&Document::new(text), selection, tab_size))
}

/// Log a failed extractor and carry on without it
fn report<T>(extractor: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(extractor, error = %e, "extractor failed, leaving its constructs raw");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::document::{Document, Position};

    const SAMPLE: &str = "# Title\n\
\n\
Some **bold** and *it* text with `code` and ~~old~~.\n\
\n\
- item\n  - nested\n- [x] done\n\
\n\
[link](http://a.b) ![img](i.png)\n\
\n\
```sh\necho hi\n```\n";

    fn plan_for(text: &str, selection: &Selection, tab_size: usize) -> DecorationPlan {
        Engine::new()
            .unwrap()
            .recompute(&Document::new(text), selection, tab_size)
    }

    /// Each line with its hidden columns removed
    fn visible_lines(text: &str, plan: &DecorationPlan) -> Vec<String> {
        let doc = Document::new(text);
        (0..doc.line_count())
            .map(|n| {
                let line = doc.line_at(n).unwrap();
                let cuts: Vec<_> = plan
                    .get(Bucket::Hidden)
                    .iter()
                    .filter(|r| r.start.line == n)
                    .collect();
                let mut out = String::new();
                let mut col = 0;
                for ch in line.text.chars() {
                    if !cuts.iter().any(|r| col >= r.start.character && col < r.end.character) {
                        out.push(ch);
                    }
                    col += ch.len_utf16();
                }
                out
            })
            .collect()
    }

    #[test]
    fn test_bold_scenario() {
        let plan = plan_for("**hello**", &Selection::none(), 2);
        assert_eq!(
            plan.get(Bucket::Hidden),
            &[Range::on_line(0, 0, 2), Range::on_line(0, 7, 9)]
        );
        assert_eq!(plan.get(Bucket::DefaultColor), &[Range::on_line(0, 0, 9)]);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_checkbox_scenario() {
        let plan = plan_for("- [ ] task", &Selection::none(), 2);
        assert_eq!(plan.get(Bucket::Hidden), &[Range::on_line(0, 0, 5)]);
        assert_eq!(plan.get(Bucket::CheckboxUnchecked), &[Range::on_line(0, 0, 5)]);
        for tier in 0..4 {
            assert!(plan.get(Bucket::list_level(tier)).is_empty());
        }
    }

    #[test]
    fn test_hyperlink_scenario() {
        let text = "[title](http://example.com)";
        let plan = plan_for(text, &Selection::none(), 2);
        assert_eq!(
            plan.get(Bucket::Hidden),
            &[Range::on_line(0, 0, 1), Range::on_line(0, 6, 27)]
        );
        assert_eq!(plan.get(Bucket::HyperlinkIcon), &[Range::on_line(0, 0, 1)]);
        assert_eq!(visible_lines(text, &plan), vec!["title"]);
    }

    #[test]
    fn test_selected_heading_scenario() {
        let plan = plan_for("# Heading", &Selection::caret(Position::new(0, 4)), 2);
        assert!(plan.is_empty());

        let plan = plan_for("# Heading", &Selection::none(), 2);
        assert_eq!(plan.get(Bucket::Hidden), &[Range::on_line(0, 0, 2)]);
        assert_eq!(plan.get(Bucket::DefaultColor), &[Range::on_line(0, 0, 9)]);
        assert_eq!(plan.get(Bucket::HeadingXxl), &[Range::on_line(0, 0, 9)]);
    }

    #[test]
    fn test_nested_list_scenario() {
        let plan = plan_for("    - a", &Selection::none(), 2);
        assert_eq!(plan.get(Bucket::ListLevel2), &[Range::on_line(0, 4, 5)]);
        assert_eq!(plan.get(Bucket::Hidden), &[Range::on_line(0, 4, 5)]);
    }

    #[test]
    fn test_unterminated_fence_scenario() {
        let plan = plan_for("```rust\nlet x = 1;\nno close", &Selection::none(), 2);
        assert!(plan.get(Bucket::Hidden).is_empty());
    }

    #[test]
    fn test_bare_heading_marker_is_not_styled() {
        let plan = plan_for("#", &Selection::none(), 2);
        assert_eq!(plan.get(Bucket::Hidden), &[Range::on_line(0, 0, 1)]);
        assert!(plan.get(Bucket::DefaultColor).is_empty());
        assert!(plan.get(Bucket::HeadingXxl).is_empty());
    }

    #[test]
    fn test_zero_tab_size_uses_default() {
        let plan = plan_for("  - a", &Selection::none(), 0);
        assert_eq!(plan.get(Bucket::ListLevel1).len(), 1);
        let plan = plan_for("  - a", &Selection::none(), 4);
        assert_eq!(plan.get(Bucket::ListLevel0).len(), 1);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let engine = Engine::new().unwrap();
        let doc = Document::new(SAMPLE);
        let sel = Selection::caret(Position::new(4, 1));
        assert_eq!(engine.recompute(&doc, &sel, 2), engine.recompute(&doc, &sel, 2));
    }

    #[test]
    fn test_styles_never_inside_hidden() {
        let plan = plan_for(SAMPLE, &Selection::none(), 2);
        let hidden = plan.get(Bucket::Hidden);
        for (bucket, ranges) in plan.iter().filter(|(b, _)| b.is_text_style()) {
            for range in ranges {
                assert!(
                    !hidden.iter().any(|h| h.contains(range)),
                    "{} range {} is hidden",
                    bucket.name(),
                    range
                );
            }
        }
    }

    #[test]
    fn test_hidden_ranges_stay_on_one_line() {
        let plan = plan_for(SAMPLE, &Selection::none(), 2);
        assert!(plan.get(Bucket::Hidden).iter().all(Range::is_single_line));
    }

    #[test]
    fn test_visible_text_keeps_line_structure() {
        let plan = plan_for(SAMPLE, &Selection::none(), 2);
        assert_eq!(
            visible_lines(SAMPLE, &plan),
            vec![
                "Title",
                "",
                "Some bold and it text with code and old.",
                "",
                " item",
                "   nested",
                " done",
                "",
                "link img",
                "",
                "",
                "echo hi",
                "",
                "",
            ]
        );
    }

    #[test]
    fn test_selection_reveals_only_touched_lines() {
        let engine = Engine::new().unwrap();
        let doc = Document::new(SAMPLE);
        for line in 0..doc.line_count() {
            let plan = engine.recompute(&doc, &Selection::caret(Position::new(line, 0)), 2);
            for (bucket, ranges) in plan.iter() {
                assert!(
                    ranges.iter().all(|r| !r.shares_line_with(&Range::on_line(line, 0, 0))),
                    "{} decorates selected line {}",
                    bucket.name(),
                    line
                );
            }
        }
    }

    #[test]
    fn test_selected_line_keeps_others_decorated() {
        let plan = plan_for(SAMPLE, &Selection::caret(Position::new(2, 0)), 2);
        assert_eq!(visible_lines(SAMPLE, &plan)[2], "Some **bold** and *it* text with `code` and ~~old~~.");
        assert_eq!(visible_lines(SAMPLE, &plan)[0], "Title");
        assert!(!plan.get(Bucket::HyperlinkIcon).is_empty());
    }

    #[test]
    fn test_free_recompute() {
        let plan = recompute("~~x~~", &Selection::none(), 2).unwrap();
        assert_eq!(plan.get(Bucket::Hidden).len(), 2);
        assert!(plan.get(Bucket::DefaultColor).is_empty());
    }

    #[test]
    fn test_huge_tab_size_is_capped() {
        assert_eq!(effective_tab_size(usize::MAX), MAX_TAB_SIZE);
        assert_eq!(effective_tab_size(4), 4);
        let plan = plan_for("\t\t- a", &Selection::none(), usize::MAX);
        assert_eq!(plan.get(Bucket::ListLevel2), &[Range::on_line(0, 2, 3)]);
    }

    #[test]
    fn test_large_document_finishes() {
        let mut text = "some text here\n".repeat(36_000);
        text.push_str(&"word ".repeat(110_000));
        text.push_str("\n**end** and *it*\n");
        assert!(text.len() > 500_000);

        let started = Instant::now();
        let plan = plan_for(&text, &Selection::none(), 2);
        assert!(started.elapsed() < Duration::from_secs(60));

        let last = 36_001;
        assert_eq!(
            plan.get(Bucket::Hidden),
            &[
                Range::on_line(last, 0, 2),
                Range::on_line(last, 5, 7),
                Range::on_line(last, 12, 13),
                Range::on_line(last, 15, 16),
            ]
        );
    }

    #[test]
    fn test_exhausted_backtracking_keeps_other_extractors() {
        let engine = Engine::with_backtrack_limit(0).unwrap();
        let text = "# Title\n- [ ] task\n  - item\nsee **b** and ![i](p.png)\n```\ncode\n```\n";
        let plan = engine.recompute(&Document::new(text), &Selection::none(), 2);

        assert_eq!(plan.get(Bucket::HeadingXxl), &[Range::on_line(0, 0, 7)]);
        assert_eq!(plan.get(Bucket::CheckboxUnchecked).len(), 1);
        assert_eq!(plan.get(Bucket::ListLevel1), &[Range::on_line(2, 2, 3)]);
        assert_eq!(plan.get(Bucket::ImageIcon), &[Range::on_line(3, 14, 16)]);

        let hidden = plan.get(Bucket::Hidden);
        // The bold pair ran out of budget and stays raw
        assert!(!hidden.contains(&Range::on_line(3, 4, 6)));
        // Fences pair without backtracking
        assert!(hidden.contains(&Range::on_line(4, 0, 3)));
        assert!(hidden.contains(&Range::on_line(6, 0, 3)));
    }
}
