//! Terminal preview of a decoration plan
//!
//! A small host for the engine: hidden ranges are dropped, icon buckets
//! become glyphs, and heading tiers are drawn bold with a rule underneath
//! since a terminal cannot change font size.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{Color, ContentStyle, Print, PrintStyledContent, StyledContent, Stylize};
use unicode_width::UnicodeWidthStr;

use crate::conceal::{Bucket, DecorationPlan};
use crate::document::{Position, Range, TextDocument};
use crate::error::Result;

/// How a run of text is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    Plain,
    DefaultColor,
    /// Heading text in one of the size tiers
    Heading(Bucket),
    /// Glyph standing in for hidden syntax
    Icon(Bucket),
}

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

/// One rendered document line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedLine {
    pub segments: Vec<Segment>,
    /// Underline drawn below large headings
    pub rule: Option<String>,
}

impl RenderedLine {
    /// Visible text without styling
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn push(&mut self, ch: char, style: SegmentStyle) {
        match self.segments.last_mut() {
            Some(last) if last.style == style => last.text.push(ch),
            _ => self.segments.push(Segment {
                text: ch.to_string(),
                style,
            }),
        }
    }
}

/// Glyph drawn at the start of an icon bucket's range
pub fn glyph(bucket: Bucket) -> Option<char> {
    match bucket {
        Bucket::CheckboxUnchecked => Some('☐'),
        Bucket::CheckboxChecked => Some('☑'),
        Bucket::HyperlinkIcon => Some('↗'),
        Bucket::ImageIcon => Some('▣'),
        Bucket::ListLevel0 => Some('●'),
        Bucket::ListLevel1 => Some('○'),
        Bucket::ListLevel2 => Some('◆'),
        Bucket::ListLevel3 => Some('◇'),
        _ => None,
    }
}

/// Lay out every line of a document under a plan
pub fn render_lines<D: TextDocument + ?Sized>(
    doc: &D,
    plan: &DecorationPlan,
) -> Result<Vec<RenderedLine>> {
    let count = doc.line_count();
    let mut by_line: Vec<Vec<(Bucket, Range)>> = vec![Vec::new(); count];
    for (bucket, ranges) in plan.iter() {
        for range in ranges {
            let last = range.end.line.min(count.saturating_sub(1));
            for slot in by_line.iter_mut().take(last + 1).skip(range.start.line) {
                slot.push((bucket, *range));
            }
        }
    }

    let mut lines = Vec::with_capacity(count);
    for (number, decorations) in by_line.iter().enumerate() {
        let line = doc.line_at(number)?;
        let on_line = |bucket: Bucket| -> Vec<Range> {
            decorations
                .iter()
                .filter(|(b, _)| *b == bucket)
                .map(|(_, r)| *r)
                .collect()
        };

        let hidden = on_line(Bucket::Hidden);
        let default_color = on_line(Bucket::DefaultColor);
        let sized: Vec<(Bucket, Vec<Range>)> = [Bucket::HeadingXxl, Bucket::HeadingXl, Bucket::HeadingL]
            .into_iter()
            .map(|b| (b, on_line(b)))
            .collect();
        let mut anchors: Vec<(usize, Bucket)> = decorations
            .iter()
            .filter(|(b, r)| glyph(*b).is_some() && r.start.line == number)
            .map(|(b, r)| (r.start.character, *b))
            .collect();
        anchors.sort_by_key(|(col, _)| *col);

        let mut rendered = RenderedLine::default();
        let mut col = 0;
        let mut next_anchor = 0;
        for ch in line.text.chars() {
            while let Some(&(at, bucket)) = anchors.get(next_anchor) {
                if at > col {
                    break;
                }
                if let Some(g) = glyph(bucket) {
                    rendered.push(g, SegmentStyle::Icon(bucket));
                }
                next_anchor += 1;
            }

            let here = Position::new(number, col);
            col += ch.len_utf16();
            if hidden.iter().any(|r| covers(r, here)) {
                continue;
            }
            let style = sized
                .iter()
                .find(|(_, ranges)| ranges.iter().any(|r| covers(r, here)))
                .map(|(bucket, _)| SegmentStyle::Heading(*bucket))
                .unwrap_or_else(|| {
                    if default_color.iter().any(|r| covers(r, here)) {
                        SegmentStyle::DefaultColor
                    } else {
                        SegmentStyle::Plain
                    }
                });
            rendered.push(ch, style);
        }
        for &(_, bucket) in &anchors[next_anchor..] {
            if let Some(g) = glyph(bucket) {
                rendered.push(g, SegmentStyle::Icon(bucket));
            }
        }

        let rule_char = if !sized[0].1.is_empty() {
            Some('═')
        } else if !sized[1].1.is_empty() {
            Some('─')
        } else {
            None
        };
        let width = rendered.plain_text().width();
        rendered.rule = rule_char.map(|c| std::iter::repeat(c).take(width).collect());
        lines.push(rendered);
    }

    Ok(lines)
}

/// Half-open containment of a character position
fn covers(range: &Range, position: Position) -> bool {
    range.start <= position && position < range.end
}

/// Terminal style for a segment
fn content_style(style: SegmentStyle) -> ContentStyle {
    match style {
        SegmentStyle::Plain => ContentStyle::new(),
        SegmentStyle::DefaultColor => ContentStyle::new().with(Color::Reset),
        SegmentStyle::Heading(Bucket::HeadingXxl) => ContentStyle::new().bold().underlined(),
        SegmentStyle::Heading(_) => ContentStyle::new().bold(),
        SegmentStyle::Icon(Bucket::HyperlinkIcon) => ContentStyle::new().with(Color::Blue),
        SegmentStyle::Icon(Bucket::ImageIcon) => ContentStyle::new().with(Color::Magenta),
        SegmentStyle::Icon(Bucket::CheckboxChecked) => ContentStyle::new().with(Color::Green),
        SegmentStyle::Icon(_) => ContentStyle::new(),
    }
}

/// Write rendered lines with terminal styling
pub fn write_preview<W: Write>(out: &mut W, lines: &[RenderedLine]) -> Result<()> {
    for line in lines {
        for segment in &line.segments {
            let styled = StyledContent::new(content_style(segment.style), segment.text.as_str());
            queue!(out, PrintStyledContent(styled))?;
        }
        queue!(out, Print("\n"))?;
        if let Some(rule) = &line.rule {
            queue!(out, Print(rule), Print("\n"))?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conceal::Engine;
    use crate::document::Document;
    use crate::selection::Selection;

    fn render(text: &str) -> Vec<RenderedLine> {
        let doc = Document::new(text);
        let plan = Engine::new().unwrap().recompute(&doc, &Selection::none(), 2);
        render_lines(&doc, &plan).unwrap()
    }

    #[test]
    fn test_heading_gets_rule() {
        let lines = render("# Title\n## Sub\n### Small");
        assert_eq!(
            lines[0].segments,
            vec![Segment {
                text: "Title".into(),
                style: SegmentStyle::Heading(Bucket::HeadingXxl),
            }]
        );
        assert_eq!(lines[0].rule.as_deref(), Some("═════"));
        assert_eq!(lines[1].rule.as_deref(), Some("───"));
        assert_eq!(lines[2].rule, None);
        assert_eq!(lines[2].plain_text(), "Small");
    }

    #[test]
    fn test_icons_replace_hidden_syntax() {
        let lines = render("- [x] done\n  - item\n[a](b) ![c](d)");
        assert_eq!(lines[0].plain_text(), "☑ done");
        assert_eq!(lines[0].segments[0].style, SegmentStyle::Icon(Bucket::CheckboxChecked));
        assert_eq!(lines[1].plain_text(), "  ○ item");
        assert_eq!(lines[2].plain_text(), "↗a ▣c");
    }

    #[test]
    fn test_emphasis_default_color_run() {
        let lines = render("a **b** c");
        assert_eq!(
            lines[0].segments,
            vec![
                Segment { text: "a ".into(), style: SegmentStyle::Plain },
                Segment { text: "b".into(), style: SegmentStyle::DefaultColor },
                Segment { text: " c".into(), style: SegmentStyle::Plain },
            ]
        );
    }

    #[test]
    fn test_rule_uses_display_width() {
        let lines = render("# 日本");
        assert_eq!(lines[0].rule.as_deref(), Some("════"));
    }

    #[test]
    fn test_write_preview() {
        let lines = render("# Hi\n- x");
        let mut out = Vec::new();
        write_preview(&mut out, &lines).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Hi"));
        assert!(text.contains("══"));
        assert!(text.contains('●'));
        assert!(!text.contains('#'));
    }
}
