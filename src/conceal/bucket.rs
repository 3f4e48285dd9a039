//! Decoration buckets and the plan handed back to the host
//!
//! Each bucket is a semantic tag. The host decides what it looks like:
//! hide it, recolor it, resize it or prepend a glyph.

use std::collections::BTreeMap;

use crate::document::Range;

/// Semantic decoration categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// Syntax characters removed from the rendering
    Hidden,
    /// Emphasis and heading text reset to the default foreground
    DefaultColor,
    /// Level 1 heading text
    HeadingXxl,
    /// Level 2 heading text
    HeadingXl,
    /// Level 3 heading text
    HeadingL,
    /// `- [ ]` marker
    CheckboxUnchecked,
    /// `- [x]` marker
    CheckboxChecked,
    /// Anchor for the glyph replacing a link's `[`
    HyperlinkIcon,
    /// Anchor for the glyph replacing an image's `![`
    ImageIcon,
    ListLevel0,
    ListLevel1,
    ListLevel2,
    ListLevel3,
}

impl Bucket {
    /// Every bucket, in plan order
    pub const ALL: [Bucket; 13] = [
        Bucket::Hidden,
        Bucket::DefaultColor,
        Bucket::HeadingXxl,
        Bucket::HeadingXl,
        Bucket::HeadingL,
        Bucket::CheckboxUnchecked,
        Bucket::CheckboxChecked,
        Bucket::HyperlinkIcon,
        Bucket::ImageIcon,
        Bucket::ListLevel0,
        Bucket::ListLevel1,
        Bucket::ListLevel2,
        Bucket::ListLevel3,
    ];

    /// Stable name used by hosts to look up a style
    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Hidden => "hidden",
            Bucket::DefaultColor => "default-color",
            Bucket::HeadingXxl => "heading-xxl",
            Bucket::HeadingXl => "heading-xl",
            Bucket::HeadingL => "heading-l",
            Bucket::CheckboxUnchecked => "checkbox-unchecked",
            Bucket::CheckboxChecked => "checkbox-checked",
            Bucket::HyperlinkIcon => "hyperlink-icon",
            Bucket::ImageIcon => "image-icon",
            Bucket::ListLevel0 => "list-level-0",
            Bucket::ListLevel1 => "list-level-1",
            Bucket::ListLevel2 => "list-level-2",
            Bucket::ListLevel3 => "list-level-3",
        }
    }

    /// Parse a bucket from its name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// List bucket for a display tier; tiers wrap every four levels
    pub fn list_level(tier: usize) -> Self {
        match tier % 4 {
            0 => Bucket::ListLevel0,
            1 => Bucket::ListLevel1,
            2 => Bucket::ListLevel2,
            _ => Bucket::ListLevel3,
        }
    }

    /// Size tier for a heading level; levels 4-6 have none
    pub fn heading_size(level: usize) -> Option<Self> {
        match level {
            1 => Some(Bucket::HeadingXxl),
            2 => Some(Bucket::HeadingXl),
            3 => Some(Bucket::HeadingL),
            _ => None,
        }
    }

    /// Buckets that restyle visible text and so pass the overlap filter
    pub fn is_text_style(&self) -> bool {
        matches!(
            self,
            Bucket::DefaultColor | Bucket::HeadingXxl | Bucket::HeadingXl | Bucket::HeadingL
        )
    }
}

/// Ranges to paint, per bucket
///
/// Every bucket is present, possibly empty, so applying a plan clears
/// whatever an earlier plan painted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationPlan {
    buckets: BTreeMap<Bucket, Vec<Range>>,
}

impl DecorationPlan {
    /// Create a plan with every bucket empty
    pub fn new() -> Self {
        Self {
            buckets: Bucket::ALL.into_iter().map(|b| (b, Vec::new())).collect(),
        }
    }

    /// Ranges in a bucket, in scan order
    pub fn get(&self, bucket: Bucket) -> &[Range] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a range to a bucket
    pub fn push(&mut self, bucket: Bucket, range: Range) {
        self.buckets.entry(bucket).or_default().push(range);
    }

    /// Append ranges to a bucket
    pub fn extend(&mut self, bucket: Bucket, ranges: impl IntoIterator<Item = Range>) {
        self.buckets.entry(bucket).or_default().extend(ranges);
    }

    /// Replace a bucket's contents
    pub(crate) fn set(&mut self, bucket: Bucket, ranges: Vec<Range>) {
        self.buckets.insert(bucket, ranges);
    }

    /// Iterate buckets in plan order
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[Range])> {
        self.buckets.iter().map(|(b, r)| (*b, r.as_slice()))
    }

    /// Total number of ranges across all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Check if nothing is decorated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DecorationPlan {
    fn default() -> Self {
        Self::new()
    }
}
