//! Clickable links and image previews
//!
//! Once the engine hides a link's brackets and URL, only the label is
//! left on screen. These helpers give the host a target for that label and
//! a preview for image alt text.

use std::path::{Path, PathBuf};

use fancy_regex::Regex;
use tracing::trace;

use crate::conceal::rules::{Matches, Rules};
use crate::conceal::Engine;
use crate::document::{Position, Range, TextDocument};
use crate::error::Result;

/// Where a link points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Target exactly as written; hyperlinks always land here
    Url(String),
    /// Local image file, resolved against the document's directory when known
    Path(PathBuf),
}

/// A clickable label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    /// Title of a link or alt text of an image
    pub range: Range,
    pub target: LinkTarget,
    pub tooltip: String,
}

/// Hover content for an image's alt text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHover {
    pub range: Range,
    /// Markdown that renders the image, e.g. `![alt](url)`
    pub markdown: String,
}

/// A non-empty label and the url next to it
struct Labelled<'t> {
    range: Range,
    label: &'t str,
    url: &'t str,
}

impl Engine {
    /// Links for every hyperlink title and every non-empty image alt text
    pub fn document_links<D: TextDocument + ?Sized>(
        &self,
        doc: &D,
        base_dir: Option<&Path>,
    ) -> Result<Vec<DocumentLink>> {
        let rules = self.rules();
        let mut links = Vec::new();

        for link in labels(&rules.hyperlink, doc)? {
            links.push(DocumentLink {
                range: link.range,
                target: LinkTarget::Url(link.url.to_string()),
                tooltip: link.url.to_string(),
            });
        }

        for image in labels(&rules.image, doc)? {
            links.push(DocumentLink {
                range: image.range,
                target: image_target(rules, image.url, base_dir),
                tooltip: image.label.to_string(),
            });
        }

        Ok(links)
    }

    /// Image preview if `position` is on an image's alt text
    pub fn image_hover<D: TextDocument + ?Sized>(
        &self,
        doc: &D,
        position: Position,
    ) -> Result<Option<ImageHover>> {
        let hover = labels(&self.rules().image, doc)?
            .into_iter()
            .find(|image| image.range.contains_position(position))
            .map(|image| ImageHover {
                range: image.range,
                markdown: format!("![{}]({})", image.label, image.url),
            });
        Ok(hover)
    }
}

/// Non-empty labels of every match, line by line
///
/// A label that cannot be addressed is skipped.
fn labels<'t, D: TextDocument + ?Sized>(
    pattern: &Regex,
    doc: &'t D,
) -> Result<Vec<Labelled<'t>>> {
    let mut found = Vec::new();

    for number in 0..doc.line_count() {
        let line = doc.line_at(number)?;
        for caps in Matches::new(pattern, line.text) {
            let (Some(label), Some(url)) = (caps.get(1), caps.get(2)) else {
                trace!("link match without label or url group");
                continue;
            };
            if label.as_str().is_empty() {
                continue;
            }
            let Some(range) = line.range_between(label.start(), label.end()) else {
                trace!(line = number, "unaddressable label");
                continue;
            };
            found.push(Labelled {
                range,
                label: label.as_str(),
                url: url.as_str(),
            });
        }
    }

    Ok(found)
}

/// Image urls with a scheme stay urls; anything else is a file path
fn image_target(rules: &Rules, url: &str, base_dir: Option<&Path>) -> LinkTarget {
    if rules.url_scheme.is_match(url) {
        return LinkTarget::Url(url.to_string());
    }
    match base_dir {
        Some(dir) => LinkTarget::Path(dir.join(url)),
        None => LinkTarget::Path(PathBuf::from(url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_hyperlink_label_and_target() {
        let engine = Engine::new().unwrap();
        let doc = Document::new("see [docs](https://example.com/x) here");
        let links = engine.document_links(&doc, None).unwrap();
        assert_eq!(
            links,
            vec![DocumentLink {
                range: Range::on_line(0, 5, 9),
                target: LinkTarget::Url("https://example.com/x".into()),
                tooltip: "https://example.com/x".into(),
            }]
        );
    }

    #[test]
    fn test_only_image_paths_resolve_against_base() {
        let engine = Engine::new().unwrap();
        let doc = Document::new("[a](notes.md)\n![pic](img/p.png)\n![](skip.png)");
        let links = engine.document_links(&doc, Some(Path::new("/docs"))).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].target, LinkTarget::Url("notes.md".into()));
        assert_eq!(links[1].range, Range::on_line(1, 2, 5));
        assert_eq!(links[1].target, LinkTarget::Path(PathBuf::from("/docs/img/p.png")));
        assert_eq!(links[1].tooltip, "pic");
    }

    #[test]
    fn test_scheme_detection_is_case_insensitive() {
        let engine = Engine::new().unwrap();
        let doc = Document::new("![x](HTTP://host/p.png)");
        let links = engine.document_links(&doc, Some(Path::new("/docs"))).unwrap();
        assert_eq!(links[0].target, LinkTarget::Url("HTTP://host/p.png".into()));
    }

    #[test]
    fn test_image_hover() {
        let engine = Engine::new().unwrap();
        let doc = Document::new("text ![cat](cat.png)");
        let hover = engine.image_hover(&doc, Position::new(0, 8)).unwrap();
        assert_eq!(
            hover,
            Some(ImageHover {
                range: Range::on_line(0, 7, 10),
                markdown: "![cat](cat.png)".into(),
            })
        );
        assert_eq!(engine.image_hover(&doc, Position::new(0, 2)).unwrap(), None);
    }

    /// Serves lines normally but cannot map whole-document offsets
    struct LinesOnly<'a>(Document<'a>);

    impl TextDocument for LinesOnly<'_> {
        fn text(&self) -> &str {
            self.0.text()
        }

        fn position_at(&self, offset: usize) -> Result<Position> {
            Err(crate::error::ConcealError::OffsetOutOfRange { offset, len: 0 })
        }

        fn line_count(&self) -> usize {
            self.0.line_count()
        }

        fn line_at(&self, line: usize) -> Result<crate::document::Line<'_>> {
            self.0.line_at(line)
        }
    }

    #[test]
    fn test_links_need_only_line_addressing() {
        let engine = Engine::new().unwrap();
        let doc = LinesOnly(Document::new("[a](b)\n![c](d.png)"));
        let links = engine.document_links(&doc, None).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].range, Range::on_line(1, 2, 3));
        let hover = engine.image_hover(&doc, Position::new(1, 2)).unwrap();
        assert_eq!(hover.map(|h| h.markdown), Some("![c](d.png)".to_string()));
    }
}
