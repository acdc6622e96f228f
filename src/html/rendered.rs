//! Rendered HTML as a selection surface
//!
//! Browsers report a selection as (text node, UTF-16 offset) pairs. This
//! module rebuilds the text node list of a rendered fragment with lol_html so
//! such points can be measured against the flattened text.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use html_escape::decode_html_entities;
use lol_html::{doc_text, element, rewrite_str, EndTagHandler, RewriteStrSettings};
use serde::{Deserialize, Serialize};

use super::highlight_renderer::HighlightConfig;
use super::HtmlError;
use crate::text::{utf16_len, utf16_to_char_offset, BaseText, RenderedView};

/// A DOM selection endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomPoint {
    /// Index of the text node in document order
    pub node: usize,
    /// Offset inside the node in UTF-16 code units
    pub offset: usize,
}

impl DomPoint {
    pub fn new(node: usize, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone)]
struct TextNode {
    text: String,
    /// Char offset of the node in the flattened text
    start: usize,
    utf16_len: usize,
    annotation_id: Option<String>,
}

/// Text nodes of a rendered fragment, in document order
#[derive(Debug, Clone)]
pub struct RenderedHtml {
    nodes: Vec<TextNode>,
    text: BaseText,
}

impl RenderedHtml {
    /// Parse a fragment produced by [`super::render_html`]
    pub fn parse(html: &str, config: &HighlightConfig) -> Result<Self, HtmlError> {
        let marks: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let collected: Rc<RefCell<Vec<(String, Option<String>)>>> =
            Rc::new(RefCell::new(Vec::new()));

        let id_attribute = config.id_attribute.clone();
        let element_marks = Rc::clone(&marks);
        let text_marks = Rc::clone(&marks);
        let text_nodes = Rc::clone(&collected);
        let mut pending = String::new();

        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("mark", move |el| {
                    let annotation_id = el.get_attribute(&id_attribute);
                    if let Some(handlers) = el.end_tag_handlers() {
                        element_marks.borrow_mut().push(annotation_id);
                        let marks = Rc::clone(&element_marks);
                        let on_end: EndTagHandler<'static> = Box::new(move |_end| {
                            marks.borrow_mut().pop();
                            Ok(())
                        });
                        handlers.push(on_end);
                    }
                    Ok(())
                })],
                document_content_handlers: vec![doc_text!(move |chunk| {
                    pending.push_str(chunk.as_str());
                    if chunk.last_in_text_node() {
                        let raw = std::mem::take(&mut pending);
                        if !raw.is_empty() {
                            let text = decode_html_entities(&raw).into_owned();
                            let annotation_id = text_marks.borrow().last().cloned().flatten();
                            text_nodes.borrow_mut().push((text, annotation_id));
                        }
                    }
                    Ok(())
                })],
                ..RewriteStrSettings::default()
            },
        )
        .map_err(|e| HtmlError::Rewrite(e.to_string()))?;

        let mut nodes = Vec::new();
        let mut flat = String::new();
        let mut start = 0;
        for (text, annotation_id) in collected.take() {
            flat.push_str(&text);
            let len = text.chars().count();
            nodes.push(TextNode {
                utf16_len: utf16_len(&text),
                text,
                start,
                annotation_id,
            });
            start += len;
        }

        tracing::trace!(nodes = nodes.len(), "Parsed rendered HTML");

        Ok(Self {
            nodes,
            text: BaseText::new(flat),
        })
    }

    /// Text content of the whole fragment
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Text of one node
    pub fn node_text(&self, node: usize) -> Option<&str> {
        self.nodes.get(node).map(|n| n.text.as_str())
    }

    /// UTF-16 length of one node, i.e. the offset of its end
    pub fn node_len(&self, node: usize) -> Option<usize> {
        self.nodes.get(node).map(|n| n.utf16_len)
    }

    /// Annotation id of the mark enclosing a point, if any
    pub fn annotation_at(&self, point: DomPoint) -> Option<&str> {
        self.nodes.get(point.node)?.annotation_id.as_deref()
    }

    /// Index of the first text node inside the mark for `annotation_id`
    pub fn node_of_annotation(&self, annotation_id: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.annotation_id.as_deref() == Some(annotation_id))
    }

    fn char_offset(&self, point: &DomPoint) -> Option<usize> {
        let node = self.nodes.get(point.node)?;
        Some(node.start + utf16_to_char_offset(&node.text, point.offset)?)
    }
}

impl RenderedView for RenderedHtml {
    type Point = DomPoint;

    fn origin(&self) -> DomPoint {
        DomPoint::new(0, 0)
    }

    fn contains(&self, point: &DomPoint) -> bool {
        self.char_offset(point).is_some()
    }

    fn compare(&self, a: &DomPoint, b: &DomPoint) -> Option<Ordering> {
        Some(self.char_offset(a)?.cmp(&self.char_offset(b)?))
    }

    fn text_between(&self, from: &DomPoint, to: &DomPoint) -> Option<String> {
        let from = self.char_offset(from)?;
        let to = self.char_offset(to)?;
        self.text.slice(from, to).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{AnnotationSet, NewAnnotation, OverlapPolicy};
    use crate::html::render_html;
    use crate::text::{render, resolve_selection, Selection};

    fn rendered(text: &str, ranges: &[(&str, i64, i64)]) -> (BaseText, RenderedHtml) {
        let base = BaseText::new(text);
        let mut set = AnnotationSet::new("essay-1", &base, OverlapPolicy::Reject);
        for (id, start, end) in ranges {
            set.insert(NewAnnotation::new(*start, *end).with_id(id)).unwrap();
        }
        let config = HighlightConfig::default();
        let html = render_html(&render(&base, &set), &config);
        let view = RenderedHtml::parse(&html, &config).unwrap();
        (base, view)
    }

    fn select(
        view: &RenderedHtml,
        anchor: DomPoint,
        focus: DomPoint,
    ) -> Option<(usize, usize, String)> {
        resolve_selection(view, Some(&Selection::new(anchor, focus)))
            .map(|r| (r.start_offset, r.end_offset, r.selected_text))
    }

    #[test]
    fn test_text_content_matches_base_text() {
        let (base, view) = rendered("Tom & Jerry <3 \"quotes\"", &[("a", 4, 5), ("b", 12, 14)]);
        assert_eq!(view.text(), base.as_str());
        assert_eq!(view.node_count(), 5);
        assert_eq!(view.node_text(1), Some("&"));
        assert_eq!(view.annotation_at(DomPoint::new(1, 0)), Some("a"));
        assert_eq!(view.annotation_at(DomPoint::new(2, 0)), None);
    }

    #[test]
    fn test_reselecting_mark_returns_its_offsets() {
        let (_, view) = rendered("0123456789", &[("a", 2, 4), ("b", 6, 8)]);

        let node = view.node_of_annotation("b").unwrap();
        let len = view.node_len(node).unwrap();
        let resolved = select(&view, DomPoint::new(node, 0), DomPoint::new(node, len));
        assert_eq!(resolved, Some((6, 8, "67".to_string())));
    }

    #[test]
    fn test_selection_spanning_marks() {
        let (_, view) = rendered("0123456789", &[("a", 2, 4), ("b", 6, 8)]);

        // From the middle of "23" back to the middle of "01", dragged backwards
        let resolved = select(&view, DomPoint::new(1, 1), DomPoint::new(0, 1));
        assert_eq!(resolved, Some((1, 3, "12".to_string())));

        // From plain text into the second mark
        let resolved = select(&view, DomPoint::new(2, 0), DomPoint::new(3, 1));
        assert_eq!(resolved, Some((4, 7, "456".to_string())));
    }

    #[test]
    fn test_utf16_offsets_map_to_chars() {
        let (_, view) = rendered("ok 😀 sim", &[("e", 3, 4)]);

        // The emoji node is two UTF-16 units long but one char
        let node = view.node_of_annotation("e").unwrap();
        assert_eq!(view.node_len(node), Some(2));
        let resolved = select(&view, DomPoint::new(node, 0), DomPoint::new(node + 1, 4));
        assert_eq!(resolved, Some((3, 8, "😀 sim".to_string())));

        // Splitting the surrogate pair is not a valid point
        assert_eq!(select(&view, DomPoint::new(node, 1), DomPoint::new(node + 1, 1)), None);
    }

    #[test]
    fn test_ignored_selections() {
        let (_, view) = rendered("0123456789", &[("a", 2, 4)]);

        assert_eq!(select(&view, DomPoint::new(0, 1), DomPoint::new(0, 1)), None);
        assert_eq!(select(&view, DomPoint::new(0, 2), DomPoint::new(1, 0)), None);
        assert_eq!(select(&view, DomPoint::new(7, 0), DomPoint::new(0, 1)), None);
        assert_eq!(select(&view, DomPoint::new(0, 0), DomPoint::new(0, 9)), None);
    }

    #[test]
    fn test_empty_fragment() {
        let view = RenderedHtml::parse("", &HighlightConfig::default()).unwrap();
        assert_eq!(view.node_count(), 0);
        assert_eq!(select(&view, DomPoint::new(0, 0), DomPoint::new(0, 1)), None);
    }
}
