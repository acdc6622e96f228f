//! Segment rendering and flattening
//!
//! [`render`] splits the base text into plain and annotated runs;
//! [`flatten`] turns a run sequence back into one string plus a boundary
//! index so view positions can be mapped to char offsets.

use serde::{Deserialize, Serialize};

use super::base::BaseText;
use crate::annotations::Annotation;

/// A contiguous run of base text, plain or annotated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    /// Char offset of the run in the base text
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark: Option<SegmentMark<'a>>,
}

/// Annotation reference carried by an annotated segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentMark<'a> {
    pub annotation_id: &'a str,
    pub label: &'a str,
}

impl<'a> Segment<'a> {
    fn plain(base: &'a BaseText, start: usize, end: usize) -> Self {
        Self {
            text: base.slice(start, end).unwrap_or_default(),
            start,
            end,
            mark: None,
        }
    }

    fn annotated(base: &'a BaseText, start: usize, end: usize, annotation: &'a Annotation) -> Self {
        Self {
            text: base.slice(start, end).unwrap_or_default(),
            start,
            end,
            mark: Some(SegmentMark {
                annotation_id: &annotation.id,
                label: &annotation.annotation_text,
            }),
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.mark.is_some()
    }

    pub fn annotation_id(&self) -> Option<&'a str> {
        self.mark.map(|m| m.annotation_id)
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Render annotations over the base text.
///
/// Annotations must arrive sorted by `start_offset`. A range starting before
/// the end of the previous one is clipped to the remaining gap, and one that
/// is fully covered is skipped, so the earlier range always wins and the
/// concatenated output is always exactly the base text.
pub fn render<'a, I>(base: &'a BaseText, annotations: I) -> Vec<Segment<'a>>
where
    I: IntoIterator<Item = &'a Annotation>,
{
    let len = base.len();
    let mut segments = Vec::new();
    let mut last = 0;

    for annotation in annotations {
        let start = annotation.start_offset.max(last);
        let end = annotation.end_offset.min(len);

        if start >= end {
            tracing::warn!(
                annotation_id = %annotation.id,
                start = annotation.start_offset,
                end = annotation.end_offset,
                "Annotation covered by an earlier range, not rendered"
            );
            continue;
        }
        if start != annotation.start_offset || end != annotation.end_offset {
            tracing::debug!(
                annotation_id = %annotation.id,
                start,
                end,
                "Annotation clipped while rendering"
            );
        }

        if start > last {
            segments.push(Segment::plain(base, last, start));
        }
        segments.push(Segment::annotated(base, start, end, annotation));
        last = end;
    }

    if last < len {
        segments.push(Segment::plain(base, last, len));
    }

    segments
}

/// Position inside a rendered segment sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPosition {
    /// Segment index
    pub segment: usize,
    /// Char offset within the segment
    pub offset: usize,
}

impl ViewPosition {
    pub fn new(segment: usize, offset: usize) -> Self {
        Self { segment, offset }
    }
}

/// Rendered text flattened to a single string with segment boundaries
#[derive(Debug, Clone)]
pub struct FlatText {
    text: BaseText,
    /// Char offset where each segment begins, plus the total length
    boundaries: Vec<usize>,
}

/// Concatenate segment texts in order, recording where each one starts
pub fn flatten(segments: &[Segment<'_>]) -> FlatText {
    let mut text = String::new();
    let mut boundaries = Vec::with_capacity(segments.len() + 1);
    let mut offset = 0;

    for segment in segments {
        boundaries.push(offset);
        text.push_str(segment.text);
        offset += segment.text.chars().count();
    }
    boundaries.push(offset);

    FlatText {
        text: BaseText::new(text),
        boundaries,
    }
}

impl FlatText {
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Absolute char offset of a view position
    pub fn offset_of(&self, position: ViewPosition) -> Option<usize> {
        if position.segment >= self.segment_count() {
            return None;
        }
        let start = self.boundaries[position.segment];
        let end = self.boundaries[position.segment + 1];
        (position.offset <= end - start).then_some(start + position.offset)
    }

    /// View position of an absolute char offset.
    ///
    /// An offset on a boundary maps to the start of the following segment,
    /// except at the very end where it maps to the end of the last one.
    pub fn position_of(&self, offset: usize) -> Option<ViewPosition> {
        let count = self.segment_count();
        if count == 0 || offset > self.len() {
            return None;
        }
        let segment = self.boundaries[..count]
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Some(ViewPosition::new(segment, offset - self.boundaries[segment]))
    }

    /// Substring for the char range `[start, end)`
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        self.text.slice(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::NewAnnotation;
    use crate::annotations::TextSpan;

    fn annotation(id: &str, start: usize, end: usize) -> Annotation {
        NewAnnotation::new(start as i64, end as i64)
            .with_id(id)
            .with_text(&format!("note {}", id))
            .into_annotation("essay-1", TextSpan::new(start, end))
    }

    fn texts<'a>(segments: &[Segment<'a>]) -> Vec<(&'a str, Option<&'a str>)> {
        segments.iter().map(|s| (s.text, s.annotation_id())).collect()
    }

    #[test]
    fn test_render_single_annotation() {
        let base = BaseText::new("ABCDE");
        let annotations = [annotation("x", 1, 2)];
        let segments = render(&base, &annotations);

        assert_eq!(
            texts(&segments),
            vec![("A", None), ("B", Some("x")), ("CDE", None)]
        );
        assert_eq!(segments[1].mark.unwrap().label, "note x");
    }

    #[test]
    fn test_render_non_adjacent_annotations() {
        let base = BaseText::new("0123456789");
        let annotations = [annotation("a", 2, 4), annotation("b", 6, 8)];
        let segments = render(&base, &annotations);

        assert_eq!(
            texts(&segments),
            vec![
                ("01", None),
                ("23", Some("a")),
                ("45", None),
                ("67", Some("b")),
                ("89", None),
            ]
        );
    }

    #[test]
    fn test_render_adjacent_and_whole_text() {
        let base = BaseText::new("abcdef");
        let adjacent = [annotation("a", 0, 3), annotation("b", 3, 6)];
        assert_eq!(
            texts(&render(&base, &adjacent)),
            vec![("abc", Some("a")), ("def", Some("b"))]
        );

        let whole = [annotation("w", 0, 6)];
        assert_eq!(texts(&render(&base, &whole)), vec![("abcdef", Some("w"))]);
    }

    #[test]
    fn test_render_without_annotations() {
        let base = BaseText::new("plain essay");
        let segments = render(&base, std::iter::empty());
        assert_eq!(texts(&segments), vec![("plain essay", None)]);

        let empty = BaseText::new("");
        assert!(render(&empty, std::iter::empty()).is_empty());
    }

    #[test]
    fn test_render_clips_overlapping_ranges() {
        let base = BaseText::new("0123456789");
        let annotations = [
            annotation("a", 2, 6),
            annotation("b", 4, 8),
            annotation("c", 5, 6),
        ];
        let segments = render(&base, &annotations);

        assert_eq!(
            texts(&segments),
            vec![
                ("01", None),
                ("2345", Some("a")),
                ("67", Some("b")),
                ("89", None),
            ]
        );
        assert_eq!(segments[2].start, 6);
    }

    #[test]
    fn test_render_multibyte_offsets() {
        let base = BaseText::new("Não há tempo");
        let annotations = [annotation("x", 4, 6)];
        let segments = render(&base, &annotations);

        assert_eq!(
            texts(&segments),
            vec![("Não ", None), ("há", Some("x")), (" tempo", None)]
        );
    }

    #[test]
    fn test_round_trip_reconstructs_text() {
        let base = BaseText::new("Lorem ipsum dolor sit amet, consectetur.");
        let cases: Vec<Vec<Annotation>> = vec![
            vec![],
            vec![annotation("a", 0, 5)],
            vec![annotation("a", 6, 11), annotation("b", 12, 17)],
            vec![annotation("a", 0, 40)],
            vec![annotation("a", 35, 40)],
            vec![annotation("a", 3, 9), annotation("b", 5, 20)],
        ];

        for annotations in cases {
            let segments = render(&base, &annotations);
            let rebuilt: String = segments.iter().map(|s| s.text).collect();
            assert_eq!(rebuilt, base.as_str());
            assert!(segments.iter().all(|s| !s.is_empty()));
        }
    }

    #[test]
    fn test_flatten_positions() {
        let base = BaseText::new("0123456789");
        let annotations = [annotation("a", 2, 4)];
        let segments = render(&base, &annotations);
        let flat = flatten(&segments);

        assert_eq!(flat.as_str(), "0123456789");
        assert_eq!(flat.segment_count(), 3);
        assert_eq!(flat.offset_of(ViewPosition::new(1, 0)), Some(2));
        assert_eq!(flat.offset_of(ViewPosition::new(1, 2)), Some(4));
        assert_eq!(flat.offset_of(ViewPosition::new(1, 3)), None);
        assert_eq!(flat.offset_of(ViewPosition::new(3, 0)), None);

        assert_eq!(flat.position_of(0), Some(ViewPosition::new(0, 0)));
        assert_eq!(flat.position_of(2), Some(ViewPosition::new(1, 0)));
        assert_eq!(flat.position_of(5), Some(ViewPosition::new(2, 1)));
        assert_eq!(flat.position_of(10), Some(ViewPosition::new(2, 6)));
        assert_eq!(flat.position_of(11), None);
    }
}
