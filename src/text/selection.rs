//! Selection to offset resolution
//!
//! A selection made inside the rendered view carries no offset metadata of
//! its own. Its start offset is recovered by measuring how many chars are
//! rendered between the start of the view and the selection start; since
//! rendering is lossless that count is the offset into the base text.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::segments::{flatten, FlatText, Segment, ViewPosition};

/// Platform adapter over a rendered, annotated view.
///
/// Implementations only need to locate points and measure rendered text;
/// they know nothing about annotations or segment styling.
pub trait RenderedView {
    /// A position inside the rendered content
    type Point: Clone;

    /// The point before the first rendered char
    fn origin(&self) -> Self::Point;

    /// Whether the point lies inside this view
    fn contains(&self, point: &Self::Point) -> bool;

    /// Document order of two points, `None` if they cannot be compared
    fn compare(&self, a: &Self::Point, b: &Self::Point) -> Option<Ordering>;

    /// Rendered text between two ordered points
    fn text_between(&self, from: &Self::Point, to: &Self::Point) -> Option<String>;
}

/// A live selection as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection<P> {
    /// Where the user started dragging
    pub anchor: P,
    /// Where the user released
    pub focus: P,
}

impl<P> Selection<P> {
    pub fn new(anchor: P, focus: P) -> Self {
        Self { anchor, focus }
    }
}

/// Selection expressed in base text coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSelection {
    pub start_offset: usize,
    pub end_offset: usize,
    pub selected_text: String,
}

/// Resolve a selection to base text offsets.
///
/// Returns `None` without error when there is no selection, it is collapsed,
/// an endpoint lies outside the view, or nothing was selected. A click
/// without a drag ends up here and is simply ignored.
pub fn resolve_selection<V: RenderedView>(
    view: &V,
    selection: Option<&Selection<V::Point>>,
) -> Option<ResolvedSelection> {
    let selection = selection?;

    if !view.contains(&selection.anchor) || !view.contains(&selection.focus) {
        tracing::trace!("Selection outside the annotatable view, ignored");
        return None;
    }

    let (start, end) = match view.compare(&selection.anchor, &selection.focus)? {
        Ordering::Equal => return None,
        Ordering::Less => (&selection.anchor, &selection.focus),
        Ordering::Greater => (&selection.focus, &selection.anchor),
    };

    let selected_text = view.text_between(start, end)?;
    if selected_text.is_empty() {
        return None;
    }

    let start_offset = view.text_between(&view.origin(), start)?.chars().count();
    let end_offset = start_offset + selected_text.chars().count();

    Some(ResolvedSelection {
        start_offset,
        end_offset,
        selected_text,
    })
}

/// [`RenderedView`] over a rendered segment sequence
#[derive(Debug, Clone)]
pub struct SegmentView {
    flat: FlatText,
}

impl SegmentView {
    pub fn new(segments: &[Segment<'_>]) -> Self {
        Self {
            flat: flatten(segments),
        }
    }

    pub fn flat(&self) -> &FlatText {
        &self.flat
    }
}

impl RenderedView for SegmentView {
    type Point = ViewPosition;

    fn origin(&self) -> ViewPosition {
        ViewPosition::new(0, 0)
    }

    fn contains(&self, point: &ViewPosition) -> bool {
        self.flat.offset_of(*point).is_some()
    }

    fn compare(&self, a: &ViewPosition, b: &ViewPosition) -> Option<Ordering> {
        Some(self.flat.offset_of(*a)?.cmp(&self.flat.offset_of(*b)?))
    }

    fn text_between(&self, from: &ViewPosition, to: &ViewPosition) -> Option<String> {
        let from = self.flat.offset_of(*from)?;
        let to = self.flat.offset_of(*to)?;
        self.flat.slice(from, to).map(str::to_string)
    }
}
