//! In-memory annotation store
//!
//! Holds the annotations of one essay for the duration of a review. All
//! operations are synchronous; persistence happens elsewhere.

use super::error::RangeError;
use super::types::{Annotation, NewAnnotation, OverlapPolicy, TextSpan};
use crate::text::BaseText;

/// Insertion-ordered annotations over one base text
#[derive(Debug, Clone)]
pub struct AnnotationSet {
    essay_id: String,
    text_len: usize,
    policy: OverlapPolicy,
    annotations: Vec<Annotation>,
}

/// Sorted, restartable iterator over an [`AnnotationSet`]
pub type SortedIter<'a> = std::vec::IntoIter<&'a Annotation>;

impl AnnotationSet {
    /// Create an empty set for an essay
    pub fn new(essay_id: &str, text: &BaseText, policy: OverlapPolicy) -> Self {
        Self {
            essay_id: essay_id.to_string(),
            text_len: text.len(),
            policy,
            annotations: Vec::new(),
        }
    }

    /// Build a set from previously stored annotations.
    ///
    /// Records that no longer fit the text, or that the policy refuses, are
    /// skipped with a warning rather than failing the whole load.
    pub fn from_annotations(
        essay_id: &str,
        text: &BaseText,
        policy: OverlapPolicy,
        annotations: Vec<Annotation>,
    ) -> Self {
        let mut set = Self::new(essay_id, text, policy);
        for annotation in annotations {
            let id = annotation.id.clone();
            let created_at = annotation.created_at;
            match set.upsert(&id, NewAnnotation::from(annotation)) {
                Ok(_) => {
                    if let Some(stored) = set.get_mut(&id) {
                        stored.created_at = created_at;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        annotation_id = %id,
                        essay_id,
                        "Skipping stored annotation: {}",
                        e
                    );
                }
            }
        }
        set
    }

    pub fn essay_id(&self) -> &str {
        &self.essay_id
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Check a candidate range against the text bounds
    pub fn validate(&self, start: i64, end: i64) -> Result<TextSpan, RangeError> {
        let len = self.text_len;
        let in_bounds = |offset: i64| usize::try_from(offset).ok().filter(|&o| o <= len);

        let (Some(from), Some(to)) = (in_bounds(start), in_bounds(end)) else {
            return Err(RangeError::OutOfBounds { start, end, len });
        };
        if from >= to {
            return Err(RangeError::Empty { start, end });
        }

        Ok(TextSpan::new(from, to))
    }

    /// Validate and append a new annotation
    pub fn insert(&mut self, mut draft: NewAnnotation) -> Result<Annotation, RangeError> {
        let span = self.validate(draft.start_offset, draft.end_offset)?;
        self.check_overlap(span, None)?;

        if let Some(id) = draft.id.as_deref().filter(|id| self.get(id).is_some()) {
            tracing::warn!(annotation_id = %id, "Duplicate annotation id, assigning a new one");
            draft.id = None;
        }

        let annotation = draft.into_annotation(&self.essay_id, span);
        tracing::debug!(
            annotation_id = %annotation.id,
            start = span.start,
            end = span.end,
            "Annotation inserted"
        );
        self.annotations.push(annotation.clone());
        Ok(annotation)
    }

    /// Replace the annotation with this id in place, or append it.
    ///
    /// A replaced annotation keeps its position and creation time.
    pub fn upsert(&mut self, id: &str, mut draft: NewAnnotation) -> Result<Annotation, RangeError> {
        let span = self.validate(draft.start_offset, draft.end_offset)?;
        self.check_overlap(span, Some(id))?;

        draft.id = Some(id.to_string());
        let Some(index) = self.annotations.iter().position(|a| a.id == id) else {
            return self.insert(draft);
        };

        let mut annotation = draft.into_annotation(&self.essay_id, span);
        annotation.created_at = self.annotations[index].created_at;
        self.annotations[index] = annotation.clone();
        tracing::debug!(annotation_id = %id, "Annotation updated");
        Ok(annotation)
    }

    /// Remove by id; `false` when nothing matched
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        let removed = self.annotations.len() != before;
        if removed {
            tracing::debug!(annotation_id = %id, "Annotation removed");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id == id)
    }

    /// The first annotation in sorted order covering the char at `offset`
    pub fn annotation_at(&self, offset: usize) -> Option<&Annotation> {
        self.iter().find(|a| a.contains(offset))
    }

    /// All annotations ascending by start offset, ties in insertion order
    pub fn sorted_view(&self) -> Vec<&Annotation> {
        let mut sorted: Vec<&Annotation> = self.annotations.iter().collect();
        sorted.sort_by_key(|a| a.start_offset);
        sorted
    }

    /// Iterate the sorted view; clone the iterator to restart it
    pub fn iter(&self) -> SortedIter<'_> {
        self.sorted_view().into_iter()
    }

    /// Annotations in insertion order
    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    fn check_overlap(&self, span: TextSpan, skip_id: Option<&str>) -> Result<(), RangeError> {
        if self.policy == OverlapPolicy::Allow {
            return Ok(());
        }
        let conflict = self
            .annotations
            .iter()
            .filter(|a| Some(a.id.as_str()) != skip_id)
            .find(|a| a.span().overlaps(span));

        match conflict {
            Some(existing) => Err(RangeError::Overlap {
                start: span.start,
                end: span.end,
                existing: existing.id.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter = SortedIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
