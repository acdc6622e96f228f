//! One reviewer working on one essay

use crate::annotations::{
    route_click, Annotation, AnnotationClickHandler, AnnotationPersistence, AnnotationSet,
    NewAnnotation, OverlapPolicy, PersistenceError, RangeError,
};
use crate::html::{self, HighlightConfig};
use crate::text::{self, BaseText, RenderedView, ResolvedSelection, Segment, Selection};

/// Base text plus the annotation set being edited.
///
/// Every mutation is synchronous and in memory; nothing is written until
/// [`ReviewSession::save`] is called.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    text: BaseText,
    annotations: AnnotationSet,
}

impl ReviewSession {
    /// Start a review with no annotations
    pub fn new(essay_id: &str, text: impl Into<BaseText>, policy: OverlapPolicy) -> Self {
        let text = text.into();
        let annotations = AnnotationSet::new(essay_id, &text, policy);
        Self { text, annotations }
    }

    /// Start a review from whatever the backend has stored for the essay
    pub async fn load<P>(
        persistence: &P,
        essay_id: &str,
        text: impl Into<BaseText>,
        policy: OverlapPolicy,
    ) -> Result<Self, PersistenceError>
    where
        P: AnnotationPersistence + ?Sized,
    {
        let text = text.into();
        let stored = persistence.load_annotations(essay_id).await?;
        let stored_count = stored.len();
        let annotations = AnnotationSet::from_annotations(essay_id, &text, policy, stored);

        tracing::debug!(
            essay_id,
            loaded = annotations.len(),
            skipped = stored_count - annotations.len(),
            "Review session loaded"
        );

        Ok(Self { text, annotations })
    }

    pub fn essay_id(&self) -> &str {
        self.annotations.essay_id()
    }

    pub fn text(&self) -> &BaseText {
        &self.text
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    /// Current segment sequence
    pub fn segments(&self) -> Vec<Segment<'_>> {
        text::render(&self.text, &self.annotations)
    }

    /// Current highlighted HTML fragment
    pub fn render_html(&self, config: &HighlightConfig) -> String {
        html::render_html(&self.segments(), config)
    }

    /// Resolve a selection made in a view of this session.
    ///
    /// A view rendered from another text (e.g. before the essay was
    /// resubmitted) can yield offsets whose text does not match; those are
    /// dropped like any other unusable selection.
    pub fn resolve_selection<V: RenderedView>(
        &self,
        view: &V,
        selection: Option<&Selection<V::Point>>,
    ) -> Option<ResolvedSelection> {
        let resolved = text::resolve_selection(view, selection)?;

        match self.text.slice(resolved.start_offset, resolved.end_offset) {
            Some(expected) if expected == resolved.selected_text => Some(resolved),
            _ => {
                tracing::warn!(
                    essay_id = self.essay_id(),
                    start = resolved.start_offset,
                    end = resolved.end_offset,
                    "Selection does not match the essay text, ignored"
                );
                None
            }
        }
    }

    /// Draft annotation for a resolved selection, commentary left empty
    pub fn draft_from_selection(
        &self,
        selection: &ResolvedSelection,
        teacher_id: Option<&str>,
    ) -> NewAnnotation {
        let draft = NewAnnotation::new(selection.start_offset as i64, selection.end_offset as i64);
        match teacher_id {
            Some(teacher_id) => draft.with_teacher(teacher_id),
            None => draft,
        }
    }

    pub fn add(&mut self, draft: NewAnnotation) -> Result<Annotation, RangeError> {
        self.annotations.insert(draft)
    }

    pub fn update(&mut self, id: &str, draft: NewAnnotation) -> Result<Annotation, RangeError> {
        self.annotations.upsert(id, draft)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.annotations.remove(id)
    }

    /// Route a click on the mark for `annotation_id`
    pub fn click<H>(&self, annotation_id: &str, handler: &mut H) -> bool
    where
        H: AnnotationClickHandler + ?Sized,
    {
        route_click(&self.annotations, annotation_id, handler)
    }

    /// Essay text covered by an annotation
    pub fn excerpt(&self, annotation_id: &str) -> Option<&str> {
        let annotation = self.annotations.get(annotation_id)?;
        self.text.slice(annotation.start_offset, annotation.end_offset)
    }

    /// Replace the stored set with the current one
    pub async fn save<P>(&self, persistence: &P) -> Result<(), PersistenceError>
    where
        P: AnnotationPersistence + ?Sized,
    {
        let sorted: Vec<Annotation> = self.annotations.iter().cloned().collect();
        persistence
            .save_annotations(self.essay_id(), &sorted)
            .await
            .inspect_err(|e| {
                tracing::error!(essay_id = self.essay_id(), "Saving annotations failed: {}", e)
            })
    }
}
