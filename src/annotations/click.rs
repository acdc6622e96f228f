//! Annotation click routing
//!
//! An annotated segment only carries its annotation id. A click looks the
//! annotation up and hands it to the caller.

use super::store::AnnotationSet;
use super::types::Annotation;

/// Receives the annotation behind a clicked mark
pub trait AnnotationClickHandler {
    fn on_annotation_click(&mut self, annotation: &Annotation);
}

impl<F> AnnotationClickHandler for F
where
    F: FnMut(&Annotation),
{
    fn on_annotation_click(&mut self, annotation: &Annotation) {
        self(annotation)
    }
}

/// Dispatch the annotation with `annotation_id` to `handler`.
///
/// Returns `false` when the id is unknown, e.g. a stale mark after removal.
pub fn route_click<H>(store: &AnnotationSet, annotation_id: &str, handler: &mut H) -> bool
where
    H: AnnotationClickHandler + ?Sized,
{
    match store.get(annotation_id) {
        Some(annotation) => {
            handler.on_annotation_click(annotation);
            true
        }
        None => {
            tracing::debug!(annotation_id, "Click on unknown annotation ignored");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{NewAnnotation, OverlapPolicy};
    use crate::text::BaseText;

    #[test]
    fn test_click_dispatches_annotation() {
        let base = BaseText::new("ABCDE");
        let mut store = AnnotationSet::new("essay-1", &base, OverlapPolicy::Reject);
        store
            .insert(NewAnnotation::new(1, 3).with_id("x").with_text("Vírgula"))
            .unwrap();

        let mut opened = Vec::new();
        let mut handler = |a: &Annotation| opened.push(a.annotation_text.clone());

        assert!(route_click(&store, "x", &mut handler));
        assert!(!route_click(&store, "missing", &mut handler));
        assert_eq!(opened, vec!["Vírgula".to_string()]);
    }

    struct Popover {
        selected: Option<String>,
    }

    impl AnnotationClickHandler for Popover {
        fn on_annotation_click(&mut self, annotation: &Annotation) {
            self.selected = Some(annotation.id.clone());
        }
    }

    #[test]
    fn test_click_with_handler_type() {
        let base = BaseText::new("ABCDE");
        let mut store = AnnotationSet::new("essay-1", &base, OverlapPolicy::Reject);
        store.insert(NewAnnotation::new(0, 2).with_id("y")).unwrap();

        let mut popover = Popover { selected: None };
        route_click(&store, "y", &mut popover);
        assert_eq!(popover.selected.as_deref(), Some("y"));
    }
}
